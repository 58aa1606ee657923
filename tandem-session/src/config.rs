use std::env;

use tandem_core::IceServerConfig;
use tandem_core::utils::DEFAULT_STUN_ADDR;

pub const ICE_URLS_ENV: &str = "TANDEM_ICE_URLS";
pub const ICE_USERNAME_ENV: &str = "TANDEM_ICE_USERNAME";
pub const ICE_CREDENTIAL_ENV: &str = "TANDEM_ICE_CREDENTIAL";

/// Settings handed to the connection factory when a session is joined.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_ADDR.to_owned()],
                username: None,
                credential: None,
            }],
        }
    }
}

impl SessionConfig {
    /// Reads ICE settings from `TANDEM_ICE_*`, falling back to the public STUN default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let urls: Vec<String> = lookup(ICE_URLS_ENV)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .collect();

        if urls.is_empty() {
            return Self::default();
        }

        Self {
            ice_servers: vec![IceServerConfig {
                urls,
                username: lookup(ICE_USERNAME_ENV),
                credential: lookup(ICE_CREDENTIAL_ENV),
            }],
        }
    }
}
