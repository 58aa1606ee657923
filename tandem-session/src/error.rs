use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Signaling channel unreachable or closed underneath us.
    #[error("transport error: {0}")]
    Transport(String),

    /// The connection rejected a description or candidate.
    #[error("negotiation error: {0}")]
    Negotiation(String),

    /// The request makes no sense in the current session state.
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("malformed signaling payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl SessionError {
    pub fn transport(err: impl ToString) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn negotiation(err: impl ToString) -> Self {
        Self::Negotiation(err.to_string())
    }

    pub fn precondition(reason: impl ToString) -> Self {
        Self::Precondition(reason.to_string())
    }
}
