use async_trait::async_trait;

use crate::error::SessionError;

/// Supplies local media when the session has to answer an offer and nothing
/// has been attached yet.
#[async_trait]
pub trait LocalMediaSource<L>: Send + Sync {
    async fn acquire(&self) -> Result<L, SessionError>;
}

type StreamCallback<R> = Box<dyn FnMut(R) + Send>;
type ClosedCallback = Box<dyn FnOnce() + Send>;

/// Callbacks the session invokes from inside its event loop.
///
/// They run synchronously on the session task; keep them short.
pub struct SessionHooks<L, R> {
    pub(crate) on_remote_stream: Option<StreamCallback<R>>,
    pub(crate) on_closed: Option<ClosedCallback>,
    pub(crate) media_source: Option<Box<dyn LocalMediaSource<L>>>,
}

impl<L, R> SessionHooks<L, R> {
    pub fn new() -> Self {
        Self {
            on_remote_stream: None,
            on_closed: None,
            media_source: None,
        }
    }

    /// Called once per distinct remote stream.
    pub fn on_remote_stream_available<F>(mut self, callback: F) -> Self
    where
        F: FnMut(R) + Send + 'static,
    {
        self.on_remote_stream = Some(Box::new(callback));
        self
    }

    /// Called once, when the session reaches `Closed` after a `left` or a local close.
    pub fn on_closed<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_closed = Some(Box::new(callback));
        self
    }

    pub fn with_media_source<S>(mut self, source: S) -> Self
    where
        S: LocalMediaSource<L> + 'static,
    {
        self.media_source = Some(Box::new(source));
        self
    }
}

impl<L, R> Default for SessionHooks<L, R> {
    fn default() -> Self {
        Self::new()
    }
}
