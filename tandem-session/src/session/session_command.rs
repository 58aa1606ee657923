use tokio::sync::oneshot;

use crate::error::SessionError;

/// Requests from the [`SessionController`](crate::SessionController) to its session task.
pub(crate) enum SessionCommand<L> {
    AddMediaStream {
        stream: L,
        done: oneshot::Sender<Result<(), SessionError>>,
    },
    Close {
        done: oneshot::Sender<()>,
    },
}
