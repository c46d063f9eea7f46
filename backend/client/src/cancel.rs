//! Stream cancellation.
//!
//! The original behavior had no way to abort an in-flight stream; this token
//! closes that gap. A cancelled consume surfaces `MentorError::Cancelled`
//! through `on_error`, so the one-terminal-callback guarantee still holds.

use tokio::sync::watch;

/// Cancels the token(s) cloned from its pair. Dropping the handle without
/// calling `cancel` leaves the tokens live forever.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observer side, threaded through `consume`. Cloneable; all clones observe
/// the same handle.
#[derive(Clone, Default)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx: Some(rx) })
}

impl CancelToken {
    /// A token that can never fire, for callers that do not want cancellation.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Resolves when the handle cancels; pends forever for `never()` tokens
    /// or when the handle was dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if let Some(rx) = &mut self.rx {
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await
    }
}
