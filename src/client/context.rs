//! Per-call deadline and cancellation.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::transport::TransportError;

/// Deadline and cancellation for a single call.
///
/// The default context has neither; the transport's own timeouts still apply.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl CallContext {
    /// A context that never expires and cannot be cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// Abort the call if it has not finished within `deadline`
    pub fn with_timeout(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Abort the call when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|token| token.is_cancelled())
    }

    /// Drive `fut` under this context's deadline and cancellation token
    pub(crate) async fn run<F, T>(&self, fut: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        let guarded = async {
            match &self.cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => Err(TransportError::Cancelled),
                        result = fut => result,
                    }
                }
                None => fut.await,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, guarded)
                .await
                .unwrap_or(Err(TransportError::Timeout(deadline))),
            None => guarded.await,
        }
    }
}
