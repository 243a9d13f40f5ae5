//! Cancellation and deadlines for outbound calls

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::InventoryError;

/// Why a call stopped before completing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    Cancelled,
    DeadlineExceeded,
}

impl From<Interrupted> for InventoryError {
    fn from(reason: Interrupted) -> Self {
        match reason {
            Interrupted::Cancelled => InventoryError::Cancelled,
            Interrupted::DeadlineExceeded => InventoryError::DeadlineExceeded,
        }
    }
}

/// Carries a cancellation token and an optional deadline into every call
///
/// Cloning shares the token: cancelling any clone cancels them all. A child
/// context is cancelled with its parent but can be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A child context with the same deadline
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// A child context whose deadline is at most `timeout` from now
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// A child context with the earlier of the existing and given deadlines
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle for cancelling this context from elsewhere, e.g. a signal handler
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Drive `fut` until it completes, the context is cancelled, or the
    /// deadline passes; in the latter two cases `fut` is dropped
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        if self.token.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }

        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Interrupted::Cancelled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = RequestContext::new();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let ctx = RequestContext::new();
        ctx.cancel();
        assert_eq!(ctx.run(async { 7 }).await, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn test_parent_cancel_reaches_child() {
        let parent = RequestContext::new();
        let child = parent.child();
        let handle = tokio::spawn(async move {
            child
                .run(tokio::time::sleep(Duration::from_secs(30)))
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        parent.cancel();
        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("child should stop promptly")
            .unwrap();
        assert_eq!(result, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn test_child_cancel_does_not_reach_parent() {
        let parent = RequestContext::new();
        let child = parent.child();
        child.cancel();
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(20));
        let result = ctx.run(tokio::time::sleep(Duration::from_secs(30))).await;
        assert_eq!(result, Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_earlier_deadline_wins() {
        let outer = RequestContext::new().with_timeout(Duration::from_millis(10));
        let inner = outer.with_timeout(Duration::from_secs(60));
        assert_eq!(inner.deadline(), outer.deadline());
    }
}
