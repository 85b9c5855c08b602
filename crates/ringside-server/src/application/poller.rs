//! Fallback Poller
//!
//! One delayed status check per placed call, covering webhooks that are
//! late or never configured. Best effort: failures are logged, never
//! retried, and a check for a call that already completed is absorbed by
//! the terminal guard rather than cancelled.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use ringside::{
    CallRepository, CallStatusSource, DomainError, ProviderCallStatus, Reconciliation,
    StatusUpdate,
};

use super::CallSessionService;

pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(5);

pub struct FallbackPoller<R: CallRepository> {
    sessions: Arc<CallSessionService<R>>,
    status_source: Arc<dyn CallStatusSource>,
    delay: Duration,
}

impl<R: CallRepository> Clone for FallbackPoller<R> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            status_source: Arc::clone(&self.status_source),
            delay: self.delay,
        }
    }
}

impl<R: CallRepository + 'static> FallbackPoller<R> {
    pub fn new(
        sessions: Arc<CallSessionService<R>>,
        status_source: Arc<dyn CallStatusSource>,
        delay: Duration,
    ) -> Self {
        Self {
            sessions,
            status_source,
            delay,
        }
    }

    /// Spawn the single deferred check for `call_id`
    pub fn schedule(&self, call_id: String) -> JoinHandle<()> {
        let poller = self.clone();
        tracing::debug!(call_id = %call_id, delay_ms = self.delay.as_millis() as u64, "Fallback poll scheduled");

        tokio::spawn(async move {
            tokio::time::sleep(poller.delay).await;

            match poller.poll_now(&call_id).await {
                Ok((reported, outcome)) => tracing::info!(
                    call_id = %call_id,
                    status = %reported.status,
                    applied = outcome.is_applied(),
                    "Fallback poll finished"
                ),
                Err(e) => tracing::warn!(call_id = %call_id, error = %e, "Fallback poll failed"),
            }
        })
    }

    /// Query the provider now and feed the answer through reconciliation
    pub async fn poll_now(
        &self,
        call_id: &str,
    ) -> Result<(ProviderCallStatus, Reconciliation), DomainError> {
        let reported = self.status_source.fetch_status(call_id).await?;

        let update = StatusUpdate::poll(call_id, reported.status.clone())
            .with_ended_reason(reported.ended_reason.clone());
        let outcome = self.sessions.apply_status(update).await?;

        Ok((reported, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryCallRepository;
    use crate::testing::{record, FakeVoiceProvider, RecordingPublisher};
    use ringside::{CallStatus, ProviderError};

    async fn setup() -> (
        FallbackPoller<InMemoryCallRepository>,
        Arc<CallSessionService<InMemoryCallRepository>>,
        Arc<FakeVoiceProvider>,
    ) {
        let sessions = Arc::new(CallSessionService::new(
            Arc::new(InMemoryCallRepository::new()),
            Arc::new(RecordingPublisher::default()),
        ));
        sessions.register(record("call-1")).await.unwrap();

        let provider = Arc::new(FakeVoiceProvider::default());
        let poller = FallbackPoller::new(sessions.clone(), provider.clone(), DEFAULT_POLL_DELAY);
        (poller, sessions, provider)
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_check_after_delay() {
        let (poller, sessions, provider) = setup().await;
        provider.set_status("call-1", "ringing", None);

        let handle = poller.schedule("call-1".to_string());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(provider.fetches(), 0);

        handle.await.unwrap();
        assert_eq!(provider.fetches(), 1);
        assert_eq!(
            sessions.get("call-1").await.unwrap().status,
            CallStatus::InProgress
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_poll_after_webhook_completion_is_absorbed() {
        let (poller, sessions, provider) = setup().await;
        provider.set_status("call-1", "in-progress", None);

        let handle = poller.schedule("call-1".to_string());
        sessions
            .apply_status(
                StatusUpdate::webhook("call-1", "ended")
                    .with_ended_reason(Some("customer-ended-call".to_string())),
            )
            .await
            .unwrap();

        handle.await.unwrap();

        let stored = sessions.get("call-1").await.unwrap();
        assert_eq!(provider.fetches(), 1);
        assert_eq!(stored.status, CallStatus::Completed);
        assert_eq!(stored.ended_reason.as_deref(), Some("customer-ended-call"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_is_swallowed() {
        let (poller, sessions, provider) = setup().await;
        provider.fail_status(ProviderError::new("upstream down").with_status(503));

        poller.schedule("call-1".to_string()).await.unwrap();

        assert_eq!(provider.fetches(), 1);
        assert_eq!(
            sessions.get("call-1").await.unwrap().status,
            CallStatus::Initiated
        );
    }

    #[tokio::test]
    async fn test_poll_now_applies_ended_reason() {
        let (poller, sessions, provider) = setup().await;
        provider.set_status("call-1", "ended", None);

        let (reported, outcome) = poller.poll_now("call-1").await.unwrap();

        assert_eq!(reported.status, ringside::ProviderStatus::Ended);
        assert!(outcome.is_applied());
        assert_eq!(
            sessions.get("call-1").await.unwrap().ended_reason.as_deref(),
            Some("unknown")
        );
    }
}
