//! Call Session Application Service (Use Case)
//!
//! Owns every mutation of stored call records: registration, status
//! reconciliation, transcript appends and persona replacement. Each
//! mutation is a read-modify-write followed by a publish, serialised by
//! `apply_lock` so concurrent webhook and poll deliveries for one call
//! cannot interleave.

use std::sync::Arc;
use tokio::sync::Mutex;

use ringside::{
    append_transcript, reconcile_status, CallEvent, CallRecord, CallRepository, DomainError,
    EventPublisher, Persona, Reconciliation, StatusUpdate, TranscriptOutcome,
};

/// Application service for call session state
pub struct CallSessionService<R: CallRepository> {
    repo: Arc<R>,
    publisher: Arc<dyn EventPublisher>,
    apply_lock: Mutex<()>,
}

impl<R: CallRepository> CallSessionService<R> {
    pub fn new(repo: Arc<R>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repo,
            publisher,
            apply_lock: Mutex::new(()),
        }
    }

    /// Store a freshly placed call and announce it
    pub async fn register(&self, record: CallRecord) -> Result<(), DomainError> {
        let _guard = self.apply_lock.lock().await;
        self.repo.save(&record).await?;

        tracing::info!(
            call_id = %record.id,
            phone_number = %record.phone_number,
            persona = %record.persona.display_name(),
            "Call registered"
        );
        self.publisher.publish(CallEvent::Started(record));
        Ok(())
    }

    /// Apply a status update from a webhook or a poll
    ///
    /// Returns `UnknownCall` when the call was never registered here; the
    /// store is left untouched in that case.
    pub async fn apply_status(&self, update: StatusUpdate) -> Result<Reconciliation, DomainError> {
        let _guard = self.apply_lock.lock().await;

        let Some(mut record) = self.repo.find_by_id(&update.call_id).await? else {
            tracing::warn!(
                call_id = %update.call_id,
                origin = %update.origin,
                status = %update.provider_status,
                "Status update for unknown call"
            );
            return Err(DomainError::UnknownCall(update.call_id));
        };

        let outcome = reconcile_status(&mut record, &update);
        match &outcome {
            Reconciliation::Applied { previous, status } => {
                self.repo.save(&record).await?;
                tracing::info!(
                    call_id = %record.id,
                    origin = %update.origin,
                    from = %previous,
                    status = %status,
                    ended_reason = record.ended_reason.as_deref().unwrap_or("-"),
                    "Call status changed"
                );
                self.publisher.publish(CallEvent::StatusChanged {
                    call_id: record.id.clone(),
                    previous: *previous,
                    status: *status,
                    ended_reason: record.ended_reason.clone(),
                    origin: update.origin,
                });
            }
            Reconciliation::AlreadyTerminal => tracing::debug!(
                call_id = %record.id,
                origin = %update.origin,
                status = %update.provider_status,
                "Dropped status update for completed call"
            ),
            Reconciliation::Unchanged | Reconciliation::Unmapped => tracing::debug!(
                call_id = %record.id,
                origin = %update.origin,
                status = %update.provider_status,
                outcome = ?outcome,
                "Status update not applied"
            ),
        }

        Ok(outcome)
    }

    /// Append a transcript segment stamped with the receipt time
    pub async fn append_transcript(
        &self,
        call_id: &str,
        speaker: &str,
        text: &str,
    ) -> Result<TranscriptOutcome, DomainError> {
        let _guard = self.apply_lock.lock().await;

        let Some(mut record) = self.repo.find_by_id(call_id).await? else {
            tracing::warn!(call_id, "Transcript for unknown call");
            return Err(DomainError::UnknownCall(call_id.to_string()));
        };

        let outcome = append_transcript(&mut record, speaker, text);
        match &outcome {
            TranscriptOutcome::Appended(segment) => {
                self.repo.save(&record).await?;
                tracing::debug!(
                    call_id,
                    speaker,
                    segments = record.transcript.len(),
                    "Transcript appended"
                );
                self.publisher.publish(CallEvent::TranscriptAppended {
                    call_id: record.id.clone(),
                    segment: segment.clone(),
                    transcript: record.transcript.clone(),
                });
            }
            TranscriptOutcome::Dropped => {
                tracing::debug!(call_id, speaker, "Dropped transcript for completed call")
            }
        }

        Ok(outcome)
    }

    /// Replace the stored persona. Accepted in any status.
    pub async fn replace_persona(
        &self,
        call_id: &str,
        persona: Persona,
    ) -> Result<CallRecord, DomainError> {
        let _guard = self.apply_lock.lock().await;

        let mut record = self
            .repo
            .find_by_id(call_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Call", call_id))?;

        record.persona = persona;
        self.repo.save(&record).await?;

        tracing::info!(call_id, persona = %record.persona.display_name(), "Persona updated");
        self.publisher.publish(CallEvent::PersonaUpdated {
            call_id: record.id.clone(),
            persona: record.persona.clone(),
        });

        Ok(record)
    }

    /// Get a call by ID
    pub async fn get(&self, call_id: &str) -> Result<CallRecord, DomainError> {
        self.repo
            .find_by_id(call_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Call", call_id))
    }

    /// All calls, oldest first
    pub async fn list(&self) -> Result<Vec<CallRecord>, DomainError> {
        self.repo.find_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryCallRepository;
    use crate::testing::{record, RecordingPublisher};
    use ringside::{CallStatus, UNKNOWN_ENDED_REASON};

    async fn service() -> (
        CallSessionService<InMemoryCallRepository>,
        Arc<RecordingPublisher>,
    ) {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = CallSessionService::new(
            Arc::new(InMemoryCallRepository::new()),
            publisher.clone(),
        );
        service.register(record("call-1")).await.unwrap();
        publisher.clear();
        (service, publisher)
    }

    #[tokio::test]
    async fn test_register_publishes_started() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service =
            CallSessionService::new(Arc::new(InMemoryCallRepository::new()), publisher.clone());

        service.register(record("call-9")).await.unwrap();

        assert_eq!(service.get("call-9").await.unwrap().status, CallStatus::Initiated);
        assert_eq!(publisher.wire_names(), vec!["call-started"]);
    }

    #[tokio::test]
    async fn test_duplicate_completion_broadcasts_once() {
        let (service, publisher) = service().await;
        let update = StatusUpdate::webhook("call-1", "completed")
            .with_ended_reason(Some("hangup".to_string()));

        assert!(service.apply_status(update.clone()).await.unwrap().is_applied());
        let first = service.get("call-1").await.unwrap();

        assert_eq!(
            service.apply_status(update).await.unwrap(),
            Reconciliation::AlreadyTerminal
        );
        let second = service.get("call-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(publisher.events().len(), 1);
        assert_eq!(second.ended_reason.as_deref(), Some("hangup"));
    }

    #[tokio::test]
    async fn test_terminal_guard_blocks_status_and_transcript() {
        let (service, publisher) = service().await;
        service
            .apply_status(StatusUpdate::webhook("call-1", "ended"))
            .await
            .unwrap();
        publisher.clear();

        let late_status = service
            .apply_status(StatusUpdate::poll("call-1", "in-progress"))
            .await
            .unwrap();
        let late_segment = service
            .append_transcript("call-1", "user", "still there?")
            .await
            .unwrap();

        assert_eq!(late_status, Reconciliation::AlreadyTerminal);
        assert_eq!(late_segment, TranscriptOutcome::Dropped);

        let stored = service.get("call-1").await.unwrap();
        assert_eq!(stored.status, CallStatus::Completed);
        assert_eq!(stored.ended_reason.as_deref(), Some(UNKNOWN_ENDED_REASON));
        assert!(stored.transcript.is_empty());
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_ordering_independence() {
        let orders = [
            [
                StatusUpdate::poll("call-1", "in-progress"),
                StatusUpdate::webhook("call-1", "completed")
                    .with_ended_reason(Some("customer-ended-call".to_string())),
            ],
            [
                StatusUpdate::webhook("call-1", "completed")
                    .with_ended_reason(Some("customer-ended-call".to_string())),
                StatusUpdate::poll("call-1", "in-progress"),
            ],
        ];

        for updates in orders {
            let (service, _) = service().await;
            for update in updates {
                service.apply_status(update).await.unwrap();
            }
            let stored = service.get("call-1").await.unwrap();
            assert_eq!(stored.status, CallStatus::Completed);
            assert_eq!(stored.ended_reason.as_deref(), Some("customer-ended-call"));
        }
    }

    #[tokio::test]
    async fn test_unknown_call_is_not_stored() {
        let (service, publisher) = service().await;

        let status = service
            .apply_status(StatusUpdate::webhook("ghost", "in-progress"))
            .await;
        let transcript = service.append_transcript("ghost", "user", "hi").await;

        assert!(matches!(status, Err(DomainError::UnknownCall(id)) if id == "ghost"));
        assert!(matches!(transcript, Err(DomainError::UnknownCall(_))));
        assert_eq!(service.list().await.unwrap().len(), 1);
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_status_is_not_broadcast() {
        let (service, publisher) = service().await;

        service
            .apply_status(StatusUpdate::webhook("call-1", "ringing"))
            .await
            .unwrap();
        let repeat = service
            .apply_status(StatusUpdate::poll("call-1", "in-progress"))
            .await
            .unwrap();
        let unmapped = service
            .apply_status(StatusUpdate::poll("call-1", "queued"))
            .await
            .unwrap();

        assert_eq!(repeat, Reconciliation::Unchanged);
        assert_eq!(unmapped, Reconciliation::Unmapped);
        assert_eq!(
            publisher.wire_names(),
            vec!["call-status-update", "call-started"]
        );
    }

    #[tokio::test]
    async fn test_transcript_event_carries_full_transcript() {
        let (service, publisher) = service().await;

        service.append_transcript("call-1", "assistant", "Hello").await.unwrap();
        service.append_transcript("call-1", "user", "Hi").await.unwrap();

        let events = publisher.events();
        match events.last() {
            Some(CallEvent::TranscriptAppended {
                segment,
                transcript,
                ..
            }) => {
                assert_eq!(segment.text, "Hi");
                assert_eq!(transcript.len(), 2);
                assert_eq!(transcript[0].speaker, "assistant");
            }
            other => panic!("Expected transcript event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_replace_persona_on_completed_call() {
        let (service, publisher) = service().await;
        service
            .apply_status(StatusUpdate::webhook("call-1", "failed"))
            .await
            .unwrap();
        publisher.clear();

        let updated = service
            .replace_persona("call-1", Persona::named("Sam"))
            .await
            .unwrap();

        assert_eq!(updated.persona.display_name(), "Sam");
        assert_eq!(updated.status, CallStatus::Completed);
        assert_eq!(
            publisher.wire_names(),
            vec!["persona-updated", "personaUpdated"]
        );

        assert!(matches!(
            service.replace_persona("ghost", Persona::default()).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
