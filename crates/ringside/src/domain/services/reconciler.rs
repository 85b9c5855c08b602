//! Reconciliation rules for call records
//!
//! Status updates arrive from two unordered sources (webhooks and polls),
//! possibly duplicated. Both rules below are idempotent: re-applying an
//! update, or applying a stale one after the call completed, never
//! regresses a record.

use crate::domain::entities::{CallRecord, StatusUpdate, TranscriptSegment};
use crate::domain::value_objects::CallStatus;

/// Stored when a call completes without the provider saying why
pub const UNKNOWN_ENDED_REASON: &str = "unknown";

/// What applying a status update did to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Status moved forward; subscribers must be notified
    Applied {
        previous: CallStatus,
        status: CallStatus,
    },
    /// Mapped status does not outrank the stored one
    Unchanged,
    /// Provider status has no canonical meaning
    Unmapped,
    /// Record already completed; update dropped
    AlreadyTerminal,
}

impl Reconciliation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Reconciliation::Applied { .. })
    }
}

/// Apply a status update to a record
pub fn reconcile_status(record: &mut CallRecord, update: &StatusUpdate) -> Reconciliation {
    let Some(target) = update.provider_status.canonical() else {
        return Reconciliation::Unmapped;
    };

    if record.status.is_terminal() {
        return Reconciliation::AlreadyTerminal;
    }

    if target.rank() <= record.status.rank() {
        return Reconciliation::Unchanged;
    }

    let previous = record.status;
    record.status = target;

    if target.is_terminal() && record.ended_reason.is_none() {
        let reason = update
            .ended_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(UNKNOWN_ENDED_REASON);
        record.ended_reason = Some(reason.to_string());
    }

    Reconciliation::Applied {
        previous,
        status: target,
    }
}

/// What appending a transcript segment did to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    Appended(TranscriptSegment),
    /// Call already completed; segment treated as late data
    Dropped,
}

/// Append a segment stamped with the receipt time
pub fn append_transcript(
    record: &mut CallRecord,
    speaker: impl Into<String>,
    text: impl Into<String>,
) -> TranscriptOutcome {
    if record.is_completed() {
        return TranscriptOutcome::Dropped;
    }

    let segment = TranscriptSegment::received_now(speaker, text);
    record.transcript.push(segment.clone());
    TranscriptOutcome::Appended(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Persona;
    use crate::domain::value_objects::PhoneNumber;

    fn record() -> CallRecord {
        CallRecord::new(
            "call-1",
            PhoneNumber::parse("+15551234567").unwrap(),
            Persona::named("Alex"),
            "assistant-1",
        )
    }

    #[test]
    fn test_ringing_moves_to_in_progress() {
        let mut call = record();
        let outcome = reconcile_status(&mut call, &StatusUpdate::poll("call-1", "ringing"));
        assert_eq!(
            outcome,
            Reconciliation::Applied {
                previous: CallStatus::Initiated,
                status: CallStatus::InProgress
            }
        );
        assert_eq!(call.status, CallStatus::InProgress);
        assert_eq!(call.ended_reason, None);
    }

    #[test]
    fn test_duplicate_completion_is_idempotent() {
        let mut call = record();
        let update = StatusUpdate::webhook("call-1", "ended")
            .with_ended_reason(Some("customer-ended-call".to_string()));

        assert!(reconcile_status(&mut call, &update).is_applied());
        let after_first = call.clone();

        assert_eq!(
            reconcile_status(&mut call, &update),
            Reconciliation::AlreadyTerminal
        );
        assert_eq!(call, after_first);
    }

    #[test]
    fn test_completed_record_ignores_later_in_progress() {
        let mut call = record();
        reconcile_status(&mut call, &StatusUpdate::webhook("call-1", "completed"));

        let outcome = reconcile_status(&mut call, &StatusUpdate::poll("call-1", "in-progress"));
        assert_eq!(outcome, Reconciliation::AlreadyTerminal);
        assert_eq!(call.status, CallStatus::Completed);
    }

    #[test]
    fn test_order_of_sources_does_not_matter() {
        let progress = StatusUpdate::poll("call-1", "in-progress");
        let ended = StatusUpdate::webhook("call-1", "ended")
            .with_ended_reason(Some("assistant-ended-call".to_string()));

        let mut forward = record();
        reconcile_status(&mut forward, &progress);
        reconcile_status(&mut forward, &ended);

        let mut reverse = record();
        reconcile_status(&mut reverse, &ended);
        reconcile_status(&mut reverse, &progress);

        assert_eq!(forward.status, CallStatus::Completed);
        assert_eq!(reverse.status, CallStatus::Completed);
        assert_eq!(forward.ended_reason, reverse.ended_reason);
        assert_eq!(forward.ended_reason.as_deref(), Some("assistant-ended-call"));
    }

    #[test]
    fn test_missing_reason_defaults_to_unknown() {
        let mut call = record();
        reconcile_status(&mut call, &StatusUpdate::poll("call-1", "failed"));
        assert_eq!(call.ended_reason.as_deref(), Some(UNKNOWN_ENDED_REASON));
    }

    #[test]
    fn test_blank_reason_defaults_to_unknown() {
        let mut call = record();
        let update =
            StatusUpdate::webhook("call-1", "ended").with_ended_reason(Some("  ".to_string()));
        reconcile_status(&mut call, &update);
        assert_eq!(call.ended_reason.as_deref(), Some(UNKNOWN_ENDED_REASON));
    }

    #[test]
    fn test_existing_reason_is_not_overwritten() {
        let mut call = record();
        call.ended_reason = Some("silence-timed-out".to_string());
        let update = StatusUpdate::webhook("call-1", "ended")
            .with_ended_reason(Some("customer-ended-call".to_string()));

        reconcile_status(&mut call, &update);
        assert_eq!(call.ended_reason.as_deref(), Some("silence-timed-out"));
    }

    #[test]
    fn test_same_status_is_unchanged() {
        let mut call = record();
        reconcile_status(&mut call, &StatusUpdate::webhook("call-1", "in-progress"));
        let outcome = reconcile_status(&mut call, &StatusUpdate::poll("call-1", "ringing"));
        assert_eq!(outcome, Reconciliation::Unchanged);
    }

    #[test]
    fn test_unmapped_status_is_noop() {
        let mut call = record();
        let outcome = reconcile_status(&mut call, &StatusUpdate::poll("call-1", "queued"));
        assert_eq!(outcome, Reconciliation::Unmapped);
        assert_eq!(call.status, CallStatus::Initiated);
    }

    #[test]
    fn test_transcript_appends_until_completed() {
        let mut call = record();
        assert!(matches!(
            append_transcript(&mut call, "assistant", "Hello"),
            TranscriptOutcome::Appended(ref s) if s.text == "Hello"
        ));
        assert_eq!(call.transcript.len(), 1);

        reconcile_status(&mut call, &StatusUpdate::webhook("call-1", "ended"));
        assert_eq!(
            append_transcript(&mut call, "user", "Bye"),
            TranscriptOutcome::Dropped
        );
        assert_eq!(call.transcript.len(), 1);
    }
}
