//! Reset strategies.

use iwf_proto::{ResetType, WorkflowResetRequest};

/// How to pick the point a reset forks the new run from.
///
/// Each variant carries only the fields its strategy uses. Values are
/// forwarded to the server unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetSpec {
    /// Reset to a history event. The event is exclusive in the new run,
    /// which forks from the event before it.
    HistoryEventId { event_id: i32 },
    /// Reset to before the first decision made by a bad worker binary
    BadBinary { checksum: String },
    /// Reset to the first decision completed after `earliest_time`.
    ///
    /// Accepts an RFC 3339 timestamp, raw unix nanos, or a range such as
    /// `15m` meaning the last 15 minutes.
    DecisionCompletedTime { earliest_time: String },
    /// Reset to the last completed decision, moved back by a negative
    /// `decision_offset`
    LastDecisionCompleted { decision_offset: i32 },
}

impl ResetSpec {
    pub fn reset_type(&self) -> ResetType {
        match self {
            ResetSpec::HistoryEventId { .. } => ResetType::HistoryEventId,
            ResetSpec::BadBinary { .. } => ResetType::BadBinary,
            ResetSpec::DecisionCompletedTime { .. } => ResetType::DecisionCompletedTime,
            ResetSpec::LastDecisionCompleted { .. } => ResetType::LastDecisionCompleted,
        }
    }

    pub(crate) fn into_request(
        self,
        workflow_id: String,
        workflow_run_id: String,
        reason: String,
        skip_signal_reapply: bool,
    ) -> WorkflowResetRequest {
        let mut request = WorkflowResetRequest {
            workflow_id,
            workflow_run_id,
            reset_type: self.reset_type(),
            history_event_id: None,
            reason,
            decision_offset: None,
            reset_bad_binary_checksum: None,
            earliest_time: None,
            skip_signal_reapply,
        };
        match self {
            ResetSpec::HistoryEventId { event_id } => request.history_event_id = Some(event_id),
            ResetSpec::BadBinary { checksum } => request.reset_bad_binary_checksum = Some(checksum),
            ResetSpec::DecisionCompletedTime { earliest_time } => {
                request.earliest_time = Some(earliest_time)
            }
            ResetSpec::LastDecisionCompleted { decision_offset } => {
                request.decision_offset = Some(decision_offset)
            }
        }
        request
    }
}
