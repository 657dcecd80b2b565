use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::validation::AnswerSet;

/// Collection request raised once a caller confirms their quote. Carries the validated
/// answers rather than an amount; the payment collaborator owns final pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub session_id: String,
    pub phone_number: String,
    pub answers: AnswerSet,
    pub requested_at: DateTime<Utc>,
}

/// Fire-and-forget hand-off to the payment collaborator. Implementations must not block
/// the reply; anything slow belongs on a spawned task.
pub trait PaymentTrigger: Send + Sync {
    fn initiate(&self, request: PaymentRequest);
}

/// Records the request in the service log and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPaymentTrigger;

impl PaymentTrigger for LoggingPaymentTrigger {
    fn initiate(&self, request: PaymentRequest) {
        info!(
            session_id = %request.session_id,
            phone_number = %request.phone_number,
            hive_count = request.answers.hive_count,
            location = %request.answers.location,
            requested_at = %request.requested_at,
            "payment initiation requested"
        );
    }
}
