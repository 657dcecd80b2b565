use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info};

use super::catalog::ScreenCatalog;
use super::decoder::decode;
use super::payment::{PaymentRequest, PaymentTrigger};
use super::render::{render, WireReply};
use super::scoring::ScoringEngine;
use super::session::{Decision, Outcome, SessionMachine};

/// Form fields posted by the gateway on every callback. Absent fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UssdRequest {
    pub session_id: String,
    pub service_code: String,
    pub phone_number: String,
    pub text: String,
}

/// One callback in, one reply out. Holds only shared, read-only collaborators.
pub struct UssdService {
    machine: SessionMachine,
    catalog: Arc<ScreenCatalog>,
    payments: Arc<dyn PaymentTrigger>,
}

impl UssdService {
    pub fn new(
        catalog: Arc<ScreenCatalog>,
        scoring: Arc<ScoringEngine>,
        payments: Arc<dyn PaymentTrigger>,
    ) -> Self {
        Self {
            machine: SessionMachine::new(catalog.clone(), scoring),
            catalog,
            payments,
        }
    }

    pub async fn handle(&self, request: &UssdRequest) -> WireReply {
        let history = decode(&request.text);
        let decision = self.machine.decide(&history).await;
        let state = decision.outcome.state();

        info!(
            session_id = %request.session_id,
            service_code = %request.service_code,
            level = history.level(),
            language = %decision.language,
            ?state,
            "ussd step decided"
        );

        if let Outcome::PaymentConfirmed(answers) = &decision.outcome {
            info!(
                session_id = %request.session_id,
                hive_count = answers.hive_count,
                "quote accepted"
            );
            self.payments.initiate(PaymentRequest {
                session_id: request.session_id.clone(),
                phone_number: request.phone_number.clone(),
                answers: answers.clone(),
                requested_at: Utc::now(),
            });
        }

        self.reply(&decision, &request.session_id)
    }

    fn reply(&self, decision: &Decision, session_id: &str) -> WireReply {
        match render(decision, &self.catalog) {
            Ok(reply) => reply,
            Err(miss) => {
                error!(session_id, step = miss.step, "decided screen missing from catalog");
                WireReply::system_error(decision.language)
            }
        }
    }
}

impl std::fmt::Debug for UssdService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UssdService")
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}
