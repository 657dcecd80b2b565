//! Stateless USSD menu for beehive cover quotes.
//!
//! The gateway posts the whole `*`-joined answer history on every callback. Each request is
//! decoded, routed through the [`SessionMachine`] by history depth, scored when the
//! questionnaire is complete and rendered into a single `CON`/`END` reply. Nothing is kept
//! between callbacks, so any replica can answer any step of any session.

pub mod catalog;
pub mod decoder;
pub mod payment;
pub mod render;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, CatalogLookupMiss, Language, Notice, ScreenCatalog};
pub use decoder::{decode, SessionHistory};
pub use payment::{LoggingPaymentTrigger, PaymentRequest, PaymentTrigger};
pub use render::{render, ReplyKind, WireReply};
pub use router::ussd_router;
pub use scoring::{
    BearerToken, CredentialError, CredentialProvider, HttpScoringClient, Kes, Prediction,
    PredictionInstance, Quote, QuoteSource, ScoringClient, ScoringEngine, ScoringError,
    StaticCredentialProvider,
};
pub use service::{UssdRequest, UssdService};
pub use session::{Decision, Outcome, SessionError, SessionMachine, SessionState};
pub use validation::{AnswerSet, Field, ReasonCode, ValidationError};

use std::sync::Arc;

use crate::config::ScoringConfig;

/// Wires the standard catalog, the HTTP scoring client and the configured credential into
/// a ready service.
pub fn build_service(
    scoring: &ScoringConfig,
    payments: Arc<dyn PaymentTrigger>,
) -> Result<UssdService, crate::error::AppError> {
    let catalog = Arc::new(ScreenCatalog::standard()?);
    let credentials = Arc::new(StaticCredentialProvider::from_config(scoring));
    let client = Arc::new(HttpScoringClient::from_config(scoring)?);
    let engine = Arc::new(ScoringEngine::new(credentials, client, scoring.timeout));
    Ok(UssdService::new(catalog, engine, payments))
}
