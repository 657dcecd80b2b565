//! Risk scoring for completed questionnaires.
//!
//! Quotes come from the remote prediction service when a credential is available, from a
//! deterministic local formula when it is not, and from a flat-rate fallback when the remote
//! call fails. The engine never hands a transport or decoding fault back to the session:
//! every path ends in a usable [`Quote`].

mod credentials;
pub mod formula;
mod remote;

pub use credentials::{BearerToken, CredentialError, CredentialProvider, StaticCredentialProvider};
pub use remote::HttpScoringClient;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::validation::AnswerSet;

/// Whole Kenyan shillings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Kes(pub u64);

impl Kes {
    pub const fn amount(self) -> u64 {
        self.0
    }
}

/// Which scoring path produced a quote. Kept for audit and tests; never shown to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Remote,
    LocalFormula,
    CoarseFallback,
}

impl QuoteSource {
    pub const fn label(self) -> &'static str {
        match self {
            QuoteSource::Remote => "remote",
            QuoteSource::LocalFormula => "local_formula",
            QuoteSource::CoarseFallback => "coarse_fallback",
        }
    }
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    risk_score: u8,
    premium: Kes,
    cover_amount: Kes,
    source: QuoteSource,
}

impl Quote {
    pub(crate) fn new(risk_score: u8, premium: Kes, cover_amount: Kes, source: QuoteSource) -> Self {
        Self {
            risk_score: risk_score.min(100),
            premium,
            cover_amount,
            source,
        }
    }

    /// Converts a raw prediction, clamping the risk score into `0..=100`. Non-finite or
    /// non-positive amounts reject the prediction.
    pub fn from_prediction(prediction: &Prediction) -> Result<Self, ScoringError> {
        let premium = whole_shillings(prediction.premium)
            .ok_or_else(|| ScoringError::InvalidPrediction(format!("premium {}", prediction.premium)))?;
        let cover = whole_shillings(prediction.cover_amount).ok_or_else(|| {
            ScoringError::InvalidPrediction(format!("cover_amount {}", prediction.cover_amount))
        })?;
        if !prediction.risk_score.is_finite() {
            return Err(ScoringError::InvalidPrediction(format!(
                "risk_score {}",
                prediction.risk_score
            )));
        }

        let risk = prediction.risk_score.round();
        if !(0.0..=100.0).contains(&risk) {
            warn!(
                risk_score = prediction.risk_score,
                "remote risk score outside 0..=100, clamping"
            );
        }
        let risk = risk.clamp(0.0, 100.0) as u8;

        Ok(Self::new(risk, Kes(premium), Kes(cover), QuoteSource::Remote))
    }

    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    pub fn premium(&self) -> Kes {
        self.premium
    }

    pub fn cover_amount(&self) -> Kes {
        self.cover_amount
    }

    pub fn source(&self) -> QuoteSource {
        self.source
    }
}

fn whole_shillings(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    (rounded >= 1.0 && rounded <= u64::MAX as f64).then_some(rounded as u64)
}

/// Feature row sent to the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInstance {
    pub location: String,
    pub hive_count: u32,
    pub health_index: u8,
    pub experience_years: u32,
    pub prevention_practice: bool,
}

impl From<&AnswerSet> for PredictionInstance {
    fn from(answers: &AnswerSet) -> Self {
        Self {
            location: answers.location.clone(),
            hive_count: answers.hive_count,
            health_index: answers.health_rating,
            experience_years: answers.experience_years,
            prevention_practice: answers.prevention_practice,
        }
    }
}

/// First entry of the prediction service response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub risk_score: f64,
    pub premium: f64,
    pub cover_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("scoring client could not be built: {0}")]
    Client(String),
    #[error("scoring transport failed: {0}")]
    Transport(String),
    #[error("scoring service answered with status {0}")]
    Status(u16),
    #[error("scoring response could not be decoded: {0}")]
    Decode(String),
    #[error("scoring response carried no predictions")]
    EmptyPredictions,
    #[error("scoring prediction rejected: {0}")]
    InvalidPrediction(String),
    #[error("scoring call exceeded {0:?}")]
    Timeout(Duration),
}

/// Outbound port to the remote prediction service.
#[async_trait]
pub trait ScoringClient: Send + Sync {
    async fn predict(
        &self,
        token: &BearerToken,
        instance: &PredictionInstance,
    ) -> Result<Prediction, ScoringError>;
}

/// Chooses between the remote, local and coarse scoring paths.
pub struct ScoringEngine {
    credentials: Arc<dyn CredentialProvider>,
    client: Arc<dyn ScoringClient>,
    timeout: Duration,
}

impl ScoringEngine {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        client: Arc<dyn ScoringClient>,
        timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            client,
            timeout,
        }
    }

    pub async fn score(&self, answers: &AnswerSet) -> Quote {
        let token = match self.credentials.token().await {
            Ok(token) => token,
            Err(err) => {
                info!(reason = %err, "scoring credential unavailable, using local formula");
                return formula::local_quote(answers);
            }
        };

        match self.remote_quote(&token, answers).await {
            Ok(quote) => {
                debug!(risk_score = quote.risk_score(), "remote quote received");
                quote
            }
            Err(err) => {
                warn!(error = %err, "remote scoring failed, using coarse fallback");
                formula::coarse_quote(answers)
            }
        }
    }

    async fn remote_quote(
        &self,
        token: &BearerToken,
        answers: &AnswerSet,
    ) -> Result<Quote, ScoringError> {
        let instance = PredictionInstance::from(answers);
        let prediction = tokio::time::timeout(self.timeout, self.client.predict(token, &instance))
            .await
            .map_err(|_| ScoringError::Timeout(self.timeout))??;
        Quote::from_prediction(&prediction)
    }
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
