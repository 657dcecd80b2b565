use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;

use crate::ussd::payment::{PaymentRequest, PaymentTrigger};
use crate::ussd::scoring::{
    BearerToken, CredentialError, CredentialProvider, Prediction, PredictionInstance,
    ScoringClient, ScoringEngine, ScoringError,
};
use crate::ussd::{ussd_router, ScreenCatalog, SessionMachine, UssdRequest, UssdService};

pub(super) const REFERENCE_ANSWERS: &str = "1*5*4*3*1*Nairobi-Kasarani";

pub(super) fn catalog() -> Arc<ScreenCatalog> {
    Arc::new(ScreenCatalog::standard().expect("standard catalog"))
}

pub(super) struct FixedCredentials(pub(super) Option<&'static str>);

#[async_trait]
impl CredentialProvider for FixedCredentials {
    async fn token(&self) -> Result<BearerToken, CredentialError> {
        self.0
            .map(BearerToken::new)
            .ok_or(CredentialError::Unavailable)
    }
}

pub(super) struct FailingCredentials;

#[async_trait]
impl CredentialProvider for FailingCredentials {
    async fn token(&self) -> Result<BearerToken, CredentialError> {
        Err(CredentialError::Provider("metadata server unreachable".to_string()))
    }
}

/// Scoring client answering with a canned result after an optional delay.
pub(super) struct StubClient {
    result: Result<Prediction, ScoringError>,
    first_failure: Mutex<Option<ScoringError>>,
    delay: Duration,
    calls: AtomicUsize,
    last_instance: Mutex<Option<PredictionInstance>>,
}

impl StubClient {
    pub(super) fn answering(risk_score: f64, premium: f64, cover_amount: f64) -> Self {
        Self::with_result(Ok(Prediction {
            risk_score,
            premium,
            cover_amount,
        }))
    }

    pub(super) fn failing(err: ScoringError) -> Self {
        Self::with_result(Err(err))
    }

    pub(super) fn with_result(result: Result<Prediction, ScoringError>) -> Self {
        Self {
            result,
            first_failure: Mutex::new(None),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            last_instance: Mutex::new(None),
        }
    }

    /// Fails the first call with `err`, then answers with the canned result.
    pub(super) fn failing_first(self, err: ScoringError) -> Self {
        *self.first_failure.lock().expect("failure mutex poisoned") = Some(err);
        self
    }

    pub(super) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_instance(&self) -> Option<PredictionInstance> {
        self.last_instance.lock().expect("instance mutex poisoned").clone()
    }
}

#[async_trait]
impl ScoringClient for StubClient {
    async fn predict(
        &self,
        _token: &BearerToken,
        instance: &PredictionInstance,
    ) -> Result<Prediction, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_instance.lock().expect("instance mutex poisoned") = Some(instance.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let first_failure = self.first_failure.lock().expect("failure mutex poisoned").take();
        match first_failure {
            Some(err) => Err(err),
            None => self.result.clone(),
        }
    }
}

#[derive(Default)]
pub(super) struct RecordingPayments {
    requests: Mutex<Vec<PaymentRequest>>,
}

impl RecordingPayments {
    pub(super) fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().expect("payment mutex poisoned").clone()
    }
}

impl PaymentTrigger for RecordingPayments {
    fn initiate(&self, request: PaymentRequest) {
        self.requests
            .lock()
            .expect("payment mutex poisoned")
            .push(request);
    }
}

pub(super) fn engine(
    credentials: impl CredentialProvider + 'static,
    client: Arc<StubClient>,
) -> Arc<ScoringEngine> {
    Arc::new(ScoringEngine::new(
        Arc::new(credentials),
        client,
        Duration::from_secs(1),
    ))
}

/// Engine without a credential, so every quote comes from the local formula.
pub(super) fn offline_engine() -> Arc<ScoringEngine> {
    engine(
        FixedCredentials(None),
        Arc::new(StubClient::failing(ScoringError::EmptyPredictions)),
    )
}

pub(super) fn machine() -> SessionMachine {
    SessionMachine::new(catalog(), offline_engine())
}

pub(super) fn service_with(
    scoring: Arc<ScoringEngine>,
) -> (Arc<UssdService>, Arc<RecordingPayments>) {
    let payments = Arc::new(RecordingPayments::default());
    let service = Arc::new(UssdService::new(catalog(), scoring, payments.clone()));
    (service, payments)
}

pub(super) fn offline_service() -> (Arc<UssdService>, Arc<RecordingPayments>) {
    service_with(offline_engine())
}

pub(super) fn request(text: &str) -> UssdRequest {
    UssdRequest {
        session_id: "ATUid_test".to_string(),
        service_code: "*384*21#".to_string(),
        phone_number: "+254711000111".to_string(),
        text: text.to_string(),
    }
}

pub(super) fn router() -> (axum::Router, Arc<RecordingPayments>) {
    let (service, payments) = offline_service();
    (ussd_router(service), payments)
}

pub(super) fn form_body(text: &str) -> String {
    format!(
        "sessionId=ATUid_test&serviceCode=%2A384%2A21%23&phoneNumber=%2B254711000111&text={}",
        text.replace('*', "%2A").replace(' ', "+")
    )
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
