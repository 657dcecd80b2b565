use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::{BearerToken, Prediction, PredictionInstance, ScoringClient, ScoringError};
use crate::config::ScoringConfig;

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: &'a [PredictionInstance],
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

/// JSON-over-HTTPS client for the prediction endpoint. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpScoringClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ScoringError::Client(err.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self, ScoringError> {
        Self::new(config.endpoint.clone(), config.timeout)
    }

    fn transport_error(&self, err: reqwest::Error) -> ScoringError {
        if err.is_timeout() {
            ScoringError::Timeout(self.timeout)
        } else {
            ScoringError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ScoringClient for HttpScoringClient {
    async fn predict(
        &self,
        token: &BearerToken,
        instance: &PredictionInstance,
    ) -> Result<Prediction, ScoringError> {
        let body = PredictRequest {
            instances: std::slice::from_ref(instance),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(token.expose())
            .json(&body)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Status(status.as_u16()));
        }

        let payload: PredictResponse = response
            .json()
            .await
            .map_err(|err| ScoringError::Decode(err.to_string()))?;

        payload
            .predictions
            .into_iter()
            .next()
            .ok_or(ScoringError::EmptyPredictions)
    }
}
