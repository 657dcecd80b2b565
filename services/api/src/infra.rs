use hive_ussd::config::ScoringConfig;
use hive_ussd::error::AppError;
use hive_ussd::ussd::{build_service, Language, LoggingPaymentTrigger, UssdService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// USSD service as deployed: configured scoring and log-only payment hand-off.
pub(crate) fn build_ussd_service(scoring: &ScoringConfig) -> Result<Arc<UssdService>, AppError> {
    let service = build_service(scoring, Arc::new(LoggingPaymentTrigger))?;
    Ok(Arc::new(service))
}

pub(crate) fn parse_language(raw: &str) -> Result<Language, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "en" | "english" | "1" => Ok(Language::English),
        "sw" | "swahili" | "kiswahili" | "2" => Ok(Language::Swahili),
        other => Err(format!("unknown language '{other}' (expected en or sw)")),
    }
}
