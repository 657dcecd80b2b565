use crate::cli::ServeArgs;
use crate::infra::{build_ussd_service, AppState};
use crate::routes::with_ussd_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hive_ussd::config::AppConfig;
use hive_ussd::error::AppError;
use hive_ussd::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let ussd_service = build_ussd_service(&config.scoring)?;
    info!(
        endpoint = %config.scoring.endpoint,
        credential = config.scoring.api_token.is_some(),
        timeout_ms = config.scoring.timeout.as_millis() as u64,
        "scoring configured"
    );

    let app = with_ussd_routes(ussd_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "bee cover ussd service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
