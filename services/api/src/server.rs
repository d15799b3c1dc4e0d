use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::credit_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use flick_credit::config::AppConfig;
use flick_credit::error::AppError;
use flick_credit::telemetry;
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
    let default_settings = config.credit.default_settings();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        default_settings: Arc::new(default_settings.clone()),
    };

    let app = credit_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        grace_period_months = ?default_settings.grace_period_months,
        late_interest_rate = ?default_settings.late_interest_rate_monthly,
        "credit service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
