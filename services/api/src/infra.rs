use flick_credit::credit::GeneralSettings;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    /// Policy applied when a request carries no settings of its own.
    pub(crate) default_settings: Arc<GeneralSettings>,
}

impl AppState {
    pub(crate) fn settings_or_default(&self, settings: Option<GeneralSettings>) -> GeneralSettings {
        settings.unwrap_or_else(|| self.default_settings.as_ref().clone())
    }
}

#[cfg(test)]
pub(crate) fn test_state(default_settings: GeneralSettings) -> AppState {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let recorder = PrometheusBuilder::new().build_recorder();
    AppState {
        readiness: Arc::new(AtomicBool::new(true)),
        metrics: Arc::new(recorder.handle()),
        default_settings: Arc::new(default_settings),
    }
}
