//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use ratesmart_classifiers::ReviewAnalyzer;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;
use crate::store::Store;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Businesses, products, reviews, and sessions
    pub store: Arc<Store>,

    /// Prometheus handle for `/metrics`; absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the analyzer from the configured thresholds and an empty store
    pub fn new(
        config: ServerConfig,
        metrics_handle: Option<PrometheusHandle>,
    ) -> ratesmart_core::Result<Self> {
        let analyzer = ReviewAnalyzer::from_config(&config.analysis)?;
        info!(
            polarity_threshold = analyzer.sentiment_classifier().polarity_threshold(),
            lexicon_words = analyzer.sentiment_classifier().lexicon().len(),
            "Review analyzer ready"
        );

        let store = Store::new(Arc::new(analyzer), config.session_ttl());

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            metrics_handle,
        })
    }
}
