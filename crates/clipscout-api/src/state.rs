//! Application state.
//!
//! Everything here is request-independent wiring: shared immutable
//! services behind `Arc`s. There is no cache or session store; every
//! request re-derives its results.

use std::sync::Arc;

use clipscout_discovery::{GeminiClient, GeminiConfig, MomentDiscoveryService};
use clipscout_media::{ClipResolver, HttpRenderBackend, MetadataConfig, MetadataFetcher, RenderBackend};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub discovery: Arc<MomentDiscoveryService>,
    pub resolver: Arc<ClipResolver>,
}

impl AppState {
    /// Create new application state from the environment.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let gemini = GeminiClient::new(GeminiConfig::from_env())?;
        let discovery = MomentDiscoveryService::new(gemini);

        let metadata = MetadataFetcher::new(MetadataConfig::from_env());
        let render: Option<Arc<dyn RenderBackend>> = HttpRenderBackend::from_env()
            .map(|backend| Arc::new(backend) as Arc<dyn RenderBackend>);
        let resolver = ClipResolver::new(metadata, render);

        Ok(Self {
            config,
            discovery: Arc::new(discovery),
            resolver: Arc::new(resolver),
        })
    }

    /// Assemble state from already-built services. Used by tests to wire
    /// the pipeline against stub collaborators.
    pub fn from_parts(
        config: ApiConfig,
        discovery: MomentDiscoveryService,
        resolver: ClipResolver,
    ) -> Self {
        Self {
            config,
            discovery: Arc::new(discovery),
            resolver: Arc::new(resolver),
        }
    }
}
