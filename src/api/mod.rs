//! API module for Transcript Lens
//!
//! Serves the single-page UI and the JSON endpoints behind its four views.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::pipeline::Pipeline;

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{router, AppState};

/// API server owning the single interactive session
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(pipeline: Pipeline, config: Config) -> Self {
        Self {
            state: AppState::new(pipeline, config),
        }
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!(
            "🚀 Starting API server on {}:{}",
            self.state.config.server.host, self.state.config.server.port
        );
        server::start_http_server(self.state).await
    }
}
