use anyhow::Result;
use colored::Colorize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use personaai_api::{GeminiClient, TextGenerator};

use crate::config::ClientConfig;
use crate::web::routes::{self, AppState, RelayState};

/// Web server configuration
pub struct WebServerConfig {
    pub bind_addr: SocketAddr,
    pub client_config: ClientConfig,
}

/// Web server instance
pub struct WebServer {
    bind_addr: SocketAddr,
    state: AppState,
}

impl WebServer {
    /// Create a new web server. The provider client is built here from the
    /// injected configuration, and only when a credential exists - the
    /// server still boots without one, and each relay request then fails
    /// with the configuration error.
    pub fn new(config: WebServerConfig) -> Self {
        let generator = config
            .client_config
            .gemini_config()
            .map(|cfg| Arc::new(GeminiClient::new(cfg)) as Arc<dyn TextGenerator>);

        if generator.is_none() {
            eprintln!(
                "{}",
                "⚠️  GOOGLE_API_KEY not set - chat requests will fail until it is configured"
                    .yellow()
            );
        }

        let state = AppState {
            relay: Arc::new(RelayState {
                generator,
                verbose: config.client_config.verbose,
            }),
        };

        Self {
            bind_addr: config.bind_addr,
            state,
        }
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        let mut app = routes::create_router(self.state);

        // CORS layer for development
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);

        println!(
            "🌐 PersonaAI server starting on http://{}",
            self.bind_addr
        );
        println!(
            "   Chat endpoint: POST http://{}/api/chat",
            self.bind_addr
        );

        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
