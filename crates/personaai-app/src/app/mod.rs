pub mod repl;

pub use repl::run_repl_mode;

use anyhow::Result;
use std::net::SocketAddr;

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::web::server::{WebServer, WebServerConfig};

/// Start the relay web server from CLI settings
pub async fn run_web_server(cli: &Cli, client_config: ClientConfig) -> Result<()> {
    let bind_addr: SocketAddr = format!("{}:{}", cli.web_bind, cli.web_port).parse()?;

    let server = WebServer::new(WebServerConfig {
        bind_addr,
        client_config,
    });
    server.start().await
}
