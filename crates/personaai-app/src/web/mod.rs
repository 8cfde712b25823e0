pub mod routes;
pub mod server;

pub use routes::{create_router, AppState, RelayState};
pub use server::{WebServer, WebServerConfig};
