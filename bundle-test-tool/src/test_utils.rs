//! Test utilities for CLI testing
//!
//! Runs the bundle manager service in-process on an ephemeral port, seeded
//! with the built-in fixtures.

use anyhow::Result;
use bundlemgrd::{create_router, AppState, BundleRegistry};
use std::time::Duration;
use tokio::net::TcpListener;

/// Mock server implementation
pub struct MockServer {
    state: AppState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Service backed by the registry installer
    pub fn new() -> Self {
        Self {
            state: AppState::new(BundleRegistry::builtin(), false),
            port: 0,
        }
    }

    /// Start the mock server and return its URL
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = create_router(self.state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }
}
