//! Shared harness for the command tests
//!
//! Each test gets its own bundle manager, served in-process on an
//! ephemeral port and seeded with the built-in fixtures.

#![allow(dead_code)]

use bundle_test_tool::cli::{dispatch, Cli, Commands};
use bundle_test_tool::client::BundleMgrClient;
use bundle_test_tool::format::CommandOutput;
use bundlemgrd::{create_router, AppState, BundleRegistry};
use clap::Parser;
use std::time::Duration;
use tokio::net::TcpListener;

pub struct TestService {
    pub state: AppState,
    pub client: BundleMgrClient,
}

/// Start a registry-backed service and a client pointed at it.
pub async fn start() -> TestService {
    start_with(AppState::new(BundleRegistry::builtin(), false)).await
}

/// Start a service whose installer calls always succeed.
pub async fn start_mock_installer() -> TestService {
    start_with(AppState::new(BundleRegistry::builtin(), true)).await
}

async fn start_with(state: AppState) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = BundleMgrClient::with_config(
        format!("http://{}", addr),
        5,
        0,
        Duration::from_millis(10),
    )
    .unwrap();
    TestService { state, client }
}

impl TestService {
    /// Parse `args` as a command line and run it.
    pub async fn run(&self, args: &[&str]) -> CommandOutput {
        let argv = std::iter::once("bundle_test_tool").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Tool(command) => dispatch(&self.client, command).await.unwrap(),
            other => panic!("not a bundle manager command: {:?}", other),
        }
    }
}
