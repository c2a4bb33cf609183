//! Test utilities shared by handler and router tests.

use axum_test::TestServer;
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::classify::{Identity, signature::PNG};
use crate::config::Config;

pub fn create_test_app() -> TestServer {
    create_test_app_with_config(create_test_config())
}

pub fn create_test_app_with_config(config: Config) -> TestServer {
    crate::Application::new(config)
        .expect("Failed to create application")
        .into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        identity: Identity {
            user_id: "test_user_01012000".to_string(),
            email: "test@example.com".to_string(),
            roll_number: "TEST001".to_string(),
        },
        // A process-wide recorder can only be installed once; tests opt in individually
        enable_metrics: false,
        enable_otel_export: false,
        ..Default::default()
    }
}

/// Base64 of a `len`-byte file that starts with the PNG signature and is zero-padded after it.
pub fn png_base64(len: usize) -> String {
    let mut bytes = PNG.magic.to_vec();
    bytes.resize(len.max(PNG.magic.len()), 0);
    STANDARD.encode(bytes)
}
