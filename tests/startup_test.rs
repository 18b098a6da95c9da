use std::net::TcpListener;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_property-cache");

/// Runs the server binary outside the repo so no `.env` file is picked up.
fn run_server(vars: &[(&str, &str)]) -> Output {
    let mut command = Command::new(BIN);
    command
        .current_dir(std::env::temp_dir())
        .env_remove("SANITY_API_URL")
        .env_remove("PORT")
        .env_remove("REFRESH_INTERVAL_SECS")
        .env_remove("UPSTREAM_TIMEOUT_SECS")
        .env_remove("LOG_FORMAT");
    for (key, value) in vars {
        command.env(key, value);
    }
    command.output().expect("failed to run property-cache")
}

#[test]
fn test_missing_api_url_exits_before_binding() {
    // Hold the port: if the server got as far as binding, it would fail with a
    // bind error instead of the configuration message.
    let held = TcpListener::bind("0.0.0.0:0").unwrap();
    let port = held.local_addr().unwrap().port().to_string();

    let output = run_server(&[("PORT", &port)]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr.contains("SANITY_API_URL is not set in the environment"),
        "unexpected stderr: {}",
        stderr
    );
    assert!(!stderr.contains("failed to bind"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_invalid_port_exits_with_configuration_error() {
    let output = run_server(&[
        ("SANITY_API_URL", "http://127.0.0.1:1/v1/data/query/production?query="),
        ("PORT", "not-a-port"),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("PORT is invalid"), "unexpected stderr: {}", stderr);
}
