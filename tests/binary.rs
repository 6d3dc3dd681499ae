use std::net::TcpListener;
use std::process::Command;

const BINARY_PATH: &str = env!("CARGO_BIN_EXE_mcp-server-template");

#[test]
fn version_flag_prints_name_and_exits_zero() {
    let output = Command::new(BINARY_PATH)
        .arg("--version")
        .output()
        .expect("failed to run server binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "MCP Server Template v0.1.0");
}

#[test]
fn stdio_transport_fails_with_exit_code_one() {
    let output = Command::new(BINARY_PATH)
        .args(["--transport", "stdio"])
        .env_remove("LOG_LEVEL")
        .output()
        .expect("failed to run server binary");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not supported"), "stderr: {stderr}");
}

#[test]
fn invalid_arguments_exit_with_code_one() {
    let output = Command::new(BINARY_PATH)
        .args(["--transport", "carrier-pigeon"])
        .output()
        .expect("failed to run server binary");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn occupied_port_fails_with_exit_code_one() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to reserve a port");
    let port = listener.local_addr().expect("listener address").port();

    let output = Command::new(BINARY_PATH)
        .args(["--host", "127.0.0.1", "--port", &port.to_string()])
        .env_remove("LOG_LEVEL")
        .env("WORKER_THREADS", "1")
        .output()
        .expect("failed to run server binary");
    drop(listener);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(&format!("failed to bind 127.0.0.1:{port}")),
        "stderr: {stderr}"
    );
}

#[test]
fn help_exits_zero() {
    let output = Command::new(BINARY_PATH)
        .arg("--help")
        .output()
        .expect("failed to run server binary");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--log-level"));
}
