//! 检测流程集成测试
//!
//! 通过公开接口驱动 预检 → 加载配置 → 并发检测 → 报告 的完整流程，
//! 端点和Slack API都由mockito模拟

use mockito::{Matcher, Server, ServerGuard};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};
use vitals_check::core::{HealthcheckRun, RunOptions};
use vitals_check::error::{HealthCheckError, NotificationError, VitalsError};
use vitals_check::health::{ConnectivityProbe, HttpConnectivityProbe};

/// 写入配置文件
fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("healthcheck_config.json");
    std::fs::write(&path, content).unwrap();
    path
}

/// 取一个没有监听者的本地端口
fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

async fn online_probe(server: &mut ServerGuard) -> Arc<dyn ConnectivityProbe> {
    server
        .mock("GET", "/generate_204")
        .with_status(204)
        .create_async()
        .await;
    Arc::new(
        HttpConnectivityProbe::new(
            format!("{}/generate_204", server.url()),
            Duration::from_secs(2),
        )
        .unwrap(),
    )
}

fn run_options(config_path: PathBuf) -> RunOptions {
    RunOptions {
        config_path,
        timeout_override: Some(2),
        notify: true,
    }
}

#[tokio::test]
async fn test_all_endpoints_healthy_prints_ok() {
    let mut server = Server::new_async().await;
    let probe = online_probe(&mut server).await;
    let _svc1 = server
        .mock("GET", "/svc1")
        .with_status(200)
        .create_async()
        .await;
    let _svc2 = server
        .mock("GET", "/svc2")
        .with_status(204)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = format!(
        r#"{{"endpoints": {{"svc1": "{url}/svc1", "svc2": "{url}/svc2"}}}}"#,
        url = server.url()
    );
    let run = HealthcheckRun::new(Some(probe), run_options(write_config(&dir, &config)));

    let mut console = Vec::new();
    let report = assert_ok!(run.execute(&mut console).await);

    assert!(report.outcome.is_healthy());
    assert_eq!(report.outcome.checked(), 2);
    assert_eq!(String::from_utf8(console).unwrap(), "OK!\n");
}

#[tokio::test]
async fn test_unhealthy_endpoint_is_listed_without_notification() {
    let mut server = Server::new_async().await;
    let _svc1 = server
        .mock("GET", "/svc1")
        .with_status(200)
        .create_async()
        .await;
    let _svc2 = server
        .mock("GET", "/svc2")
        .with_status(503)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = format!(
        r#"{{"endpoints": {{"svc1": "{url}/svc1", "svc2": "{url}/svc2"}}}}"#,
        url = server.url()
    );
    let run = HealthcheckRun::new(None, run_options(write_config(&dir, &config)));

    let mut console = Vec::new();
    let report = assert_ok!(run.execute(&mut console).await);

    assert_eq!(report.summary.failed, 1);
    assert!(!report.summary.notified);
    assert_eq!(String::from_utf8(console).unwrap(), "Failed: svc2\n");
}

#[tokio::test]
async fn test_refused_endpoint_fails_the_run() {
    let mut server = Server::new_async().await;
    let healthy = server
        .mock("GET", "/svc2")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = format!(
        r#"{{"endpoints": {{"svc1": "{refused}", "svc2": "{url}/svc2"}}}}"#,
        refused = refused_url(),
        url = server.url()
    );
    let run = HealthcheckRun::new(None, run_options(write_config(&dir, &config)));

    let mut console = Vec::new();
    let err = assert_err!(run.execute(&mut console).await);

    assert!(matches!(
        err,
        VitalsError::HealthCheck(HealthCheckError::RequestError(_))
            | VitalsError::HealthCheck(HealthCheckError::Timeout { .. })
    ));
    // 其余检测仍然执行完毕，但不输出报告
    healthy.assert_async().await;
    assert!(console.is_empty());
}

#[tokio::test]
async fn test_offline_dispatches_no_checks() {
    let mut server = Server::new_async().await;
    let endpoint = server
        .mock("GET", "/svc1")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = format!(r#"{{"endpoints": {{"svc1": "{}/svc1"}}}}"#, server.url());
    let probe = Arc::new(HttpConnectivityProbe::new(refused_url(), Duration::from_secs(1)).unwrap());
    let run = HealthcheckRun::new(Some(probe), run_options(write_config(&dir, &config)));

    let mut console = Vec::new();
    let err = assert_err!(run.execute(&mut console).await);

    assert!(matches!(err, VitalsError::Connectivity { .. }));
    assert_eq!(
        String::from_utf8(console).unwrap(),
        "You are not connected to the internet\n"
    );
    endpoint.assert_async().await;
}

fn slack_config(server_url: &str) -> String {
    format!(
        r#"{{
            "slack": {{"channel": "C0HEALTH", "token": "xoxb-test"}},
            "endpoints": {{
                "svc1": "{url}/svc1",
                "svc2": "{url}/svc2",
                "svc3": "{url}/svc3"
            }},
            "settings": {{"slack_api_url": "{url}/api"}}
        }}"#,
        url = server_url
    )
}

async fn mock_endpoints(server: &mut ServerGuard) -> Vec<mockito::Mock> {
    vec![
        server
            .mock("GET", "/svc1")
            .with_status(200)
            .create_async()
            .await,
        server
            .mock("GET", "/svc2")
            .with_status(500)
            .create_async()
            .await,
        server
            .mock("GET", "/svc3")
            .with_status(404)
            .create_async()
            .await,
    ]
}

#[tokio::test]
async fn test_failures_are_delivered_once_to_slack() {
    let mut server = Server::new_async().await;
    let _endpoints = mock_endpoints(&mut server).await;
    let slack = server
        .mock("POST", "/api/chat.postMessage")
        .match_header("authorization", "Bearer xoxb-test")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJsonString(r#"{"channel": "C0HEALTH"}"#.to_string()),
            Matcher::Regex("Failed services: svc2, svc3".to_string()),
            Matcher::Regex("Major healthcheck failure".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let run = HealthcheckRun::new(
        None,
        run_options(write_config(&dir, &slack_config(&server.url()))),
    );

    let mut console = Vec::new();
    let report = assert_ok!(run.execute(&mut console).await);

    assert!(report.summary.notified);
    assert_eq!(String::from_utf8(console).unwrap(), "Failed: svc2, svc3\n");
    slack.assert_async().await;
}

#[tokio::test]
async fn test_slack_rejection_becomes_run_error() {
    let mut server = Server::new_async().await;
    let _endpoints = mock_endpoints(&mut server).await;
    let _slack = server
        .mock("POST", "/api/chat.postMessage")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error": "channel_not_found"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let run = HealthcheckRun::new(
        None,
        run_options(write_config(&dir, &slack_config(&server.url()))),
    );

    let mut console = Vec::new();
    let err = assert_err!(run.execute(&mut console).await);

    match err {
        VitalsError::Notification(NotificationError::ApiError { error }) => {
            assert_eq!(error, "channel_not_found")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(String::from_utf8(console).unwrap(), "Failed: svc2, svc3\n");
}

#[tokio::test]
async fn test_no_notify_skips_slack() {
    let mut server = Server::new_async().await;
    let _endpoints = mock_endpoints(&mut server).await;
    let slack = server
        .mock("POST", "/api/chat.postMessage")
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let mut options = run_options(write_config(&dir, &slack_config(&server.url())));
    options.notify = false;
    let run = HealthcheckRun::new(None, options);

    let report = assert_ok!(run.execute(&mut Vec::new()).await);

    assert_eq!(report.summary.failed, 2);
    assert!(!report.summary.notified);
    slack.assert_async().await;
}

#[tokio::test]
async fn test_template_with_unknown_variable_is_rejected_before_checks() {
    let mut server = Server::new_async().await;
    let endpoint = server
        .mock("GET", "/svc1")
        .with_status(503)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = format!(
        r#"{{
            "slack": {{"channel": "C0HEALTH", "token": "xoxb-test"}},
            "endpoints": {{"svc1": "{url}/svc1"}},
            "settings": {{"slack_api_url": "{url}/api", "message_template": "Down: {{{{faild}}}}"}}
        }}"#,
        url = server.url()
    );
    let run = HealthcheckRun::new(None, run_options(write_config(&dir, &config)));

    let err = assert_err!(run.execute(&mut Vec::new()).await);

    assert!(matches!(
        err,
        VitalsError::Config(vitals_check::error::ConfigError::ValidationError(_))
    ));
    endpoint.assert_async().await;
}
