use assert_cmd::cargo::cargo_bin_cmd;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_cli_help_succeeds() {
    let output = cargo_bin_cmd!("rjar")
        .arg("--help")
        .output()
        .expect("run rjar");
    assert!(output.status.success(), "help should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "help should include usage text");
}

#[test]
fn test_cli_rejects_unknown_method() {
    let output = cargo_bin_cmd!("rjar")
        .arg("http://127.0.0.1:9/")
        .arg("-X")
        .arg("PATCH")
        .output()
        .expect("run rjar");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rjar: error:"));
    assert!(stderr.contains("Unknown HTTP method"));
}

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cli_outputs_body() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/body"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let url = format!("{}/body", server.uri());
    let output = cargo_bin_cmd!("rjar").arg(&url).output().expect("run rjar");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "hello");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cli_include_status_and_headers() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/headers"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-test", "value")
                .set_body_string("missing"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/headers", server.uri());
    let output = cargo_bin_cmd!("rjar")
        .arg(&url)
        .arg("-i")
        .output()
        .expect("run rjar");

    assert!(output.status.success(), "non-200 responses still exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("HTTP 404 Not Found"));
    assert!(stdout.contains("x-test: value"));
    assert!(stdout.ends_with("missing"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cli_sends_cookies_headers_and_data() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(header("cookie", "sid=abc"))
        .and(header("user-agent", "rjar-test-agent"))
        .and(body_string("a=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let url = format!("{}/submit", server.uri());
    let output = cargo_bin_cmd!("rjar")
        .arg(&url)
        .args(["-X", "POST", "-b", "sid=abc", "-H", "User-Agent: rjar-test-agent"])
        .args(["-d", "a=1"])
        .output()
        .expect("run rjar");

    assert!(output.status.success());
    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "ok");
}
