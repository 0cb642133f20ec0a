use async_trait::async_trait;
use rjar::{ClientConfig, HttpClientWrapper, Mailer, Notification, RequestOptions, RjarError};
use std::sync::{Arc, Mutex};
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[derive(Clone, Default)]
struct Outbox(Arc<Mutex<Vec<String>>>);

impl Outbox {
    fn contents(&self) -> Vec<String> {
        self.0.lock().expect("outbox lock").clone()
    }
}

#[async_trait]
impl Mailer for Outbox {
    async fn send(&self, to: &str, subject: &str, contents: &str) -> rjar::Result<()> {
        assert_eq!(to, "ops@example.com");
        assert_eq!(subject, "rjar alert");
        self.0.lock().expect("outbox lock").push(contents.to_string());
        Ok(())
    }
}

async fn unavailable_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(path("/flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;
    server
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_get_503_is_reported_and_returned() {
    if !can_bind_localhost() {
        return;
    }

    let server = unavailable_server().await;
    let outbox = Outbox::default();
    let mut client = HttpClientWrapper::new(ClientConfig::default()).expect("client should build");
    client.set_error_mailer(outbox.clone(), "ops@example.com", "rjar alert");

    let response = client
        .get(&format!("{}/flaky", server.uri()), RequestOptions::new())
        .await
        .expect("non-200 is still a response");

    assert_eq!(response.status_code(), 503);
    assert_eq!(response.text(), "down");
    assert_eq!(response.notification(), &Notification::Sent);
    let sent = outbox.contents();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("status_code is not 200"));
    assert!(sent[0].contains("/flaky"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_put_and_delete_503_are_not_reported() {
    if !can_bind_localhost() {
        return;
    }

    let server = unavailable_server().await;
    let outbox = Outbox::default();
    let mut client = HttpClientWrapper::new(ClientConfig::default()).expect("client should build");
    client.set_error_mailer(outbox.clone(), "ops@example.com", "rjar alert");

    let url = format!("{}/flaky", server.uri());
    let put = client.put(&url, RequestOptions::new()).await.expect("put");
    let delete = client.delete(&url, RequestOptions::new()).await.expect("delete");

    assert_eq!(put.status_code(), 503);
    assert_eq!(delete.status_code(), 503);
    assert!(outbox.contents().is_empty());
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_refused_connection_is_reported_then_returned() {
    let outbox = Outbox::default();
    let config = ClientConfig::default().with_max_retries(1);
    let mut client = HttpClientWrapper::new(config).expect("client should build");
    client.set_error_mailer(outbox.clone(), "ops@example.com", "rjar alert");

    let failure = client
        .post("http://127.0.0.1:9/submit", RequestOptions::new().text("payload"))
        .await
        .expect_err("nothing listens on the discard port");

    assert!(matches!(&failure.error, RjarError::Http(err) if err.is_connect()));
    assert_eq!(failure.notification, Notification::Sent);
    let sent = outbox.contents();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Error on POST"));
    assert!(sent[0].contains("[backtrace]"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_refused_connection_without_mailer() {
    let mut client = HttpClientWrapper::new(ClientConfig::default().with_max_retries(0))
        .expect("client should build");

    let failure = client
        .get("http://127.0.0.1:9/", RequestOptions::new())
        .await
        .expect_err("nothing listens on the discard port");
    assert_eq!(failure.notification, Notification::NotConfigured);
    assert!(matches!(failure.into_inner(), RjarError::Http(_)));
}
