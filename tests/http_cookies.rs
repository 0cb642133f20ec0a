use rjar::{ClientConfig, CookieMap, HttpClientWrapper, RequestOptions};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_jar_cookies_are_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cookies"))
        .and(header("cookie", "lang=en; sid=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = HttpClientWrapper::new(ClientConfig::default()).expect("client should build");
    client.add_cookies([("sid", "abc"), ("lang", "en")]);

    let response = client
        .get(&format!("{}/cookies", server.uri()), RequestOptions::new())
        .await
        .expect("request should succeed");
    assert_eq!(response.status_code(), 200);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_caller_cookies_are_replaced_by_jar() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cookies"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = HttpClientWrapper::new(ClientConfig::default()).expect("client should build");
    client.add_cookies([("sid", "abc")]);

    let mut options = RequestOptions::new();
    options.cookies.insert("sid".to_string(), "forged".to_string());
    let response = client
        .post(&format!("{}/cookies", server.uri()), options)
        .await
        .expect("request should succeed");
    assert_eq!(response.status_code(), 200);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_set_cookie_feeds_the_next_request() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "session=s3cr3t; Path=/; HttpOnly"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/logout"))
        .and(header("cookie", "session=s3cr3t"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = HttpClientWrapper::new(ClientConfig::default()).expect("client should build");
    client
        .get(&format!("{}/login", server.uri()), RequestOptions::new())
        .await
        .expect("login");

    let expected: CookieMap = [("session".to_string(), "s3cr3t".to_string())]
        .into_iter()
        .collect();
    assert_eq!(client.cookies_to_dict(), expected);

    let response = client
        .delete(&format!("{}/logout", server.uri()), RequestOptions::new())
        .await
        .expect("logout");
    assert_eq!(response.status_code(), 200);
}
