use crate::error::RjarError;

pub fn exit_code_for_error(err: &RjarError) -> i32 {
    match err {
        RjarError::InvalidUrl(_) => 3,
        RjarError::Config(_) => 2,
        RjarError::Proxy(_) => 5,
        RjarError::Connection(_) => 7,
        RjarError::Io(_) => 23,
        RjarError::Json(_) => 26,
        RjarError::Mailer(_) => 67,
        RjarError::Unsupported(_) => 4,
        RjarError::Http(err) => http_exit_code(err),
    }
}

fn http_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        return 28;
    }
    if err.is_connect() {
        return 7;
    }
    if err.is_builder() || err.is_request() {
        return 2;
    }
    43
}

#[cfg(test)]
mod tests {
    use super::exit_code_for_error;
    use crate::error::RjarError;

    #[test]
    fn exit_code_maps_invalid_url() {
        let err = RjarError::InvalidUrl("bad".to_string());
        assert_eq!(exit_code_for_error(&err), 3);
    }

    #[test]
    fn exit_code_maps_proxy_and_unsupported() {
        assert_eq!(exit_code_for_error(&RjarError::Proxy("bad".to_string())), 5);
        assert_eq!(
            exit_code_for_error(&RjarError::Unsupported("mount".to_string())),
            4
        );
    }

    #[test]
    fn exit_code_maps_local_failures() {
        assert_eq!(exit_code_for_error(&RjarError::Config("x".to_string())), 2);
        assert_eq!(exit_code_for_error(&RjarError::Connection("x".to_string())), 7);
        assert_eq!(exit_code_for_error(&RjarError::Mailer("x".to_string())), 67);
    }

    #[tokio::test]
    async fn exit_code_maps_refused_connection() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("nothing listens on the discard port");
        assert_eq!(exit_code_for_error(&RjarError::Http(err)), 7);
    }
}
