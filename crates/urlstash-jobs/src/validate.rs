//! Submission validation: required fields and a reachability probe.

use reqwest::Client;

use crate::error::ValidationError;

/// Status tolerated as a false negative: some servers answer 500 to probe
/// methods they never implemented.
const TOLERATED_SERVER_ERROR: u16 = 500;

/// Check that the required submission fields are filled.
///
/// Runs before any network or filesystem activity.
///
/// # Errors
///
/// Returns `MissingUrl` or `MissingDestination` for empty fields.
pub fn check_required(url: &str, destination_project_id: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::MissingUrl);
    }
    if destination_project_id.is_empty() {
        return Err(ValidationError::MissingDestination);
    }
    Ok(())
}

/// Trim the submitted url and truncate it at the first whitespace,
/// discarding trailing tokens. The result is what reaches the retrieval
/// tool's argument list, so stray tokens must never survive.
#[must_use]
pub fn sanitize_url(url: &str) -> String {
    url.split_whitespace().next().unwrap_or_default().to_string()
}

/// Probe the url with a lightweight HEAD request.
///
/// # Errors
///
/// Returns `UnreachableHost` when the probe cannot connect or resolve, and
/// `InvalidResponse` for client/server error statuses, with the exception
/// of 500 which is accepted without inspecting the body.
pub async fn check_reachable(client: &Client, url: &str) -> Result<(), ValidationError> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(|source| ValidationError::UnreachableHost { source })?;

    let status = response.status().as_u16();
    if (400..=599).contains(&status) && status != TOLERATED_SERVER_ERROR {
        return Err(ValidationError::InvalidResponse { status });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::Method::HEAD;
    use httpmock::MockServer;

    #[test]
    fn empty_url_is_missing() {
        assert!(matches!(
            check_required("", "ab12c"),
            Err(ValidationError::MissingUrl)
        ));
    }

    #[test]
    fn empty_destination_is_missing() {
        assert!(matches!(
            check_required("https://example.org", ""),
            Err(ValidationError::MissingDestination)
        ));
    }

    #[test]
    fn filled_fields_pass() {
        assert!(check_required("https://example.org", "ab12c").is_ok());
    }

    #[test]
    fn sanitize_trims_and_truncates_at_whitespace() {
        assert_eq!(
            sanitize_url("  https://example.org/file --output evil  "),
            "https://example.org/file"
        );
        assert_eq!(sanitize_url("https://example.org"), "https://example.org");
        assert_eq!(sanitize_url("   "), "");
    }

    #[tokio::test]
    async fn reachable_url_passes() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(HEAD).path("/data");
                then.status(200);
            })
            .await;

        check_reachable(&Client::new(), &server.url("/data")).await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn client_error_status_is_invalid() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/missing");
                then.status(404);
            })
            .await;

        let err = check_reachable(&Client::new(), &server.url("/missing"))
            .await
            .expect_err("404 must fail validation");
        assert!(matches!(
            err,
            ValidationError::InvalidResponse { status: 404 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn status_500_is_tolerated() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/grumpy");
                then.status(500);
            })
            .await;

        check_reachable(&Client::new(), &server.url("/grumpy")).await?;
        Ok(())
    }

    #[tokio::test]
    async fn other_server_errors_are_invalid() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/down");
                then.status(503);
            })
            .await;

        let err = check_reachable(&Client::new(), &server.url("/down"))
            .await
            .expect_err("503 must fail validation");
        assert!(matches!(
            err,
            ValidationError::InvalidResponse { status: 503 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn connection_failure_is_unreachable() {
        // Port 1 is reserved and never listening locally.
        let err = check_reachable(&Client::new(), "http://127.0.0.1:1/")
            .await
            .expect_err("refused connection must fail validation");
        assert!(matches!(err, ValidationError::UnreachableHost { .. }));
    }
}
