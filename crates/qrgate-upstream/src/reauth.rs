//! Access tokens from an existing `ssid` session cookie.

use qrgate_telemetry::UpstreamOutcome;
use reqwest::header::{COOKIE, HeaderValue, LOCATION};
use tracing::{debug, instrument};

use crate::client::RiotAuthClient;
use crate::contracts::AuthorizeQuery;
use crate::error::{ExtractionSubject, UpstreamCall, UpstreamError, UpstreamResult};

/// Read `access_token` from the fragment of an authorize redirect target.
///
/// # Errors
///
/// Returns [`UpstreamError::Extraction`] when the fragment has no non-empty
/// `access_token` pair.
pub fn access_token_from_location(location: &str) -> UpstreamResult<String> {
    let fragment = location
        .split_once('#')
        .map_or("", |(_, fragment)| fragment);
    url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
        .ok_or(UpstreamError::Extraction {
            subject: ExtractionSubject::AuthorizeRedirect,
        })
}

impl RiotAuthClient {
    /// Follow the authorize endpoint once with an `ssid` cookie.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidCookie`] when the redirect does not
    /// mention an access token, and [`UpstreamError::Extraction`] when it does
    /// but the fragment cannot be read.
    #[instrument(name = "upstream.reauthorize_with_cookie", skip_all)]
    pub async fn reauthorize_with_cookie(&self, ssid: &str) -> UpstreamResult<String> {
        let call = UpstreamCall::Authorize;
        let cookie =
            HeaderValue::from_str(&format!("ssid={ssid}")).map_err(|_| UpstreamError::InvalidCookie)?;
        let request = self
            .redirectless()
            .get(format!("{}/authorize", self.endpoints().auth))
            .query(&AuthorizeQuery::default())
            .header(COOKIE, cookie);
        let response = self.send(call, request).await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if !location.contains("access_token") {
            debug!(status = response.status().as_u16(), "authorize redirect carried no token");
            self.record(call, UpstreamOutcome::Rejected);
            return Err(UpstreamError::InvalidCookie);
        }
        self.record(call, UpstreamOutcome::Ok);
        access_token_from_location(location)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use httpmock::prelude::*;
    use qrgate_config::UpstreamEndpoints;
    use qrgate_telemetry::Metrics;

    use super::*;

    fn client_for(server: &MockServer) -> Result<RiotAuthClient> {
        Ok(RiotAuthClient::new(
            UpstreamEndpoints::single_host(&server.base_url()),
            Metrics::new()?,
        )?)
    }

    #[test]
    fn location_fragment_is_form_decoded() -> Result<()> {
        assert_eq!(
            access_token_from_location(
                "https://playvalorant.com/opt_in#access_token=eyJ%2Babc&scope=openid&token_type=Bearer"
            )?,
            "eyJ+abc"
        );
        assert!(access_token_from_location("https://playvalorant.com/opt_in?access_token=x").is_err());
        Ok(())
    }

    #[tokio::test]
    async fn redirect_with_token_yields_access_token() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/authorize")
                .query_param("client_id", "play-valorant-web-prod")
                .query_param("redirect_uri", "https://playvalorant.com/opt_in")
                .query_param("response_type", "token id_token")
                .query_param("nonce", "1")
                .query_param("scope", "account openid")
                .header("cookie", "ssid=good");
            then.status(303).header(
                "location",
                "https://playvalorant.com/opt_in#access_token=TOKEN&id_token=ID",
            );
        });

        let token = client_for(&server)?.reauthorize_with_cookie("good").await?;
        assert_eq!(token, "TOKEN");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn redirect_without_token_is_invalid_cookie() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/authorize");
            then.status(303)
                .header("location", "https://authenticate.riotgames.com/login");
        });

        let err = client_for(&server)?
            .reauthorize_with_cookie("stale")
            .await
            .expect_err("no token must fail");
        assert!(matches!(err, UpstreamError::InvalidCookie));
        assert_eq!(err.public_message(), "Invalid Cookie");
        Ok(())
    }

    #[tokio::test]
    async fn token_outside_fragment_is_extraction_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/authorize");
            then.status(303)
                .header("location", "https://playvalorant.com/opt_in?error=access_token_denied");
        });

        let err = client_for(&server)?
            .reauthorize_with_cookie("odd")
            .await
            .expect_err("unreadable fragment must fail");
        assert_eq!(err.public_message(), "Failed to get access token");
        Ok(())
    }
}
