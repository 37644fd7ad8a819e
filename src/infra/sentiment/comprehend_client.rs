// =============================================================================
// COMPREHEND CLIENT - Amazon Comprehend DetectSentiment
// =============================================================================
//
// Implements the `SentimentAnalyzer` port against Amazon Comprehend's JSON API.
//
// **Wire format (awsJson 1.1):**
// - `POST /` on `https://comprehend.{region}.amazonaws.com/`
// - `X-Amz-Target: Comprehend_20171127.DetectSentiment`
// - Body: `{"Text": "...", "LanguageCode": "en"}`
// - Requests are signed with AWS Signature V4 using static credentials.
//
// **Environment Variables (read in main.rs):**
// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`
// - `COMPREHEND_ENDPOINT` - optional endpoint override

use crate::core::moderation::{
    ModerationError, Sentiment, SentimentAnalyzer, SentimentResult, LANGUAGE_CODE,
};
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningParams, SigningSettings};
use aws_sigv4::sign::v4;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

const SERVICE_NAME: &str = "comprehend";
const DETECT_SENTIMENT_TARGET: &str = "Comprehend_20171127.DetectSentiment";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const CREDENTIALS_PROVIDER: &str = "static";

// =============================================================================
// COMPREHEND API DATA STRUCTURES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DetectSentimentRequest<'a> {
    text: &'a str,
    language_code: &'a str,
}

/// Fields are optional so a response missing them is reported as malformed
/// rather than as a generic decode failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectSentimentResponse {
    sentiment: Option<String>,
    sentiment_score: Option<SentimentScore>,
}

/// Per-category confidence breakdown. Only `negative` is consumed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SentimentScore {
    #[allow(dead_code)]
    positive: Option<f64>,
    negative: Option<f64>,
    #[allow(dead_code)]
    neutral: Option<f64>,
    #[allow(dead_code)]
    mixed: Option<f64>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ErrorResponse {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// Credentialed handle bound to one Comprehend regional endpoint.
///
/// Build it once and reuse it; the inner HTTP client pools connections.
pub struct ComprehendClient {
    client: Client,
    endpoint: Url,
    region: String,
    credentials: Credentials,
}

impl std::fmt::Debug for ComprehendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComprehendClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl ComprehendClient {
    /// Build a client for the regional endpoint of `region`.
    ///
    /// Does no network I/O; fails only if the inputs cannot form a valid session.
    pub fn new(access_key: &str, secret_key: &str, region: &str) -> Result<Self, ModerationError> {
        let endpoint = format!("https://comprehend.{}.amazonaws.com/", region);
        Self::with_endpoint(access_key, secret_key, region, &endpoint)
    }

    /// Build a client that sends requests to `endpoint` instead of the regional default.
    pub fn with_endpoint(
        access_key: &str,
        secret_key: &str,
        region: &str,
        endpoint: &str,
    ) -> Result<Self, ModerationError> {
        validate_key("access key", access_key)?;
        validate_key("secret key", secret_key)?;
        validate_region(region)?;

        let endpoint = Url::parse(endpoint).map_err(|e| {
            ModerationError::Configuration(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;

        let client = Client::builder().build().map_err(|e| {
            ModerationError::Configuration(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint,
            region: region.to_string(),
            credentials: Credentials::new(access_key, secret_key, None, None, CREDENTIALS_PROVIDER),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Compute SigV4 headers for a DetectSentiment request with `body`.
    fn signature_headers(&self, body: &[u8]) -> Result<Vec<(String, String)>, ModerationError> {
        let identity = self.credentials.clone().into();
        let signing_params: SigningParams = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SERVICE_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| {
                ModerationError::RemoteCall(format!("failed to build signing params: {}", e))
            })?
            .into();

        let headers = [
            ("content-type", CONTENT_TYPE),
            ("x-amz-target", DETECT_SENTIMENT_TARGET),
        ];
        let signable = SignableRequest::new(
            "POST",
            self.endpoint.as_str(),
            headers.into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| ModerationError::RemoteCall(format!("failed to prepare request: {}", e)))?;

        let (instructions, _signature) = sign(signable, &signing_params)
            .map_err(|e| ModerationError::RemoteCall(format!("failed to sign request: {}", e)))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

/// Keys are signed exactly as given, so padding is refused rather than stripped.
fn validate_key(name: &str, key: &str) -> Result<(), ModerationError> {
    if key.is_empty() {
        return Err(ModerationError::Configuration(format!(
            "{} must not be empty",
            name
        )));
    }
    if key.trim() != key {
        return Err(ModerationError::Configuration(format!(
            "{} has leading or trailing whitespace",
            name
        )));
    }
    Ok(())
}

/// Region identifiers look like `us-east-1`; anything else cannot form a host name.
fn validate_region(region: &str) -> Result<(), ModerationError> {
    if region.is_empty() {
        return Err(ModerationError::Configuration(
            "region must not be empty".to_string(),
        ));
    }
    if !region
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ModerationError::Configuration(format!(
            "invalid region '{}'",
            region
        )));
    }
    Ok(())
}

/// Pull the label and negative score out of a successful response.
fn extract_sentiment(response: DetectSentimentResponse) -> Result<SentimentResult, ModerationError> {
    let label = response
        .sentiment
        .ok_or_else(|| ModerationError::RemoteCall("response missing Sentiment".to_string()))?;
    let label: Sentiment = label
        .parse()
        .map_err(|e| ModerationError::RemoteCall(format!("malformed response: {}", e)))?;

    let negative_score = response
        .sentiment_score
        .and_then(|score| score.negative)
        .ok_or_else(|| {
            ModerationError::RemoteCall("response missing SentimentScore.Negative".to_string())
        })?;

    Ok(SentimentResult::new(label, negative_score))
}

#[async_trait]
impl SentimentAnalyzer for ComprehendClient {
    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentResult, ModerationError> {
        let body = serde_json::to_vec(&DetectSentimentRequest {
            text,
            language_code: LANGUAGE_CODE,
        })
        .map_err(|e| ModerationError::RemoteCall(format!("failed to encode request: {}", e)))?;

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", DETECT_SENTIMENT_TARGET);
        for (name, value) in self.signature_headers(&body)? {
            request = request.header(name, value);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| ModerationError::RemoteCall(format!("request failed: {}", e)))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| ModerationError::RemoteCall(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let error: ErrorResponse = serde_json::from_str(&raw).unwrap_or_default();
            return Err(ModerationError::RemoteCall(format!(
                "Comprehend API error: {} - {}: {}",
                status,
                error.error_type.as_deref().unwrap_or("UnknownError"),
                error.message.as_deref().unwrap_or(raw.as_str())
            )));
        }

        let parsed: DetectSentimentResponse = serde_json::from_str(&raw)
            .map_err(|e| ModerationError::RemoteCall(format!("malformed response: {}", e)))?;

        extract_sentiment(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ComprehendClient {
        ComprehendClient::with_endpoint("AKIDEXAMPLE", "secret", "us-east-1", &server.uri())
            .expect("client")
    }

    fn sentiment_body(label: &str, negative: f64) -> serde_json::Value {
        json!({
            "Sentiment": label,
            "SentimentScore": {
                "Positive": 0.01,
                "Negative": negative,
                "Neutral": 0.01,
                "Mixed": 0.01
            }
        })
    }

    #[test]
    fn test_new_builds_regional_endpoint() {
        let client = ComprehendClient::new("AKIDEXAMPLE", "secret", "eu-west-1").unwrap();

        assert_eq!(client.region(), "eu-west-1");
        assert_eq!(
            client.endpoint.as_str(),
            "https://comprehend.eu-west-1.amazonaws.com/"
        );
    }

    #[test]
    fn test_construction_rejects_bad_configuration() {
        let cases = [
            ("", "secret", "us-east-1"),
            ("AKID", "   ", "us-east-1"),
            ("AKID", "secret", ""),
            ("AKID", "secret", "us east/1"),
        ];

        for (access, secret, region) in cases {
            let result = ComprehendClient::new(access, secret, region);
            assert!(
                matches!(result, Err(ModerationError::Configuration(_))),
                "expected configuration error for ({:?}, {:?}, {:?})",
                access,
                secret,
                region
            );
        }
    }

    #[test]
    fn test_padded_keys_are_rejected_not_trimmed() {
        let cases = [
            (" AKID", "secret"),
            ("AKID\n", "secret"),
            ("AKID", "secret "),
            ("AKID", "\tsecret"),
        ];

        for (access, secret) in cases {
            match ComprehendClient::new(access, secret, "us-east-1") {
                Err(ModerationError::Configuration(msg)) => {
                    assert!(msg.contains("whitespace"), "{}", msg)
                }
                other => panic!(
                    "expected configuration error for ({:?}, {:?}), got {:?}",
                    access, secret, other
                ),
            }
        }
    }

    #[test]
    fn test_keys_passed_through_unchanged() {
        let client = ComprehendClient::new("AKID/with+chars", "se cret", "us-east-1").unwrap();

        assert_eq!(client.credentials.access_key_id(), "AKID/with+chars");
        assert_eq!(client.credentials.secret_access_key(), "se cret");
    }

    #[test]
    fn test_invalid_endpoint_is_configuration_error() {
        let result = ComprehendClient::with_endpoint("AKID", "secret", "us-east-1", "not a url");

        assert!(matches!(result, Err(ModerationError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_detect_sentiment_request_and_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", DETECT_SENTIMENT_TARGET))
            .and(header("content-type", CONTENT_TYPE))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-date"))
            .and(body_json(json!({"Text": "I hate this", "LanguageCode": "en"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("NEGATIVE", 0.93)))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .analyze_sentiment("I hate this")
            .await
            .unwrap();

        assert_eq!(result, SentimentResult::new(Sentiment::Negative, 0.93));
    }

    #[tokio::test]
    async fn test_error_status_is_remote_call_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "__type": "ThrottlingException",
                "message": "Rate exceeded"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .analyze_sentiment("hello")
            .await
            .unwrap_err();

        match err {
            ModerationError::RemoteCall(msg) => {
                assert!(msg.contains("400"), "{}", msg);
                assert!(msg.contains("ThrottlingException"), "{}", msg);
                assert!(msg.contains("Rate exceeded"), "{}", msg);
            }
            other => panic!("expected remote call error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_negative_score_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Sentiment": "NEGATIVE",
                "SentimentScore": {"Positive": 0.1}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .analyze_sentiment("hello")
            .await
            .unwrap_err();

        assert!(matches!(err, ModerationError::RemoteCall(ref m) if m.contains("Negative")));
    }

    #[tokio::test]
    async fn test_unknown_label_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_body("ANGRY", 0.5)))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .analyze_sentiment("hello")
            .await
            .unwrap_err();

        assert!(matches!(err, ModerationError::RemoteCall(ref m) if m.contains("ANGRY")));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .analyze_sentiment("hello")
            .await
            .unwrap_err();

        assert!(matches!(err, ModerationError::RemoteCall(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_remote_call_error() {
        // Port 1 is reserved and refuses connections.
        let client =
            ComprehendClient::with_endpoint("AKID", "secret", "us-east-1", "http://127.0.0.1:1/")
                .unwrap();

        let err = client.analyze_sentiment("hello").await.unwrap_err();

        assert!(matches!(err, ModerationError::RemoteCall(_)));
    }
}
