use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::language::LanguageCode;

use super::TranslationProvider;

/// Client for a LibreTranslate-compatible translation endpoint
#[derive(Debug)]
pub struct HttpTranslation {
    /// HTTP client for API requests
    client: Client,
    /// Service URL
    endpoint: String,
    /// Optional API key for hosted instances
    api_key: Option<String>,
}

/// Translation request body
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// The text to translate
    q: &'a str,

    /// Source language code
    source: &'a str,

    /// Target language code
    target: &'a str,

    /// Input format, always plain text here
    format: &'a str,

    /// API key for authenticated instances
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// Translation response body
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    /// The translated text
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl HttpTranslation {
    /// Default request timeout in seconds
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Create a new client for the given endpoint
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_timeout(endpoint, api_key, Self::DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new client with a custom request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    fn translate_url(&self) -> String {
        format!("{}/translate", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl TranslationProvider for HttpTranslation {
    async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
    ) -> Result<String, ProviderError> {
        let request = TranslateRequest {
            q: text,
            source: source.as_str(),
            target: target.as_str(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(self.translate_url())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translation API error ({}): {}", status, error_text);
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthenticationError(error_text));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response
            .json::<TranslateResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(body.translated_text)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate("hello", LanguageCode::En, LanguageCode::Hi)
            .await?;
        Ok(())
    }
}
