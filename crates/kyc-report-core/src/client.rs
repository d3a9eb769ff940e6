//! HTTP client for the upstream KYC service.
//!
//! The public methods never fail: any transport, status or decoding error is
//! logged and replaced by fixture or default data, so a report can always be
//! produced.

use chrono::{Local, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::company::fixtures::{fixture_investigation, fixture_or_placeholder, fixture_tickets, placeholder_company};
use crate::company::upstream::{company_info_from_value, company_list_from_value};
use crate::company::{CompanyInfo, CompanyListItem, KvkNumber};
use crate::config::ClientConfig;
use crate::investigation::InvestigationResult;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub companies_loaded: u64,
    #[serde(default)]
    pub timestamp: String,
}

impl HealthStatus {
    fn unavailable() -> Self {
        HealthStatus {
            status: "unavailable".to_string(),
            version: "1.0.0".to_string(),
            companies_loaded: 0,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status != "unavailable"
    }
}

/// Body of `POST /processkyc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessKycRequest {
    pub company_name: String,
    pub home_url: String,
    pub about_url: String,
}

pub struct KycClient {
    client: reqwest::Client,
    base_url: String,
    use_fixtures: bool,
}

impl KycClient {
    /// Build a client whose every request carries the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            use_fixtures: config.use_fixtures,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        info!(url = %url, "GET");
        let resp = self.client.get(&url).send().await?;
        Self::decode(resp).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        info!(url = %url, "POST");
        let resp = self.client.post(&url).json(body).send().await?;
        Self::decode(resp).await
    }

    /// `GET /health`, or an `unavailable` status.
    pub async fn health(&self) -> HealthStatus {
        match self.get_json::<HealthStatus>("/health").await {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, "health check failed, service may be unavailable");
                HealthStatus::unavailable()
            }
        }
    }

    /// `GET /companies`, or the fixture ticket list.
    pub async fn companies(&self) -> Vec<CompanyListItem> {
        match self.get_json::<Value>("/companies").await {
            Ok(v) => {
                let rows = company_list_from_value(&v, Local::now().date_naive());
                info!(count = rows.len(), "fetched companies");
                rows
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch companies");
                if self.use_fixtures {
                    fixture_tickets()
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// `POST /companyDetails/`, or the fixture record for the number, or a
    /// placeholder record.
    pub async fn company_details(&self, kvk_number: &KvkNumber) -> CompanyInfo {
        let body = json!({ "kvk_number": kvk_number.as_str() });
        match self.post_json::<_, Value>("/companyDetails/", &body).await {
            Ok(v) => company_info_from_value(&v, kvk_number.as_str()),
            Err(e) => {
                warn!(kvk = %kvk_number, error = %e, "failed to fetch company details");
                if self.use_fixtures {
                    fixture_or_placeholder(kvk_number.as_str())
                } else {
                    placeholder_company(kvk_number.as_str())
                }
            }
        }
    }

    /// `POST /processkyc`. On failure, the canned investigation for the
    /// company if one exists, else [`InvestigationResult::Absent`].
    pub async fn process_kyc(&self, request: &ProcessKycRequest) -> InvestigationResult {
        match self.post_json::<_, Value>("/processkyc", request).await {
            Ok(v) => {
                let result = InvestigationResult::from_value(&v);
                info!(company = %request.company_name, shape = result.shape(), "investigation received");
                result
            }
            Err(e) => {
                warn!(company = %request.company_name, error = %e, "failed to process KYC");
                let fixture = if self.use_fixtures {
                    fixture_investigation(&request.company_name)
                } else {
                    None
                };
                InvestigationResult::from_optional(fixture.as_ref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline(use_fixtures: bool) -> KycClient {
        // Port 9 (discard) on loopback refuses connections immediately.
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout_ms: 500,
            use_fixtures,
            min_display_ms: 0,
        };
        KycClient::new(&config).unwrap()
    }

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn test_base_url_trimmed() {
        assert_eq!(offline(true).base_url(), "http://127.0.0.1:9");
    }

    #[test]
    fn test_health_payload_decodes() {
        let h: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "version": "2.1.0", "companies_loaded": 42, "timestamp": "2024-01-20T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(h.is_available());
        assert_eq!(h.companies_loaded, 42);
        assert!(!HealthStatus::unavailable().is_available());
    }

    #[test]
    fn test_unreachable_service_degrades_to_fixtures() {
        let client = offline(true);
        block_on(async {
            assert!(!client.health().await.is_available());
            assert_eq!(client.companies().await.len(), 3);

            let kvk = KvkNumber::parse("12345678").unwrap();
            let company = client.company_details(&kvk).await;
            assert_eq!(company.legal_name, "Amsterdam Tech Solutions B.V.");

            let request = ProcessKycRequest {
                company_name: company.legal_name.clone(),
                home_url: String::new(),
                about_url: String::new(),
            };
            assert_eq!(client.process_kyc(&request).await.shape(), "assessed");
        });
    }

    #[test]
    fn test_unreachable_service_without_fixtures() {
        let client = offline(false);
        block_on(async {
            assert!(client.companies().await.is_empty());
            let kvk = KvkNumber::parse("12345678").unwrap();
            assert_eq!(client.company_details(&kvk).await.legal_name, "Sample Company B.V.");
            let request = ProcessKycRequest {
                company_name: "Amsterdam Tech Solutions B.V.".to_string(),
                home_url: String::new(),
                about_url: String::new(),
            };
            assert_eq!(client.process_kyc(&request).await, InvestigationResult::Absent);
        });
    }
}
