// SPDX-License-Identifier: Apache-2.0

use appfit_model::{PackageId, RatingAggregate, RatingSubmission};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServiceErrorCode {
    Network,
    Deserialization,
    NotFound,
}

impl ServiceErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::Deserialization => "deserialization_error",
            Self::NotFound => "not_found",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub code: ServiceErrorCode,
    pub message: String,
}

impl ServiceError {
    #[must_use]
    pub fn new(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ServiceError {}

/// What one ratings fetch returns: the individual submissions plus the
/// server-side aggregates, one per rating dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RatingsPayload {
    pub ratings: Vec<RatingSubmission>,
    pub aggregates: BTreeMap<String, RatingAggregate>,
}

/// Remote ratings directory, keyed by package id.
#[async_trait]
pub trait RatingsService: Send + Sync {
    async fn fetch_ratings(&self, package: &PackageId) -> Result<RatingsPayload, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_backoff_ms: 120,
        }
    }
}

pub struct HttpRatingsService {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpRatingsService {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn ratings_url(&self, package: &PackageId) -> String {
        format!("{}/apps/{}/ratings", self.base_url, package.as_str())
    }
}

#[async_trait]
impl RatingsService for HttpRatingsService {
    async fn fetch_ratings(&self, package: &PackageId) -> Result<RatingsPayload, ServiceError> {
        let url = self.ratings_url(package);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(&url).send().await {
                Ok(resp) if resp.status().as_u16() == 404 => {
                    return Err(ServiceError::new(
                        ServiceErrorCode::NotFound,
                        format!("package not in directory: {package}"),
                    ));
                }
                Ok(resp) if resp.status().is_success() => {
                    return resp.json::<RatingsPayload>().await.map_err(|e| {
                        ServiceError::new(
                            ServiceErrorCode::Deserialization,
                            format!("ratings decode failed: {e}"),
                        )
                    });
                }
                Ok(resp) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(ServiceError::new(
                            ServiceErrorCode::Network,
                            format!("ratings fetch failed status={} url={url}", resp.status()),
                        ));
                    }
                }
                Err(e) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(ServiceError::new(
                            ServiceErrorCode::Network,
                            format!("ratings fetch failed url={url}: {e}"),
                        ));
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(
                self.retry.base_backoff_ms.saturating_mul(attempt as u64),
            ))
            .await;
        }
    }
}

/// Test double: canned payloads, a fetch counter, and injectable failure
/// and latency.
pub struct FakeRatingsService {
    pub payloads: Mutex<HashMap<PackageId, RatingsPayload>>,
    pub fetch_calls: AtomicU64,
    pub fail_with: Mutex<Option<ServiceErrorCode>>,
    pub slow: bool,
}

impl Default for FakeRatingsService {
    fn default() -> Self {
        Self {
            payloads: Mutex::new(HashMap::new()),
            fetch_calls: AtomicU64::new(0),
            fail_with: Mutex::new(None),
            slow: false,
        }
    }
}

impl FakeRatingsService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_payload(&self, package: PackageId, payload: RatingsPayload) {
        self.payloads.lock().await.insert(package, payload);
    }

    pub async fn fail_next_with(&self, code: Option<ServiceErrorCode>) {
        *self.fail_with.lock().await = code;
    }

    #[must_use]
    pub fn calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RatingsService for FakeRatingsService {
    async fn fetch_ratings(&self, package: &PackageId) -> Result<RatingsPayload, ServiceError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if self.slow {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if let Some(code) = self.fail_with.lock().await.take() {
            return Err(ServiceError::new(code, "injected service failure"));
        }
        self.payloads
            .lock()
            .await
            .get(package)
            .cloned()
            .ok_or_else(|| {
                ServiceError::new(
                    ServiceErrorCode::NotFound,
                    format!("package not in directory: {package}"),
                )
            })
    }
}
