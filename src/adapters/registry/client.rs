//! Tourism registry HTTP client
//!
//! Every call injects the shared parameter block (`MobileOS`, `MobileApp`,
//! `_type`) and a freshly resolved service key, checks the envelope's result
//! code and normalizes the body. Successful responses are cached by request
//! signature for `registry.cache_ttl_seconds`.

use super::cache::{CacheKey, ResponseCache};
use super::credential::{ConfiguredCredential, CredentialSource};
use super::directory::PlaceDirectory;
use super::models::{RawEnvelope, RawImage, RawIntro, RawPlace, ResponseBody};
use super::normalize::{
    normalize, normalize_image, normalize_intro, normalize_page, resolve_items,
};
use crate::config::{RegistryConfig, RetryConfig, SecretString};
use crate::domain::{
    OperatingInfo, PlacePage, PoiId, PoiImage, PointOfInterest, Result, TourmarkError,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Registry endpoint names, appended to the configured base URL
pub mod endpoints {
    pub const AREA_BASED_LIST: &str = "areaBasedList1";
    pub const SEARCH_KEYWORD: &str = "searchKeyword1";
    pub const DETAIL_COMMON: &str = "detailCommon1";
    pub const DETAIL_INTRO: &str = "detailIntro1";
    pub const DETAIL_IMAGE: &str = "detailImage1";
}

/// Registry-side ordering hint for list calls (`C` = last modified)
const DEFAULT_ARRANGE: &str = "C";

/// Longest response excerpt carried in a transport error
const ERROR_BODY_LIMIT: usize = 512;

/// Client for the tourism registry
///
/// Cheap to share behind an `Arc`; the response cache lives inside.
///
/// # Example
///
/// ```no_run
/// use tourmark::adapters::registry::RegistryClient;
/// use tourmark::config::RegistryConfig;
///
/// # async fn example() -> tourmark::domain::Result<()> {
/// let client = RegistryClient::new(RegistryConfig::default())?;
/// let page = client.list_by_area_and_category(Some("1"), Some("12"), 12, 1).await?;
/// println!("{} of {}", page.records.len(), page.total_count);
/// # Ok(())
/// # }
/// ```
pub struct RegistryClient {
    client: Client,
    config: RegistryConfig,
    credential: Arc<dyn CredentialSource>,
    cache: ResponseCache,
}

impl RegistryClient {
    /// Create a client whose service key follows the configured lookup order
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let credential = Arc::new(ConfiguredCredential::from_config(&config));

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| {
                TourmarkError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let cache = ResponseCache::new(Duration::from_secs(config.cache_ttl_seconds));

        Ok(Self {
            client,
            config,
            credential,
            cache,
        })
    }

    /// Replace the credential source
    pub fn with_credential(mut self, credential: Arc<dyn CredentialSource>) -> Self {
        self.credential = credential;
        self
    }

    /// Get the base URL of the registry
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The response cache, mostly for inspection in tests
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Lists places in an area, optionally narrowed to a category
    pub async fn list_by_area_and_category(
        &self,
        area_code: Option<&str>,
        category_id: Option<&str>,
        page_size: u32,
        page_number: u32,
    ) -> Result<PlacePage> {
        let mut params = paging_params(page_size, page_number);
        params.insert("arrange".to_string(), DEFAULT_ARRANGE.to_string());
        params.insert("listYN".to_string(), "Y".to_string());
        insert_filter(&mut params, "areaCode", area_code);
        insert_filter(&mut params, "contentTypeId", category_id);

        let body: ResponseBody<RawPlace> = self.fetch(endpoints::AREA_BASED_LIST, params).await?;
        Ok(normalize_page(body, page_number, page_size))
    }

    /// Full-text search over titles
    ///
    /// # Errors
    ///
    /// Returns [`TourmarkError::InvalidInput`] for a blank keyword, before any
    /// request is made.
    pub async fn search_by_keyword(
        &self,
        keyword: &str,
        area_code: Option<&str>,
        category_id: Option<&str>,
        page_size: u32,
        page_number: u32,
    ) -> Result<PlacePage> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(TourmarkError::InvalidInput(
                "Search keyword cannot be empty".to_string(),
            ));
        }

        let mut params = paging_params(page_size, page_number);
        params.insert("arrange".to_string(), DEFAULT_ARRANGE.to_string());
        params.insert("listYN".to_string(), "Y".to_string());
        params.insert("keyword".to_string(), keyword.to_string());
        insert_filter(&mut params, "areaCode", area_code);
        insert_filter(&mut params, "contentTypeId", category_id);

        let body: ResponseBody<RawPlace> = self.fetch(endpoints::SEARCH_KEYWORD, params).await?;
        Ok(normalize_page(body, page_number, page_size))
    }

    /// Common details of a single place; `None` if the registry has no record
    pub async fn get_detail(&self, id: &PoiId) -> Result<Option<PointOfInterest>> {
        let mut params = BTreeMap::new();
        params.insert("contentId".to_string(), id.to_string());
        for flag in ["defaultYN", "firstImageYN", "addrinfoYN", "mapinfoYN", "overviewYN"] {
            params.insert(flag.to_string(), "Y".to_string());
        }

        let body: ResponseBody<RawPlace> = self.fetch(endpoints::DETAIL_COMMON, params).await?;
        Ok(normalize(body.items).into_iter().next())
    }

    /// Category-specific operating details
    pub async fn get_operating_info(
        &self,
        id: &PoiId,
        category_id: &str,
    ) -> Result<Option<OperatingInfo>> {
        let category_id = category_id.trim();
        if category_id.is_empty() {
            return Err(TourmarkError::InvalidInput(
                "Category id is required for operating info".to_string(),
            ));
        }

        let mut params = BTreeMap::new();
        params.insert("contentId".to_string(), id.to_string());
        params.insert("contentTypeId".to_string(), category_id.to_string());

        let body: ResponseBody<RawIntro> = self.fetch(endpoints::DETAIL_INTRO, params).await?;
        Ok(resolve_items(body.items)
            .into_iter()
            .find_map(|raw| normalize_intro(raw, category_id)))
    }

    /// Image gallery of a place
    pub async fn get_images(
        &self,
        id: &PoiId,
        page_size: u32,
        page_number: u32,
    ) -> Result<Vec<PoiImage>> {
        let mut params = paging_params(page_size, page_number);
        params.insert("contentId".to_string(), id.to_string());
        params.insert("imageYN".to_string(), "Y".to_string());
        params.insert("subImageYN".to_string(), "Y".to_string());

        let body: ResponseBody<RawImage> = self.fetch(endpoints::DETAIL_IMAGE, params).await?;
        Ok(resolve_items(body.items)
            .into_iter()
            .filter_map(normalize_image)
            .collect())
    }

    /// Fetches, validates and decodes one endpoint
    ///
    /// The key is resolved before the cache is consulted so a missing key
    /// always fails, cached or not.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: BTreeMap<String, String>,
    ) -> Result<ResponseBody<T>> {
        let service_key = self.credential.resolve()?;
        let key = CacheKey::new(endpoint, &params);

        if let Some(cached) = self.cache.get(&key) {
            let body = decode_body(endpoint, &cached)?;
            crate::log_registry_call!(endpoint, true, cached.len());
            return Ok(body);
        }

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let text = self
            .retry_request(|| self.send(&url, &params, &service_key))
            .await?;

        let body = decode_body(endpoint, &text)?;
        crate::log_registry_call!(endpoint, false, text.len());
        self.cache.insert(key, Arc::from(text));
        Ok(body)
    }

    async fn send(
        &self,
        url: &str,
        params: &BTreeMap<String, String>,
        service_key: &SecretString,
    ) -> Result<String> {
        let key: &str = service_key.expose_secret().as_ref();
        let response = self
            .client
            .get(url)
            .query(&[
                ("serviceKey", key),
                ("MobileOS", self.config.mobile_os.as_str()),
                ("MobileApp", self.config.mobile_app.as_str()),
                ("_type", self.config.response_type.as_str()),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                TourmarkError::Connection(format!("Request to {url} failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = truncate(body.trim(), ERROR_BODY_LIMIT);
            return Err(TourmarkError::Transport {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    message
                },
            });
        }

        response
            .text()
            .await
            .map_err(|e| {
                TourmarkError::Connection(format!(
                    "Failed to read response body: {}",
                    e.without_url()
                ))
            })
    }

    /// Retry a request with exponential backoff
    ///
    /// Only transient failures are retried; see [`TourmarkError::is_transient`].
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let max_retries = retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries || !e.is_transient() {
                        return Err(e);
                    }

                    let delay_ms = backoff_delay_ms(retry, attempt);
                    crate::log_retry_attempt!(attempt, max_retries, delay_ms, e);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl PlaceDirectory for RegistryClient {
    async fn lookup(&self, id: &PoiId) -> Result<Option<PointOfInterest>> {
        self.get_detail(id).await
    }
}

/// Delay before the retry following `attempt` failures
fn backoff_delay_ms(retry: &RetryConfig, attempt: usize) -> u64 {
    let factor = retry.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
    let delay = (retry.initial_delay_ms as f64 * factor).min(retry.max_delay_ms as f64);
    delay as u64
}

/// Checks the envelope header and decodes the body
fn decode_body<T: DeserializeOwned>(endpoint: &str, text: &str) -> Result<ResponseBody<T>> {
    let envelope: RawEnvelope = serde_json::from_str(text).map_err(|e| {
        TourmarkError::Failure(format!("Malformed response from {endpoint}: {e}"))
    })?;

    let response = match envelope.response {
        Some(response) => response,
        None => {
            return Err(match envelope.result_code {
                Some(code) => TourmarkError::Domain {
                    code,
                    message: envelope.result_msg.unwrap_or_default(),
                },
                None => TourmarkError::Failure(format!(
                    "Malformed response from {endpoint}: missing response envelope"
                )),
            })
        }
    };

    if !response.header.is_success() {
        return Err(TourmarkError::Domain {
            code: response.header.result_code,
            message: response.header.result_msg.unwrap_or_default(),
        });
    }

    match response.body {
        Some(body) => serde_json::from_value(body).map_err(|e| {
            TourmarkError::Failure(format!("Malformed response body from {endpoint}: {e}"))
        }),
        None => Ok(ResponseBody {
            items: Default::default(),
            total_count: Some(0),
            page_no: None,
            num_of_rows: None,
        }),
    }
}

fn paging_params(page_size: u32, page_number: u32) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert("numOfRows".to_string(), page_size.max(1).to_string());
    params.insert("pageNo".to_string(), page_number.max(1).to_string());
    params
}

/// Adds an optional filter, skipping blank values
fn insert_filter(params: &mut BTreeMap<String, String>, name: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        params.insert(name.to_string(), value.to_string());
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_backoff_delay_grows_and_caps() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 500,
            max_delay_ms: 1500,
            backoff_multiplier: 2.0,
        };
        assert_eq!(backoff_delay_ms(&retry, 1), 500);
        assert_eq!(backoff_delay_ms(&retry, 2), 1000);
        assert_eq!(backoff_delay_ms(&retry, 3), 1500);
        assert_eq!(backoff_delay_ms(&retry, 4), 1500);
    }

    #[test]
    fn test_decode_body_domain_error() {
        let text = r#"{"response":{"header":{"resultCode":"22","resultMsg":"LIMITED NUMBER OF SERVICE REQUESTS EXCEEDS ERROR."}}}"#;
        let err = decode_body::<RawPlace>("areaBasedList1", text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.code(), Some("22"));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_decode_body_flat_gateway_error() {
        let text = r#"{"resultCode":"30","resultMsg":"SERVICE KEY IS NOT REGISTERED ERROR."}"#;
        let err = decode_body::<RawPlace>("areaBasedList1", text).unwrap_err();
        assert_eq!(err.code(), Some("30"));
    }

    #[test]
    fn test_decode_body_not_json() {
        let err =
            decode_body::<RawPlace>("areaBasedList1", "<OpenAPI_ServiceResponse/>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Failure);
    }

    #[test]
    fn test_decode_body_without_body_is_empty() {
        let text = r#"{"response":{"header":{"resultCode":"0000","resultMsg":"OK"}}}"#;
        let body = decode_body::<RawPlace>("detailCommon1", text).unwrap();
        assert!(resolve_items(body.items).is_empty());
    }

    #[test]
    fn test_insert_filter_skips_blank() {
        let mut params = BTreeMap::new();
        insert_filter(&mut params, "areaCode", Some("  "));
        insert_filter(&mut params, "contentTypeId", None);
        insert_filter(&mut params, "sigunguCode", Some(" 3 "));
        assert_eq!(params.len(), 1);
        assert_eq!(params["sigunguCode"], "3");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("경복궁", 2), "경복...");
        assert_eq!(truncate("ok", 10), "ok");
    }

    #[tokio::test]
    async fn test_blank_keyword_rejected_before_credential() {
        let config = RegistryConfig {
            service_key: None,
            service_key_env: None,
            ..Default::default()
        };
        let client = RegistryClient::new(config).unwrap();
        let err = client
            .search_by_keyword("   ", None, None, 10, 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let config = RegistryConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            service_key: None,
            service_key_env: None,
            ..Default::default()
        };
        let client = RegistryClient::new(config).unwrap();
        let err = client
            .list_by_area_and_category(None, None, 10, 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(client.cache().is_empty());
    }
}
