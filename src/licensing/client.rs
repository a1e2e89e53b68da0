//! Federation licensing API client
//!
//! # Architecture
//!
//! ```text
//! LicenseClient (memo cache, degrade-to-empty policy)
//!     ↓
//! LicenseApi trait
//! ├── HttpLicenseApi (blocking reqwest, bearer token from env)
//! └── test stubs
//! ```
//!
//! The transport reports every failure as an [`ApiError`]. The client decides
//! what the user sees: always a (possibly empty) list, never an error.

use super::document::{is_blank, DocumentKind, LicenseQuery};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Default upstream endpoint
pub const DEFAULT_API_URL: &str =
    "https://fcoc.playoffinformatica.com/api.php/api/v1.0/llicencies/persones";

/// Environment variable holding the bearer token
pub const DEFAULT_TOKEN_ENV: &str = "FCOC_PLAYOFF_API_TOKEN";

/// Errors from the licensing API transport
#[derive(Debug)]
pub enum ApiError {
    /// Token environment variable is unset
    MissingToken(String),
    /// Base URL could not be combined with the query
    InvalidUrl(String),
    /// Connection, DNS or timeout failure
    Network(String),
    /// Upstream answered with a non-success status
    Status { status: u16, body: String },
    /// Success status, valid JSON, but not an array
    Decode(String),
    /// Success status but the body is not JSON at all (proxy or maintenance page)
    MalformedBody(String),
}

impl ApiError {
    /// Whether the failure is a definitive upstream answer.
    ///
    /// Definitive answers are memoized like any other result; transient ones
    /// are retried on the next lookup. A body that does not parse as JSON is
    /// transient: it usually comes from something in front of the API.
    pub fn is_definitive(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Decode(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken(var) => write!(f, "API token not set ({})", var),
            Self::InvalidUrl(msg) => write!(f, "Invalid API URL: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Status { status, body } => write!(f, "API error ({}): {}", status, body),
            Self::Decode(msg) => write!(f, "Unexpected response body: {}", msg),
            Self::MalformedBody(msg) => write!(f, "Response body is not JSON: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Settings for the HTTP transport
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Endpoint, without query string
    pub base_url: String,
    /// Name of the environment variable holding the bearer token
    pub token_env: String,
    /// Request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout: None,
        }
    }
}

/// Build the lookup URL: `<base>?<param>=<document>`
pub fn build_url(base_url: &str, query: &LicenseQuery) -> Result<reqwest::Url, ApiError> {
    reqwest::Url::parse_with_params(
        base_url,
        &[(query.kind.query_param(), query.document.as_str())],
    )
    .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))
}

/// Source of raw license objects
///
/// Synchronous: implementations may block on network I/O, so async callers
/// must go through `spawn_blocking`.
pub trait LicenseApi: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Fetch the license objects matching a query
    fn fetch(&self, query: &LicenseQuery) -> Result<Vec<Value>, ApiError>;
}

// ═══════════════════════════════════════════════════════════════════════════
// HTTP transport
// ═══════════════════════════════════════════════════════════════════════════

/// Playoff licensing API over HTTP
pub struct HttpLicenseApi {
    client: reqwest::blocking::Client,
    base_url: String,
    token_env: String,
}

impl HttpLicenseApi {
    /// Create the transport.
    ///
    /// Must not be called from async context (the blocking client owns its
    /// own runtime).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ApiError::Network(format!("Failed to create HTTP client: {}", e))
        })?;

        tracing::debug!(
            "Initialized licensing API client: {} (token from ${})",
            config.base_url,
            config.token_env
        );

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token_env: config.token_env.clone(),
        })
    }

    // Read at call time so a rotated token is picked up without a restart
    fn token(&self) -> Result<String, ApiError> {
        std::env::var(&self.token_env).map_err(|_| ApiError::MissingToken(self.token_env.clone()))
    }
}

impl LicenseApi for HttpLicenseApi {
    fn name(&self) -> &'static str {
        "playoff-http"
    }

    fn fetch(&self, query: &LicenseQuery) -> Result<Vec<Value>, ApiError> {
        let url = build_url(&self.base_url, query)?;
        let token = self.token()?;

        tracing::debug!("GET {} ({})", self.base_url, query.kind.query_param());

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .send()
            .map_err(|e| ApiError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match response.json::<Value>() {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(ApiError::Decode(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ApiError::MalformedBody(e.to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Memoizing client
// ═══════════════════════════════════════════════════════════════════════════

/// Shared handle used by the web handlers
pub type SharedClient = Arc<LicenseClient>;

/// Licensing API client with a process-lifetime memo cache
///
/// One network call per distinct (selector, document) pair. Failures degrade
/// to an empty list; see [`ApiError::is_definitive`] for which of them are
/// memoized.
pub struct LicenseClient {
    api: Box<dyn LicenseApi>,
    cache: Mutex<HashMap<LicenseQuery, Arc<Vec<Value>>>>,
    /// One lock per pair being fetched, so concurrent lookups of the same
    /// pair wait for the first call instead of repeating it
    in_flight: Mutex<HashMap<LicenseQuery, Arc<Mutex<()>>>>,
}

impl LicenseClient {
    pub fn new(api: Box<dyn LicenseApi>) -> Self {
        Self {
            api,
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Client backed by the HTTP transport
    pub fn http(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(Box::new(HttpLicenseApi::new(config)?)))
    }

    /// Look up licenses from raw form input.
    ///
    /// - blank document: `None` (nothing to show, no call)
    /// - unknown selector: empty list, no call
    /// - otherwise: the memoized upstream result
    pub fn lookup(&self, kind_label: &str, document: &str) -> Option<Arc<Vec<Value>>> {
        if is_blank(document) {
            return None;
        }
        if DocumentKind::from_label(kind_label).is_none() {
            tracing::debug!("Unknown document selector {:?}, skipping lookup", kind_label);
            return Some(Arc::new(Vec::new()));
        }
        let query = LicenseQuery::parse(kind_label, document)?;
        Some(self.fetch(&query))
    }

    /// Fetch a validated query, going through the cache
    pub fn fetch(&self, query: &LicenseQuery) -> Arc<Vec<Value>> {
        if let Some(hit) = self.cached(query) {
            return hit;
        }

        let pair_lock = Arc::clone(
            self.in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(query.clone())
                .or_default(),
        );
        let _pair_guard = pair_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another lookup of the same pair may have finished while we waited
        if let Some(hit) = self.cached(query) {
            return hit;
        }

        // The cache lock is not held across the network call
        let (items, memoize) = match self.api.fetch(query) {
            Ok(items) => {
                tracing::info!("{} lookup returned {} license(s)", query.kind, items.len());
                (items, true)
            }
            Err(e) => {
                tracing::warn!("{} lookup via {} failed: {}", query.kind, self.api.name(), e);
                (Vec::new(), e.is_definitive())
            }
        };

        let items = Arc::new(items);
        if memoize {
            self.lock_cache().insert(query.clone(), Arc::clone(&items));
            tracing::debug!("{} lookup(s) memoized", self.cached_len());
        }
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(query);
        items
    }

    fn cached(&self, query: &LicenseQuery) -> Option<Arc<Vec<Value>>> {
        let hit = self.lock_cache().get(query).map(Arc::clone);
        if hit.is_some() {
            tracing::trace!("Cache hit for {} lookup", query.kind);
        }
        hit
    }

    /// Number of memoized lookups
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<LicenseQuery, Arc<Vec<Value>>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub transport: canned result, counts calls
    pub(crate) struct StubApi {
        pub calls: Arc<AtomicUsize>,
        pub result: fn() -> Result<Vec<Value>, ApiError>,
    }

    impl StubApi {
        pub(crate) fn new(result: fn() -> Result<Vec<Value>, ApiError>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    result,
                },
                calls,
            )
        }
    }

    impl LicenseApi for StubApi {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn fetch(&self, _query: &LicenseQuery) -> Result<Vec<Value>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    pub(crate) fn one_processed_athlete() -> Result<Vec<Value>, ApiError> {
        Ok(vec![json!({
            "codiLlicencia": "OR-0001",
            "estatLlicencia": "LLIESTTRA",
            "federat": {"persona": {"cognoms": "Garcia Vila", "nom": "Marta"}},
            "club": {"nom": "Orientació Vallès"},
            "modalitatLlicencia": {
                "idModalitat": 1,
                "temporadaLlicencia": {"nom": "2025"},
                "categoriaLlicencia": {"nom": "Competició", "subCategoriaLlicencia": {"nom": "Sènior"}}
            }
        })])
    }

    #[test]
    fn test_build_url_per_selector() {
        let base = "https://api.example.test/llicencies/persones";
        let cases = [
            ("DNI/NIE", "nif"),
            ("PASSAPORT", "residencia"),
            ("CATSALUT", "catsalut"),
        ];
        for (label, param) in cases {
            let query = LicenseQuery::parse(label, "X1234").unwrap();
            let url = build_url(base, &query).unwrap();
            assert_eq!(url.as_str(), format!("{}?{}=X1234", base, param));
        }
    }

    #[test]
    fn test_build_url_encodes_document() {
        let query = LicenseQuery::parse("PASSAPORT", "AB 12&x=1").unwrap();
        let url = build_url("https://api.example.test/p", &query).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("residencia".to_string(), "AB 12&x=1".to_string())]);
    }

    #[test]
    fn test_build_url_rejects_bad_base() {
        let query = LicenseQuery::parse("DNI/NIE", "1").unwrap();
        assert!(matches!(
            build_url("not a url", &query),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_unknown_selector_makes_no_call() {
        let (api, calls) = StubApi::new(one_processed_athlete);
        let client = LicenseClient::new(Box::new(api));

        let result = client.lookup("CARNET", "12345678Z").unwrap();
        assert!(result.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_document_makes_no_call() {
        let (api, calls) = StubApi::new(one_processed_athlete);
        let client = LicenseClient::new(Box::new(api));

        assert!(client.lookup("DNI/NIE", "").is_none());
        assert!(client.lookup("DNI/NIE", "   ").is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lookup_is_memoized_per_pair() {
        let (api, calls) = StubApi::new(one_processed_athlete);
        let client = LicenseClient::new(Box::new(api));

        let first = client.lookup("DNI/NIE", "12345678Z").unwrap();
        let second = client.lookup("DNI/NIE", "12345678Z").unwrap();
        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Same document, different selector: a new call
        client.lookup("CATSALUT", "12345678Z").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.cached_len(), 2);
    }

    #[test]
    fn test_status_error_degrades_to_empty_and_is_memoized() {
        let (api, calls) = StubApi::new(|| {
            Err(ApiError::Status {
                status: 401,
                body: "Unauthorized".to_string(),
            })
        });
        let client = LicenseClient::new(Box::new(api));

        assert!(client.lookup("DNI/NIE", "12345678Z").unwrap().is_empty());
        assert!(client.lookup("DNI/NIE", "12345678Z").unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_network_error_degrades_to_empty_and_is_retried() {
        let (api, calls) = StubApi::new(|| Err(ApiError::Network("refused".to_string())));
        let client = LicenseClient::new(Box::new(api));

        assert!(client.lookup("DNI/NIE", "12345678Z").unwrap().is_empty());
        assert!(client.lookup("DNI/NIE", "12345678Z").unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.cached_len(), 0);
    }

    #[test]
    fn test_malformed_body_is_retried() {
        let (api, calls) =
            StubApi::new(|| Err(ApiError::MalformedBody("expected value at line 1".to_string())));
        let client = LicenseClient::new(Box::new(api));

        assert!(client.lookup("DNI/NIE", "12345678Z").unwrap().is_empty());
        assert!(client.lookup("DNI/NIE", "12345678Z").unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.cached_len(), 0);
    }

    /// Transport that takes a while to answer
    struct SlowApi {
        calls: Arc<AtomicUsize>,
    }

    impl LicenseApi for SlowApi {
        fn name(&self) -> &'static str {
            "slow-stub"
        }

        fn fetch(&self, _query: &LicenseQuery) -> Result<Vec<Value>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(100));
            one_processed_athlete()
        }
    }

    #[test]
    fn test_concurrent_lookups_of_same_pair_make_one_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = LicenseClient::new(Box::new(SlowApi {
            calls: Arc::clone(&calls),
        }));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let items = client.lookup("DNI/NIE", "12345678Z").unwrap();
                    assert_eq!(items.len(), 1);
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.cached_len(), 1);
    }

    #[test]
    fn test_error_classification() {
        assert!(ApiError::Status {
            status: 500,
            body: String::new()
        }
        .is_definitive());
        assert!(ApiError::Decode("x".to_string()).is_definitive());
        assert!(!ApiError::MalformedBody("x".to_string()).is_definitive());
        assert!(!ApiError::Network("x".to_string()).is_definitive());
        assert!(!ApiError::MissingToken("T".to_string()).is_definitive());
    }
}
