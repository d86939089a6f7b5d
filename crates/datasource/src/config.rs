//! Configuration loaded from the process environment.

use std::sync::Arc;

use datasource_core::{ApiKey, DEFAULT_PAGE_LIMIT, DataError, PaginatedDataProvider, Result};
use datasource_cybotrade::CybotradeProvider;

use crate::FetchOrchestrator;

/// Environment variable holding the Cybotrade API key.
pub const API_KEY_VAR: &str = "CYBOTRADE_API_KEY";

/// Environment variable overriding the Cybotrade API host.
pub const BASE_URL_VAR: &str = "CYBOTRADE_BASE_URL";

/// Settings needed to build a provider and run a batch.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    /// Provider credential.
    pub api_key: ApiKey,
    /// API host override, if any.
    pub base_url: Option<String>,
    /// Page-size limit for every query.
    pub limit: usize,
}

impl FetchConfig {
    /// Create a config with the default host and page limit.
    #[must_use]
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Load from the process environment.
    ///
    /// Fails with [`DataError::MissingCredential`] when the API key is unset
    /// or blank, so no request is ever sent unauthenticated.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .map(ApiKey::new)
            .filter(|key| !key.is_blank())
            .ok_or_else(|| DataError::MissingCredential(API_KEY_VAR.to_string()))?;

        let base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            base_url,
            ..Self::new(api_key)
        })
    }

    /// Set the page-size limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Build the Cybotrade provider described by this config.
    #[must_use]
    pub fn provider(&self) -> Arc<dyn PaginatedDataProvider> {
        let provider = CybotradeProvider::new(self.api_key.clone());
        match &self.base_url {
            Some(url) => Arc::new(provider.with_base_url(url.as_str())),
            None => Arc::new(provider),
        }
    }

    /// Build an orchestrator over [`Self::provider`] that pages with this
    /// config's limit.
    #[must_use]
    pub fn orchestrator(&self) -> FetchOrchestrator {
        FetchOrchestrator::new(self.provider()).with_limit(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datasource_core::DataProvider;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_key() {
        let result = FetchConfig::from_lookup(lookup(&[]));
        assert!(matches!(
            result,
            Err(DataError::MissingCredential(var)) if var == "CYBOTRADE_API_KEY"
        ));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let result = FetchConfig::from_lookup(lookup(&[("CYBOTRADE_API_KEY", "   ")]));
        assert!(matches!(result, Err(DataError::MissingCredential(_))));
    }

    #[test]
    fn test_key_and_defaults() {
        let config = FetchConfig::from_lookup(lookup(&[("CYBOTRADE_API_KEY", "abc")])).unwrap();
        assert_eq!(config.api_key.expose(), "abc");
        assert_eq!(config.base_url, None);
        assert_eq!(config.limit, 10_000);
        assert!(!format!("{config:?}").contains("abc"));
    }

    #[test]
    fn test_base_url_override() {
        let config = FetchConfig::from_lookup(lookup(&[
            ("CYBOTRADE_API_KEY", "abc"),
            ("CYBOTRADE_BASE_URL", "http://localhost:9000/"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/"));

        let provider = config.provider();
        assert_eq!(provider.name(), "Cybotrade");
        assert!(format!("{provider:?}").contains("http://localhost:9000"));
    }

    #[test]
    fn test_orchestrator_uses_config_limit() {
        let config = FetchConfig::from_lookup(lookup(&[("CYBOTRADE_API_KEY", "abc")]))
            .unwrap()
            .with_limit(500);
        let orchestrator = format!("{:?}", config.orchestrator());
        assert!(orchestrator.contains("limit: 500"));
        assert!(orchestrator.contains("Cybotrade"));
        assert!(!orchestrator.contains("abc"));
    }
}
