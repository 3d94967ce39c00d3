//! CLI configuration from environment.

use std::env;

use anyhow::Result;
use flyby_core::ErrorPolicy;
use flyby_sdk::{Endpoints, DEFAULT_API_BASE, DEFAULT_PROXY_BASE};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub proxy_base: String,
    pub error_policy: ErrorPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_base: lookup("FLYBY_API_BASE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            proxy_base: lookup("FLYBY_PROXY_BASE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROXY_BASE.to_string()),
            error_policy: lookup("FLYBY_ERROR_POLICY")
                .and_then(|s| {
                    let policy = ErrorPolicy::parse(&s);
                    if policy.is_none() {
                        tracing::warn!("Ignoring unknown FLYBY_ERROR_POLICY value {:?}", s);
                    }
                    policy
                })
                .unwrap_or_default(),
        }
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Ok(Endpoints::new(&self.api_base, &self.proxy_base)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.proxy_base, DEFAULT_PROXY_BASE);
        assert_eq!(config.error_policy, ErrorPolicy::Retain);
        assert!(config.endpoints().is_ok());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FLYBY_API_BASE", "http://localhost:8080"),
            ("FLYBY_PROXY_BASE", "http://localhost:9000/get"),
            ("FLYBY_ERROR_POLICY", "clear"),
        ]));
        assert_eq!(config.error_policy, ErrorPolicy::Clear);
        let endpoints = config.endpoints().unwrap();
        assert_eq!(endpoints.proxy_base().as_str(), "http://localhost:9000/get");
    }

    #[test]
    fn unknown_policy_falls_back() {
        let config = Config::from_lookup(lookup(&[("FLYBY_ERROR_POLICY", "explode")]));
        assert_eq!(config.error_policy, ErrorPolicy::Retain);
    }

    #[test]
    fn bad_base_url_is_an_error() {
        let config = Config::from_lookup(lookup(&[("FLYBY_PROXY_BASE", "relay")]));
        assert!(config.endpoints().is_err());
    }
}
