use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::usecase::ratings::DeletePolicy;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub rating_delete_policy: DeletePolicy,
    #[serde(default)]
    pub telemetry_enabled: bool,
    #[serde(default = "default_telemetry_service_name")]
    pub telemetry_service_name: String,
    #[serde(default = "default_telemetry_service_version")]
    pub telemetry_service_version: String,
    #[serde(default = "default_telemetry_environment")]
    pub telemetry_environment: String,
    #[serde(default = "default_telemetry_otlp_endpoint")]
    pub telemetry_otlp_endpoint: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_telemetry_service_name() -> String {
    "restaurant-ratings".to_string()
}

fn default_telemetry_service_version() -> String {
    "1.0.0".to_string()
}

fn default_telemetry_environment() -> String {
    "production".to_string()
}

fn default_telemetry_otlp_endpoint() -> String {
    "http://otel-collector.observability.svc.cluster.local:4317".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_max_connections", 5)?
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_environment(env(&[
            ("DATABASE_URL", "postgres://localhost/ratings"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/ratings");
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.rating_delete_policy, DeletePolicy::OwnerOnly);
        assert!(!config.telemetry_enabled);
        assert_eq!(config.telemetry_service_name, "restaurant-ratings");
    }

    #[test]
    fn test_unchecked_delete_policy() {
        let config = AppConfig::from_environment(env(&[
            ("DATABASE_URL", "postgres://localhost/ratings"),
            ("JWT_SECRET", "secret"),
            ("RATING_DELETE_POLICY", "unchecked"),
        ]))
        .unwrap();

        assert_eq!(config.rating_delete_policy, DeletePolicy::Unchecked);
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = AppConfig::from_environment(env(&[(
            "DATABASE_URL",
            "postgres://localhost/ratings",
        )]));

        assert!(result.is_err());
    }
}
