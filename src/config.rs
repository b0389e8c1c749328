//! Admin client configuration (spec §6 "Configuration surface", §7
//! Configuration errors).
//!
//! Two construction paths: [`AdminClientConfig::builder`] for typed,
//! ergonomic construction from Rust call sites, and
//! [`AdminClientConfig::from_properties`] for the spec-literal "any
//! option not in this set is a hard configuration error at construction"
//! requirement when configuration arrives as a property map (e.g. read
//! from a `.properties` file, mirroring how Kafka clients are usually
//! configured). A `derive_builder`-style macro would fit here but isn't
//! part of the teacher's dependency stack, so the builder below is
//! hand-rolled the way `tychedelia-akademie`'s own config types are.

use std::collections::HashMap;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityProtocol {
    Plaintext,
    Ssl,
    SaslPlaintext,
    SaslSsl,
}

impl SecurityProtocol {
    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "PLAINTEXT" => Ok(SecurityProtocol::Plaintext),
            "SSL" => Ok(SecurityProtocol::Ssl),
            "SASL_PLAINTEXT" => Ok(SecurityProtocol::SaslPlaintext),
            "SASL_SSL" => Ok(SecurityProtocol::SaslSsl),
            other => Err(ConfigError::InvalidValue {
                key: "security_protocol",
                reason: format!("unrecognized security protocol '{other}'"),
            }),
        }
    }
}

/// SSL context bundle (spec §6: "full SSL context bundle"). The core
/// never opens a socket itself; this is forwarded to the broker-client
/// collaborator's transport verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SslConfig {
    pub ca_location: Option<String>,
    pub certificate_location: Option<String>,
    pub key_location: Option<String>,
    pub key_password: Option<String>,
    pub endpoint_identification_algorithm: Option<String>,
}

/// SASL mechanism + credentials, and OAuth token provider hook (spec §6).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaslConfig {
    pub mechanism: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub oauth_token_endpoint: Option<String>,
}

/// Metrics reporter configuration (spec §6). The core's own metrics
/// collector is closed as part of `close()` (spec §5); this struct only
/// carries the reporter names and sampling knobs forwarded to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsConfig {
    pub reporters: Vec<String>,
    pub num_samples: Option<i32>,
    pub sample_window_ms: Option<i64>,
}

/// Recognised configuration surface (spec §6). Every field here has a
/// corresponding property-map key in [`AdminClientConfig::from_properties`];
/// the two representations are kept in lockstep deliberately, since the
/// spec requires unknown keys to be a hard error rather than silently
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminClientConfig {
    pub bootstrap_servers: Vec<String>,
    pub client_id: Option<String>,
    pub request_timeout_ms: u64,
    pub api_version: Option<i16>,
    pub api_version_auto_timeout_ms: u64,
    pub retry_backoff_ms: u64,
    pub reconnect_backoff_ms: u64,
    pub reconnect_backoff_max_ms: u64,
    pub connections_max_idle_ms: u64,
    pub metadata_max_age_ms: u64,
    pub max_in_flight_requests_per_connection: u32,
    pub security_protocol: SecurityProtocol,
    pub ssl: SslConfig,
    pub sasl: SaslConfig,
    pub socks5_proxy: Option<String>,
    pub metrics: MetricsConfig,
}

impl AdminClientConfig {
    pub fn builder(bootstrap_servers: impl Into<Vec<String>>) -> AdminClientConfigBuilder {
        AdminClientConfigBuilder::new(bootstrap_servers.into())
    }

    /// Builds a config from a flat property map, rejecting any key not in
    /// the recognised surface (spec §6: "any option not in this set is a
    /// hard configuration error at construction").
    pub fn from_properties(props: HashMap<String, String>) -> Result<Self, ConfigError> {
        const KNOWN_KEYS: &[&str] = &[
            "bootstrap_servers",
            "client_id",
            "request_timeout_ms",
            "api_version",
            "api_version_auto_timeout_ms",
            "retry_backoff_ms",
            "reconnect_backoff_ms",
            "reconnect_backoff_max_ms",
            "connections_max_idle_ms",
            "metadata_max_age_ms",
            "max_in_flight_requests_per_connection",
            "security_protocol",
            "ssl_ca_location",
            "ssl_certificate_location",
            "ssl_key_location",
            "ssl_key_password",
            "ssl_endpoint_identification_algorithm",
            "sasl_mechanism",
            "sasl_username",
            "sasl_password",
            "sasl_oauth_token_endpoint",
            "socks5_proxy",
            "metric_reporters",
            "metrics_num_samples",
            "metrics_sample_window_ms",
        ];

        let unrecognized: Vec<String> = props
            .keys()
            .filter(|k| !KNOWN_KEYS.contains(&k.as_str()))
            .cloned()
            .collect();
        if !unrecognized.is_empty() {
            return Err(ConfigError::UnrecognizedKeys(unrecognized));
        }

        let bootstrap_servers = props
            .get("bootstrap_servers")
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "bootstrap_servers",
                reason: "required".to_string(),
            })?
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let parse_u64 = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match props.get(key) {
                None => Ok(default),
                Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                    key,
                    reason: format!("'{v}' is not a valid integer"),
                }),
            }
        };
        let parse_u32 = |key: &'static str, default: u32| -> Result<u32, ConfigError> {
            match props.get(key) {
                None => Ok(default),
                Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                    key,
                    reason: format!("'{v}' is not a valid integer"),
                }),
            }
        };

        let security_protocol = match props.get("security_protocol") {
            None => SecurityProtocol::Plaintext,
            Some(v) => SecurityProtocol::parse(v)?,
        };

        let api_version = match props.get("api_version") {
            None => None,
            Some(v) => Some(v.parse::<i16>().map_err(|_| ConfigError::InvalidValue {
                key: "api_version",
                reason: format!("'{v}' is not a valid api version"),
            })?),
        };

        Ok(AdminClientConfig {
            bootstrap_servers,
            client_id: props.get("client_id").cloned(),
            request_timeout_ms: parse_u64("request_timeout_ms", 30_000)?,
            api_version,
            api_version_auto_timeout_ms: parse_u64("api_version_auto_timeout_ms", 2_000)?,
            retry_backoff_ms: parse_u64("retry_backoff_ms", 100)?,
            reconnect_backoff_ms: parse_u64("reconnect_backoff_ms", 50)?,
            reconnect_backoff_max_ms: parse_u64("reconnect_backoff_max_ms", 1_000)?,
            connections_max_idle_ms: parse_u64("connections_max_idle_ms", 540_000)?,
            metadata_max_age_ms: parse_u64("metadata_max_age_ms", 300_000)?,
            max_in_flight_requests_per_connection: parse_u32("max_in_flight_requests_per_connection", 5)?,
            security_protocol,
            ssl: SslConfig {
                ca_location: props.get("ssl_ca_location").cloned(),
                certificate_location: props.get("ssl_certificate_location").cloned(),
                key_location: props.get("ssl_key_location").cloned(),
                key_password: props.get("ssl_key_password").cloned(),
                endpoint_identification_algorithm: props.get("ssl_endpoint_identification_algorithm").cloned(),
            },
            sasl: SaslConfig {
                mechanism: props.get("sasl_mechanism").cloned(),
                username: props.get("sasl_username").cloned(),
                password: props.get("sasl_password").cloned(),
                oauth_token_endpoint: props.get("sasl_oauth_token_endpoint").cloned(),
            },
            socks5_proxy: props.get("socks5_proxy").cloned(),
            metrics: MetricsConfig {
                reporters: props
                    .get("metric_reporters")
                    .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_default(),
                num_samples: match props.get("metrics_num_samples") {
                    None => None,
                    Some(v) => Some(v.parse().map_err(|_| ConfigError::InvalidValue {
                        key: "metrics_num_samples",
                        reason: format!("'{v}' is not a valid integer"),
                    })?),
                },
                sample_window_ms: match props.get("metrics_sample_window_ms") {
                    None => None,
                    Some(v) => Some(v.parse().map_err(|_| ConfigError::InvalidValue {
                        key: "metrics_sample_window_ms",
                        reason: format!("'{v}' is not a valid integer"),
                    })?),
                },
            },
        })
    }
}

/// Typed builder counterpart to [`AdminClientConfig::from_properties`].
pub struct AdminClientConfigBuilder {
    config: AdminClientConfig,
}

impl AdminClientConfigBuilder {
    fn new(bootstrap_servers: Vec<String>) -> Self {
        AdminClientConfigBuilder {
            config: AdminClientConfig {
                bootstrap_servers,
                client_id: None,
                request_timeout_ms: 30_000,
                api_version: None,
                api_version_auto_timeout_ms: 2_000,
                retry_backoff_ms: 100,
                reconnect_backoff_ms: 50,
                reconnect_backoff_max_ms: 1_000,
                connections_max_idle_ms: 540_000,
                metadata_max_age_ms: 300_000,
                max_in_flight_requests_per_connection: 5,
                security_protocol: SecurityProtocol::Plaintext,
                ssl: SslConfig::default(),
                sasl: SaslConfig::default(),
                socks5_proxy: None,
                metrics: MetricsConfig::default(),
            },
        }
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = Some(client_id.into());
        self
    }

    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    pub fn api_version(mut self, version: i16) -> Self {
        self.config.api_version = Some(version);
        self
    }

    pub fn security_protocol(mut self, protocol: SecurityProtocol) -> Self {
        self.config.security_protocol = protocol;
        self
    }

    pub fn ssl(mut self, ssl: SslConfig) -> Self {
        self.config.ssl = ssl;
        self
    }

    pub fn sasl(mut self, sasl: SaslConfig) -> Self {
        self.config.sasl = sasl;
        self
    }

    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.config.metrics = metrics;
        self
    }

    pub fn build(self) -> AdminClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.security_protocol, SecurityProtocol::Plaintext);
    }

    #[test]
    fn from_properties_rejects_unknown_keys() {
        let mut props = HashMap::new();
        props.insert("bootstrap_servers".to_string(), "localhost:9092".to_string());
        props.insert("not_a_real_key".to_string(), "x".to_string());
        let err = AdminClientConfig::from_properties(props).unwrap_err();
        assert!(matches!(err, ConfigError::UnrecognizedKeys(keys) if keys == vec!["not_a_real_key".to_string()]));
    }

    #[test]
    fn from_properties_parses_recognised_keys() {
        let mut props = HashMap::new();
        props.insert("bootstrap_servers".to_string(), "a:9092, b:9092".to_string());
        props.insert("request_timeout_ms".to_string(), "5000".to_string());
        props.insert("security_protocol".to_string(), "SASL_SSL".to_string());
        let config = AdminClientConfig::from_properties(props).unwrap();
        assert_eq!(config.bootstrap_servers, vec!["a:9092".to_string(), "b:9092".to_string()]);
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.security_protocol, SecurityProtocol::SaslSsl);
    }
}
