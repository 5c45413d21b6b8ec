//! Connection configuration for secure Kafka clients.
//!
//! A [`ConnectionConfig`] is built once per client from an environment
//! snapshot, is immutable after construction, and is consumed by exactly one
//! factory call. Enum string forms follow the librdkafka property values.

use std::path::PathBuf;

use rdkafka::config::ClientConfig;
use tracing::warn;

use crate::env::EnvSnapshot;
use crate::errors::ConfigError;

/// Environment variable for the broker list.
pub const ENV_BOOTSTRAP_SERVERS: &str = "BOOTSTRAP_SERVERS";
/// Environment variable for the security protocol.
pub const ENV_SECURITY_PROTOCOL: &str = "SECURITY_PROTOCOL";
/// Environment variable for the SASL mechanism.
pub const ENV_SASL_MECHANISM: &str = "SASL_MECHANISM";
/// Environment variable for the SASL username.
pub const ENV_SASL_USERNAME: &str = "SASL_USERNAME";
/// Environment variable for the SASL password.
pub const ENV_SASL_PASSWORD: &str = "SASL_PASSWORD";
/// Environment variable for the CA certificate bundle path.
pub const ENV_SSL_CA_LOCATION: &str = "SSL_CA_LOCATION";
/// Environment variable for certificate verification ("true"/"false").
pub const ENV_SSL_VERIFY: &str = "SSL_VERIFY";

/// Default broker address when `BOOTSTRAP_SERVERS` is unset.
pub const DEFAULT_BOOTSTRAP_SERVER: &str = "localhost:9092";

/// Default CA certificate bundle path when `SSL_CA_LOCATION` is unset.
pub const DEFAULT_SSL_CA_LOCATION: &str = "../../secrets/ca-cert.pem";

/// Transport security protocol for the broker connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityProtocol {
    Plaintext,
    Ssl,
    SaslPlaintext,
    #[default]
    SaslSsl,
}

impl SecurityProtocol {
    /// Returns the protocol name as expected by librdkafka.
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityProtocol::Plaintext => "PLAINTEXT",
            SecurityProtocol::Ssl => "SSL",
            SecurityProtocol::SaslPlaintext => "SASL_PLAINTEXT",
            SecurityProtocol::SaslSsl => "SASL_SSL",
        }
    }

    /// Whether this protocol performs a SASL credential exchange.
    pub fn requires_sasl(&self) -> bool {
        matches!(self, SecurityProtocol::SaslPlaintext | SecurityProtocol::SaslSsl)
    }

    /// Parse a protocol name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "PLAINTEXT" => Some(SecurityProtocol::Plaintext),
            "SSL" => Some(SecurityProtocol::Ssl),
            "SASL_PLAINTEXT" => Some(SecurityProtocol::SaslPlaintext),
            "SASL_SSL" => Some(SecurityProtocol::SaslSsl),
            _ => None,
        }
    }
}

impl std::fmt::Display for SecurityProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// SASL mechanism used for the credential exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaslMechanism {
    Plain,
    #[default]
    ScramSha256,
    ScramSha512,
    Gssapi,
    OauthBearer,
}

impl SaslMechanism {
    /// Returns the mechanism name as expected by librdkafka.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaslMechanism::Plain => "PLAIN",
            SaslMechanism::ScramSha256 => "SCRAM-SHA-256",
            SaslMechanism::ScramSha512 => "SCRAM-SHA-512",
            SaslMechanism::Gssapi => "GSSAPI",
            SaslMechanism::OauthBearer => "OAUTHBEARER",
        }
    }

    /// Parse a mechanism name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "PLAIN" => Some(SaslMechanism::Plain),
            "SCRAM-SHA-256" => Some(SaslMechanism::ScramSha256),
            "SCRAM-SHA-512" => Some(SaslMechanism::ScramSha512),
            "GSSAPI" => Some(SaslMechanism::Gssapi),
            "OAUTHBEARER" => Some(SaslMechanism::OauthBearer),
            _ => None,
        }
    }
}

impl std::fmt::Display for SaslMechanism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Consumer position when no committed offset exists for a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetReset {
    Earliest,
    Latest,
    None,
}

impl OffsetReset {
    /// Returns the policy name as expected by librdkafka.
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
            OffsetReset::None => "none",
        }
    }
}

impl std::fmt::Display for OffsetReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated configuration for a secure Kafka connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Broker addresses used for cluster discovery (host:port, non-empty).
    pub bootstrap_servers: Vec<String>,
    /// Transport security protocol.
    pub security_protocol: SecurityProtocol,
    /// SASL mechanism for the credential exchange.
    pub sasl_mechanism: SaslMechanism,
    /// SASL username, if configured.
    pub sasl_username: Option<String>,
    /// SASL password, if configured.
    pub sasl_password: Option<String>,
    /// Path to the CA certificate bundle.
    pub ssl_ca_location: Option<PathBuf>,
    /// Whether to verify the broker certificate. Disabling this is an
    /// explicit opt-out via `SSL_VERIFY`, never a silent default.
    pub ssl_verify: bool,
    /// Consumer group ID. Set together with `offset_reset`, consumer-only.
    pub group_id: Option<String>,
    /// Offset reset policy. Set together with `group_id`, consumer-only.
    pub offset_reset: Option<OffsetReset>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: vec![DEFAULT_BOOTSTRAP_SERVER.to_string()],
            security_protocol: SecurityProtocol::default(),
            sasl_mechanism: SaslMechanism::default(),
            sasl_username: None,
            sasl_password: None,
            ssl_ca_location: Some(PathBuf::from(DEFAULT_SSL_CA_LOCATION)),
            ssl_verify: true,
            group_id: None,
            offset_reset: None,
        }
    }
}

impl ConnectionConfig {
    /// Build a connection config from an environment snapshot.
    ///
    /// # Environment Variables
    ///
    /// - `BOOTSTRAP_SERVERS` - Comma-separated broker list (default: localhost:9092)
    /// - `SECURITY_PROTOCOL` - PLAINTEXT, SSL, SASL_PLAINTEXT or SASL_SSL (default: SASL_SSL)
    /// - `SASL_MECHANISM` - PLAIN, SCRAM-SHA-256, SCRAM-SHA-512, GSSAPI or
    ///   OAUTHBEARER (default: SCRAM-SHA-256)
    /// - `SASL_USERNAME` / `SASL_PASSWORD` - Credentials (optional)
    /// - `SSL_CA_LOCATION` - CA certificate bundle path (default: ../../secrets/ca-cert.pem)
    /// - `SSL_VERIFY` - Certificate verification, case-insensitive "true" (default: true)
    ///
    /// Never fails: missing SASL credentials under a SASL protocol emit a
    /// single warning and leave the credential fields empty, deferring the
    /// failure to rdkafka when the client attempts to connect.
    pub fn from_snapshot(env: &EnvSnapshot) -> Self {
        let bootstrap_servers = env
            .get(ENV_BOOTSTRAP_SERVERS)
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|servers| !servers.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_BOOTSTRAP_SERVER.to_string()]);

        let security_protocol = parse_or_default(env, ENV_SECURITY_PROTOCOL, SecurityProtocol::parse);
        let sasl_mechanism = parse_or_default(env, ENV_SASL_MECHANISM, SaslMechanism::parse);

        let config = Self {
            bootstrap_servers,
            security_protocol,
            sasl_mechanism,
            sasl_username: non_empty(env.get(ENV_SASL_USERNAME)),
            sasl_password: non_empty(env.get(ENV_SASL_PASSWORD)),
            ssl_ca_location: Some(
                env.get(ENV_SSL_CA_LOCATION)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SSL_CA_LOCATION)),
            ),
            ssl_verify: env
                .get(ENV_SSL_VERIFY)
                .map(|raw| raw.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            group_id: None,
            offset_reset: None,
        };

        if config.sasl_credentials_missing() {
            warn!("SASL credentials not found in environment variables");
        }

        config
    }

    /// Build a producer config from an environment snapshot.
    ///
    /// Identical to [`from_snapshot`](Self::from_snapshot); producers carry no
    /// additional fields.
    pub fn producer_from_snapshot(env: &EnvSnapshot) -> Self {
        Self::from_snapshot(env)
    }

    /// Build a consumer config from an environment snapshot.
    ///
    /// Fails with [`ConfigError::Validation`] before building anything when
    /// `group_id` is empty or `topics` is empty. On success the config carries
    /// `group_id` and an `earliest` offset reset policy in addition to the
    /// [`from_snapshot`](Self::from_snapshot) fields.
    pub fn consumer_from_snapshot(
        env: &EnvSnapshot,
        group_id: &str,
        topics: &[&str],
    ) -> Result<Self, ConfigError> {
        if group_id.is_empty() {
            return Err(ConfigError::validation("consumer group id must not be empty"));
        }
        if topics.is_empty() {
            return Err(ConfigError::validation(
                "consumer must subscribe to at least one topic",
            ));
        }

        let mut config = Self::from_snapshot(env);
        config.group_id = Some(group_id.to_string());
        config.offset_reset = Some(OffsetReset::Earliest);
        Ok(config)
    }

    /// Whether the protocol requires SASL but a credential is missing.
    pub fn sasl_credentials_missing(&self) -> bool {
        self.security_protocol.requires_sasl()
            && (self.sasl_username.is_none() || self.sasl_password.is_none())
    }

    /// Render this config into librdkafka properties.
    pub fn client_config(&self) -> ClientConfig {
        let mut client_config = ClientConfig::new();

        client_config
            .set("bootstrap.servers", self.bootstrap_servers.join(","))
            .set("security.protocol", self.security_protocol.as_str())
            .set("sasl.mechanism", self.sasl_mechanism.as_str())
            .set(
                "enable.ssl.certificate.verification",
                if self.ssl_verify { "true" } else { "false" },
            );

        if let (Some(username), Some(password)) = (&self.sasl_username, &self.sasl_password) {
            client_config
                .set("sasl.username", username)
                .set("sasl.password", password);
        }

        if let Some(ca_location) = &self.ssl_ca_location {
            client_config.set("ssl.ca.location", ca_location.to_string_lossy());
        }

        if let Some(group_id) = &self.group_id {
            client_config.set("group.id", group_id);
        }
        if let Some(offset_reset) = &self.offset_reset {
            client_config.set("auto.offset.reset", offset_reset.as_str());
        }

        client_config
    }
}

/// Parse an enum-valued variable, falling back to the default with a warning
/// on unrecognized input.
fn parse_or_default<T: Default>(
    env: &EnvSnapshot,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    match env.get(key) {
        Some(raw) => parse(raw).unwrap_or_else(|| {
            warn!(variable = key, value = raw, "Unrecognized value, using default");
            T::default()
        }),
        None => T::default(),
    }
}

/// Treat empty-string variables as absent.
fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(vars: &[(&str, &str)]) -> EnvSnapshot {
        vars.iter().copied().collect()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = ConnectionConfig::from_snapshot(&EnvSnapshot::default());

        assert_eq!(config.bootstrap_servers, vec!["localhost:9092".to_string()]);
        assert_eq!(config.security_protocol, SecurityProtocol::SaslSsl);
        assert_eq!(config.sasl_mechanism, SaslMechanism::ScramSha256);
        assert_eq!(config.sasl_username, None);
        assert_eq!(config.sasl_password, None);
        assert_eq!(
            config.ssl_ca_location,
            Some(PathBuf::from("../../secrets/ca-cert.pem"))
        );
        assert!(config.ssl_verify);
        assert_eq!(config.group_id, None);
        assert_eq!(config.offset_reset, None);
        assert_eq!(config, ConnectionConfig::default());
    }

    #[test]
    fn test_missing_credentials_is_not_fatal() {
        let config = ConnectionConfig::from_snapshot(&snapshot(&[("SASL_USERNAME", "svc-user")]));

        assert!(config.sasl_credentials_missing());
        assert_eq!(config.sasl_username, Some("svc-user".to_string()));
        assert_eq!(config.sasl_password, None);
    }

    #[test]
    fn test_credentials_are_captured_exactly() {
        let config = ConnectionConfig::from_snapshot(&snapshot(&[
            ("SASL_USERNAME", "svc-user"),
            ("SASL_PASSWORD", "s3cr3t!"),
        ]));

        assert!(!config.sasl_credentials_missing());
        assert_eq!(config.sasl_username, Some("svc-user".to_string()));
        assert_eq!(config.sasl_password, Some("s3cr3t!".to_string()));
    }

    #[test]
    fn test_empty_credentials_are_treated_as_absent() {
        let config = ConnectionConfig::from_snapshot(&snapshot(&[
            ("SASL_USERNAME", ""),
            ("SASL_PASSWORD", ""),
        ]));

        assert!(config.sasl_credentials_missing());
        assert_eq!(config.sasl_username, None);
        assert_eq!(config.sasl_password, None);
    }

    #[test]
    fn test_no_sasl_warning_under_plaintext() {
        let config =
            ConnectionConfig::from_snapshot(&snapshot(&[("SECURITY_PROTOCOL", "PLAINTEXT")]));

        assert!(!config.sasl_credentials_missing());
        assert_eq!(config.security_protocol, SecurityProtocol::Plaintext);
    }

    #[test]
    fn test_building_is_idempotent() {
        let env = snapshot(&[
            ("BOOTSTRAP_SERVERS", "kafka-1:9093,kafka-2:9093"),
            ("SASL_USERNAME", "svc-user"),
            ("SASL_PASSWORD", "s3cr3t!"),
            ("SSL_VERIFY", "false"),
        ]);

        assert_eq!(
            ConnectionConfig::from_snapshot(&env),
            ConnectionConfig::from_snapshot(&env)
        );
    }

    #[test]
    fn test_bootstrap_servers_are_split_and_trimmed() {
        let config = ConnectionConfig::from_snapshot(&snapshot(&[(
            "BOOTSTRAP_SERVERS",
            "kafka-1:9093, kafka-2:9093",
        )]));

        assert_eq!(
            config.bootstrap_servers,
            vec!["kafka-1:9093".to_string(), "kafka-2:9093".to_string()]
        );
    }

    #[test]
    fn test_ssl_verify_parsing_is_case_insensitive() {
        for value in ["TRUE", "True", "true"] {
            let config = ConnectionConfig::from_snapshot(&snapshot(&[("SSL_VERIFY", value)]));
            assert!(config.ssl_verify, "SSL_VERIFY={value} should verify");
        }
        for value in ["false", "FALSE", "1", "yes", ""] {
            let config = ConnectionConfig::from_snapshot(&snapshot(&[("SSL_VERIFY", value)]));
            assert!(!config.ssl_verify, "SSL_VERIFY={value} should not verify");
        }
    }

    #[test]
    fn test_protocol_and_mechanism_parse_case_insensitively() {
        let config = ConnectionConfig::from_snapshot(&snapshot(&[
            ("SECURITY_PROTOCOL", "sasl_plaintext"),
            ("SASL_MECHANISM", "scram-sha-512"),
        ]));

        assert_eq!(config.security_protocol, SecurityProtocol::SaslPlaintext);
        assert_eq!(config.sasl_mechanism, SaslMechanism::ScramSha512);
    }

    #[test]
    fn test_unrecognized_enum_values_fall_back_to_defaults() {
        let config = ConnectionConfig::from_snapshot(&snapshot(&[
            ("SECURITY_PROTOCOL", "QUANTUM_TUNNEL"),
            ("SASL_MECHANISM", "ROT13"),
        ]));

        assert_eq!(config.security_protocol, SecurityProtocol::SaslSsl);
        assert_eq!(config.sasl_mechanism, SaslMechanism::ScramSha256);
    }

    #[test]
    fn test_consumer_config_sets_group_and_offset_reset() {
        let config = ConnectionConfig::consumer_from_snapshot(
            &EnvSnapshot::default(),
            "billing-service",
            &["orders"],
        )
        .expect("valid consumer inputs");

        assert_eq!(config.group_id, Some("billing-service".to_string()));
        assert_eq!(config.offset_reset, Some(OffsetReset::Earliest));

        // All other fields keep the from_snapshot defaults.
        let expected = ConnectionConfig {
            group_id: Some("billing-service".to_string()),
            offset_reset: Some(OffsetReset::Earliest),
            ..ConnectionConfig::default()
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_consumer_config_rejects_empty_group_id() {
        let result =
            ConnectionConfig::consumer_from_snapshot(&EnvSnapshot::default(), "", &["orders"]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_consumer_config_rejects_empty_topics() {
        let result = ConnectionConfig::consumer_from_snapshot(&EnvSnapshot::default(), "g", &[]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_client_config_renders_librdkafka_properties() {
        let env = snapshot(&[
            ("BOOTSTRAP_SERVERS", "kafka-1:9093,kafka-2:9093"),
            ("SASL_USERNAME", "svc-user"),
            ("SASL_PASSWORD", "s3cr3t!"),
            ("SSL_CA_LOCATION", "/etc/kafka/ca.pem"),
            ("SSL_VERIFY", "false"),
        ]);
        let config = ConnectionConfig::consumer_from_snapshot(&env, "billing-service", &["orders"])
            .expect("valid consumer inputs");
        let client_config = config.client_config();

        assert_eq!(
            client_config.get("bootstrap.servers"),
            Some("kafka-1:9093,kafka-2:9093")
        );
        assert_eq!(client_config.get("security.protocol"), Some("SASL_SSL"));
        assert_eq!(client_config.get("sasl.mechanism"), Some("SCRAM-SHA-256"));
        assert_eq!(client_config.get("sasl.username"), Some("svc-user"));
        assert_eq!(client_config.get("sasl.password"), Some("s3cr3t!"));
        assert_eq!(client_config.get("ssl.ca.location"), Some("/etc/kafka/ca.pem"));
        assert_eq!(
            client_config.get("enable.ssl.certificate.verification"),
            Some("false")
        );
        assert_eq!(client_config.get("group.id"), Some("billing-service"));
        assert_eq!(client_config.get("auto.offset.reset"), Some("earliest"));
    }

    #[test]
    fn test_producer_client_config_omits_consumer_properties() {
        let config = ConnectionConfig::producer_from_snapshot(&EnvSnapshot::default());
        let client_config = config.client_config();

        assert_eq!(client_config.get("group.id"), None);
        assert_eq!(client_config.get("auto.offset.reset"), None);
        assert_eq!(client_config.get("sasl.username"), None);
    }
}
