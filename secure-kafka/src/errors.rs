//! Error types for configuration building and client creation.

use thiserror::Error;

/// Errors that can occur while building a configuration or creating a client.
///
/// Connection, authentication, and delivery failures happen after the
/// configuration boundary and surface through rdkafka's own error channel;
/// they are not wrapped here.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed construction inputs, rejected before any config is built.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error from rdkafka during client creation or subscription.
    #[error("Kafka error: {0}")]
    Kafka(String),
}

impl ConfigError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a Kafka error.
    pub fn kafka(msg: impl Into<String>) -> Self {
        Self::Kafka(msg.into())
    }
}

impl From<rdkafka::error::KafkaError> for ConfigError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::Kafka(err.to_string())
    }
}
