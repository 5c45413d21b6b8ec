//! Secure Kafka connection configuration helpers.
//!
//! This crate assembles a validated [`ConnectionConfig`] for a SASL_SSL +
//! SCRAM-SHA-256 Kafka connection from environment variables, and exposes
//! factory functions that hand that configuration to `rdkafka` to obtain
//! producer and consumer handles. Everything past the configuration boundary
//! (connection handling, the SASL/TLS handshake, partition assignment,
//! delivery guarantees) is owned by librdkafka.
//!
//! ## Usage
//!
//! ```ignore
//! use secure_kafka::{create_consumer, create_producer, ConnectionConfig, EnvSnapshot};
//!
//! let env = EnvSnapshot::capture();
//!
//! // Producer
//! let producer = create_producer(&ConnectionConfig::producer_from_snapshot(&env))?;
//!
//! // Consumer
//! let config = ConnectionConfig::consumer_from_snapshot(&env, "billing-service", &["orders"])?;
//! let consumer = create_consumer(&config, &["orders"])?;
//! ```

mod config;
mod consumer;
mod env;
mod errors;
mod producer;

pub use config::{ConnectionConfig, OffsetReset, SaslMechanism, SecurityProtocol};
pub use consumer::create_consumer;
pub use env::EnvSnapshot;
pub use errors::ConfigError;
pub use producer::{create_producer, DeliveryLogger};
