//! Producer factory with delivery-report logging.

use rdkafka::message::Message;
use rdkafka::producer::{BaseProducer, DeliveryResult, ProducerContext};
use rdkafka::ClientContext;
use tracing::{error, info};

use crate::config::ConnectionConfig;
use crate::errors::ConfigError;

/// Producer context that logs every delivery report.
///
/// librdkafka invokes the callback from the producer's poll/flush thread;
/// success and failure are only logged, never retried here.
#[derive(Debug, Clone, Default)]
pub struct DeliveryLogger;

impl ClientContext for DeliveryLogger {}

impl ProducerContext for DeliveryLogger {
    type DeliveryOpaque = ();

    fn delivery(&self, delivery_result: &DeliveryResult<'_>, _delivery_opaque: ()) {
        match delivery_result {
            Ok(message) => info!(
                topic = message.topic(),
                partition = message.partition(),
                "Message delivered"
            ),
            Err((err, _message)) => error!(error = %err, "Message delivery failed"),
        }
    }
}

/// Create a secure Kafka producer from a connection config.
///
/// The returned handle owns the connection; send, flush, and delivery
/// guarantees are rdkafka's. Creation fails only on invalid librdkafka
/// properties, not on unreachable brokers.
pub fn create_producer(
    config: &ConnectionConfig,
) -> Result<BaseProducer<DeliveryLogger>, ConfigError> {
    let producer = config.client_config().create_with_context(DeliveryLogger)?;

    info!(
        bootstrap_servers = %config.bootstrap_servers.join(","),
        security_protocol = %config.security_protocol,
        sasl_mechanism = %config.sasl_mechanism,
        "Created Kafka producer"
    );

    Ok(producer)
}
