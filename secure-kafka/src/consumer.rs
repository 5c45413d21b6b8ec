//! Consumer factory.

use rdkafka::consumer::{BaseConsumer, Consumer};
use tracing::info;

use crate::config::ConnectionConfig;
use crate::errors::ConfigError;

/// Create a secure Kafka consumer and subscribe it to the given topics.
///
/// The config must carry the consumer-only fields set by
/// [`ConnectionConfig::consumer_from_snapshot`]; polling, offset commits, and
/// rebalancing are rdkafka's. The consumer leaves the group when dropped.
pub fn create_consumer(
    config: &ConnectionConfig,
    topics: &[&str],
) -> Result<BaseConsumer, ConfigError> {
    let group_id = config.group_id.as_deref().ok_or_else(|| {
        ConfigError::validation("consumer config requires a group id and offset reset policy")
    })?;
    if topics.is_empty() {
        return Err(ConfigError::validation(
            "consumer must subscribe to at least one topic",
        ));
    }

    let consumer: BaseConsumer = config.client_config().create()?;
    consumer.subscribe(topics)?;

    info!(
        bootstrap_servers = %config.bootstrap_servers.join(","),
        group_id = %group_id,
        topics = ?topics,
        "Created Kafka consumer and subscribed"
    );

    Ok(consumer)
}
