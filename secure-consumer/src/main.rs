//! Example consumer: polls the `orders` topic as group `billing-service`
//! over a connection configured from environment variables, until Ctrl-C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenv::dotenv;
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use secure_kafka::{create_consumer, ConnectionConfig, EnvSnapshot};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const TOPIC: &str = "orders";
const GROUP_ID: &str = "billing-service";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("secure_consumer=info,secure_kafka=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    init_tracing();

    let env = EnvSnapshot::capture();
    let config = ConnectionConfig::consumer_from_snapshot(&env, GROUP_ID, &[TOPIC])?;
    let consumer = create_consumer(&config, &[TOPIC])?;

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    info!(topic = TOPIC, "Consuming from topic");
    while running.load(Ordering::SeqCst) {
        match consumer.poll(Duration::from_secs(1)) {
            None => continue,
            Some(Err(KafkaError::PartitionEOF(_))) => continue,
            Some(Err(err)) => {
                error!(error = %err, "Consumer error");
                break;
            }
            Some(Ok(message)) => match message.payload_view::<str>() {
                Some(Ok(payload)) => info!(payload = payload, "Received message"),
                Some(Err(_)) => warn!("Received message with non-UTF-8 payload"),
                None => warn!("Received message with empty payload"),
            },
        }
    }

    // Dropping the consumer leaves the group and closes the connection.
    info!("Shutting down consumer");
    Ok(())
}
