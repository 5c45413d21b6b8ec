//! Example producer: sends one keyed message to the `orders` topic over a
//! connection configured from environment variables.

use std::time::Duration;

use anyhow::Result;
use dotenv::dotenv;
use rdkafka::producer::{BaseRecord, Producer};
use secure_kafka::{create_producer, ConnectionConfig, EnvSnapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

const TOPIC: &str = "orders";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("secure_producer=info,secure_kafka=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    init_tracing();

    let env = EnvSnapshot::capture();
    let config = ConnectionConfig::producer_from_snapshot(&env);
    let producer = create_producer(&config)?;

    info!(topic = TOPIC, "Producing to topic");
    producer
        .send(BaseRecord::to(TOPIC).key("key1").payload("Hello Secure Kafka"))
        .map_err(|(err, _record)| err)?;

    // Serve delivery callbacks, then wait for outstanding messages.
    producer.poll(Duration::from_millis(100));
    producer.flush(Duration::from_secs(5))?;

    Ok(())
}
