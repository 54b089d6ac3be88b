use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    producer::{FutureProducer, FutureRecord},
};

use super::dispatcher::DispatchError;

/// Something that can put a keyed payload on a topic
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), DispatchError>;
}

pub struct RedpandaClient {
    producer: FutureProducer,
}

impl RedpandaClient {
    pub fn new(brokers: &str) -> Result<Self, DispatchError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| DispatchError::Configuration(e.to_string()))?;

        tracing::info!(brokers = %brokers, "Created Redpanda producer");

        Ok(Self { producer })
    }
}

#[async_trait]
impl MessagePublisher for RedpandaClient {
    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), DispatchError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        self.producer
            .send(record, rdkafka::util::Timeout::After(std::time::Duration::from_secs(5)))
            .await
            .map_err(|(e, _)| DispatchError::Broker(format!("Kafka send error: {}", e)))?;

        tracing::info!(topic = %topic, key = %key, "Published to Redpanda");
        Ok(())
    }
}
