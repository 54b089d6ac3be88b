use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::metrics::Metrics;
use crate::persistence::core::OutboxMessage;
use crate::utils::{retry_on_transient, IsTransient, RetryConfig, RetryResult};
use super::envelope::{message_key, BusMessage};
use super::redpanda::MessagePublisher;

// ============================================================================
// Event Dispatch
// ============================================================================
//
// Runs strictly after a successful commit. A failed dispatch never undoes
// the committed write: it is retried, counted and logged, then dropped.
//
// ============================================================================

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("broker error: {0}")]
    Broker(String),

    #[error("failed to encode event: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("invalid publisher configuration: {0}")]
    Configuration(String),
}

impl IsTransient for DispatchError {
    fn is_transient(&self) -> bool {
        matches!(self, DispatchError::Broker(_))
    }
}

#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, message: &OutboxMessage) -> Result<(), DispatchError>;
}

/// Used when no broker is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDispatcher;

#[async_trait]
impl EventDispatcher for LoggingDispatcher {
    async fn dispatch(&self, message: &OutboxMessage) -> Result<(), DispatchError> {
        tracing::info!(
            event_id = %message.event_id,
            event_type = %message.event_type,
            topic = %message.topic,
            aggregate_id = %message.aggregate_id,
            payload = %message.payload,
            "Domain event (no broker configured)"
        );
        Ok(())
    }
}

/// Publishes events wrapped in a `BusMessage`, retrying broker failures
pub struct BusDispatcher {
    publisher: Arc<dyn MessagePublisher>,
    retry_config: RetryConfig,
    metrics: Option<Arc<Metrics>>,
}

impl BusDispatcher {
    pub fn new(publisher: Arc<dyn MessagePublisher>) -> Self {
        Self {
            publisher,
            retry_config: RetryConfig::aggressive(), // More retries for committed events
            metrics: None,
        }
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[async_trait]
impl EventDispatcher for BusDispatcher {
    async fn dispatch(&self, message: &OutboxMessage) -> Result<(), DispatchError> {
        let payload = serde_json::to_string(&BusMessage::from_outbox(message)?)?;
        let key = message_key(message.aggregate_id);

        let publisher = &self.publisher;
        let metrics = self.metrics.as_ref();
        let topic = message.topic.as_str();
        let payload = payload.as_str();
        let key = key.as_str();
        let event_id = message.event_id;

        let result = retry_on_transient(&self.retry_config, move |attempt| async move {
            if attempt > 1 {
                if let Some(metrics) = metrics {
                    metrics.record_dispatch_retry(topic);
                }
            }
            tracing::debug!(attempt = attempt, event_id = %event_id, "Attempting to publish event");
            publisher.publish(topic, key, payload).await
        })
        .await;

        match result {
            RetryResult::Success { attempts, .. } => {
                if let Some(metrics) = metrics {
                    metrics.record_dispatched(topic);
                }
                tracing::info!(
                    event_id = %message.event_id,
                    event_type = %message.event_type,
                    attempts = attempts,
                    "✅ Published domain event"
                );
                Ok(())
            }
            RetryResult::Failed { error, .. } | RetryResult::PermanentFailure(error) => {
                if let Some(metrics) = metrics {
                    metrics.record_dispatch_failed(topic);
                }
                Err(error)
            }
        }
    }
}

/// Hand every committed event to the dispatcher. Failures are logged, never
/// returned: the data is already durable.
pub async fn dispatch_committed(dispatcher: &dyn EventDispatcher, messages: Vec<OutboxMessage>) {
    for message in &messages {
        if let Err(e) = dispatcher.dispatch(message).await {
            tracing::error!(
                error = %e,
                event_id = %message.event_id,
                event_type = %message.event_type,
                topic = %message.topic,
                "❌ Failed to dispatch committed event"
            );
        }
    }
}

/// Captures dispatched events for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    dispatched: std::sync::Mutex<Vec<OutboxMessage>>,
}

#[cfg(test)]
impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<OutboxMessage> {
        self.dispatched.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl EventDispatcher for RecordingDispatcher {
    async fn dispatch(&self, message: &OutboxMessage) -> Result<(), DispatchError> {
        self.dispatched.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::student::{Email, StudentEmailChanged, StudentEvent};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    /// Fails the first `failures` calls, then records what it was given
    struct FlakyPublisher {
        failures: u32,
        calls: AtomicU32,
        published: Mutex<Vec<(String, String, String)>>,
    }

    impl FlakyPublisher {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                published: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MessagePublisher for FlakyPublisher {
        async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), DispatchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                return Err(DispatchError::Broker("broker down".to_string()));
            }
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), key.to_string(), payload.to_string()));
            Ok(())
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            multiplier: 2.0,
        }
    }

    fn email_changed() -> OutboxMessage {
        let student_id = Uuid::new_v4();
        let event = StudentEvent::EmailChanged(StudentEmailChanged {
            student_id,
            new_email: Email::create("new@example.com").unwrap(),
        });
        OutboxMessage::from_event(student_id, "Student", &event).unwrap()
    }

    #[test]
    fn test_only_broker_errors_are_transient() {
        assert!(DispatchError::Broker("x".into()).is_transient());
        assert!(!DispatchError::Configuration("x".into()).is_transient());
    }

    #[tokio::test]
    async fn test_bus_dispatcher_publishes_envelope_keyed_by_aggregate() {
        let publisher = Arc::new(FlakyPublisher::new(0));
        let dispatcher = BusDispatcher::new(publisher.clone()).with_retry_config(fast_retry());
        let message = email_changed();

        dispatcher.dispatch(&message).await.unwrap();

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (topic, key, payload) = &published[0];
        assert_eq!(topic, "student-email-changed");
        assert_eq!(key, &message.aggregate_id.to_string());

        let envelope: BusMessage<serde_json::Value> = serde_json::from_str(payload).unwrap();
        assert_eq!(envelope.object_id, Some(message.aggregate_id.to_string()));
        assert_eq!(envelope.message["data"]["new_email"], "new@example.com");
    }

    #[tokio::test]
    async fn test_bus_dispatcher_retries_and_counts() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let publisher = Arc::new(FlakyPublisher::new(2));
        let dispatcher = BusDispatcher::new(publisher.clone())
            .with_retry_config(fast_retry())
            .with_metrics(metrics.clone());

        dispatcher.dispatch(&email_changed()).await.unwrap();

        assert_eq!(publisher.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            metrics.dispatch_retry_attempts.with_label_values(&["student-email-changed"]).get(),
            2
        );
        assert_eq!(metrics.events_dispatched.with_label_values(&["student-email-changed"]).get(), 1);
    }

    #[tokio::test]
    async fn test_bus_dispatcher_gives_up() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let publisher = Arc::new(FlakyPublisher::new(10));
        let dispatcher = BusDispatcher::new(publisher.clone())
            .with_retry_config(fast_retry())
            .with_metrics(metrics.clone());

        let err = dispatcher.dispatch(&email_changed()).await.unwrap_err();

        assert!(matches!(err, DispatchError::Broker(_)));
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            metrics.events_dispatch_failed.with_label_values(&["student-email-changed"]).get(),
            1
        );
    }

    #[tokio::test]
    async fn test_dispatch_committed_swallows_failures() {
        let publisher = Arc::new(FlakyPublisher::new(10));
        let dispatcher = BusDispatcher::new(publisher.clone()).with_retry_config(fast_retry());

        dispatch_committed(&dispatcher, vec![email_changed(), email_changed()]).await;

        // Both messages were attempted despite the first failing
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_logging_dispatcher_accepts_everything() {
        assert!(LoggingDispatcher.dispatch(&email_changed()).await.is_ok());
    }
}
