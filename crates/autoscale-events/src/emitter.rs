//! `DownstreamEmitter` port implementations (4.H).

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use autoscale_core::ports::DownstreamEmitter;
use autoscale_core::types::InstanceSnapshot;

use crate::event::DownstreamEvent;

/// Posts the wire-exact `DownstreamEvent` JSON to `snapshot.downstream_topic`.
///
/// Best-effort per the port contract: transport failures are logged and
/// swallowed, never surfaced to the orchestrator.
pub struct HttpDownstreamEmitter {
    client: Client,
}

impl HttpDownstreamEmitter {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for HttpDownstreamEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownstreamEmitter for HttpDownstreamEmitter {
    async fn emit(&self, event_name: &str, snapshot: &InstanceSnapshot, suggested_size: i64) {
        let Some(topic) = snapshot.downstream_topic.as_deref() else {
            debug!(event_name, instance_id = %snapshot.instance_id, "no downstream topic configured, skipping emit");
            return;
        };

        let event = DownstreamEvent::new(snapshot, suggested_size);
        let body = serde_json::json!({
            "event": event_name,
            "payload": event,
        });

        if let Err(err) = self.client.post(topic).json(&body).send().await {
            warn!(event_name, topic, error = %err, "failed to publish downstream event");
        }
    }
}

/// Discards every event. Used in tests and for snapshots with no topic
/// configured.
#[derive(Debug, Default)]
pub struct NullDownstreamEmitter;

#[async_trait]
impl DownstreamEmitter for NullDownstreamEmitter {
    async fn emit(&self, _event_name: &str, _snapshot: &InstanceSnapshot, _suggested_size: i64) {}
}
