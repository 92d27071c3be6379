//! Wire-exact `DownstreamEvent` schema (§6).

use serde::Serialize;

use autoscale_core::types::{InstanceSnapshot, MetricSample, Units};

#[derive(Debug, Clone, Serialize)]
pub struct DownstreamEvent {
    pub project_id: String,
    pub instance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    pub metrics: Vec<MetricSample>,
}

impl DownstreamEvent {
    pub fn new(snapshot: &InstanceSnapshot, suggested_size: i64) -> Self {
        Self {
            project_id: snapshot.project_id.clone(),
            instance_id: snapshot.instance_id.clone(),
            current_size: i32::try_from(snapshot.current_size).ok(),
            suggested_size: i32::try_from(suggested_size).ok(),
            units: Some(snapshot.units),
            metrics: snapshot.metrics.clone(),
        }
    }
}
