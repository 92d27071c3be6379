//! Wire shapes for the resize API and operation-status API (§6).

use serde::{Deserialize, Serialize};

use autoscale_core::types::{Fulfillment, OperationStatusPayload, Units};

/// Request body for `ResizeClient::start`: exactly one of `nodeCount`
/// or `processingUnits` is set, matching `snapshot.units`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_units: Option<i64>,
}

impl ResizeRequest {
    pub fn for_units(units: Units, target_size: i64) -> Self {
        match units {
            Units::Nodes => Self {
                node_count: Some(target_size),
                processing_units: None,
            },
            Units::ProcessingUnits => Self {
                node_count: None,
                processing_units: Some(target_size),
            },
        }
    }
}

/// Response body of the resize API: `name` is the opaque operation id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeResponse {
    pub name: String,
    #[serde(default)]
    pub metadata: Option<ResizeResponseMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeResponseMetadata {
    #[serde(default)]
    pub expected_fulfillment_period: Option<String>,
}

/// Response body of the operation-status API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatusResponse {
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: Option<OperationStatusMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatusMetadata {
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub expected_fulfillment_period: Option<String>,
    #[serde(default)]
    pub instance: Option<OperationStatusInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatusInstance {
    #[serde(default)]
    pub node_count: Option<i64>,
    #[serde(default)]
    pub processing_units: Option<i64>,
}

fn parse_fulfillment(period: Option<&str>) -> Fulfillment {
    match period.map(str::to_ascii_uppercase).as_deref() {
        Some("NORMAL") => Fulfillment::Normal,
        Some("EXTENDED") => Fulfillment::Extended,
        _ => Fulfillment::Unspecified,
    }
}

impl OperationStatusResponse {
    /// Flatten the nested wire shape into the core's `OperationStatusPayload`.
    pub fn into_payload(self) -> OperationStatusPayload {
        let metadata = self.metadata;
        let fulfillment = parse_fulfillment(
            metadata
                .as_ref()
                .and_then(|m| m.expected_fulfillment_period.as_deref()),
        );
        OperationStatusPayload {
            done: self.done,
            error: self.error,
            start_time: metadata.as_ref().and_then(|m| m.start_time),
            end_time: metadata.as_ref().and_then(|m| m.end_time),
            fulfillment: Some(fulfillment),
            node_count: metadata
                .as_ref()
                .and_then(|m| m.instance.as_ref())
                .and_then(|i| i.node_count),
            processing_units: metadata
                .as_ref()
                .and_then(|m| m.instance.as_ref())
                .and_then(|i| i.processing_units),
        }
    }
}
