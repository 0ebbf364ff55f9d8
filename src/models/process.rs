use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A cable-manufacturing process step the render target knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum ProcessName {
    WireDrawing,
    Stranding,
    Laying,
    Extrusion,
    Bedding,
    Sheathing,
    Armouring,
}

impl ProcessName {
    /// All recognized process names, in the order they are reported to clients.
    pub const ALL: [ProcessName; 7] = [
        ProcessName::WireDrawing,
        ProcessName::Stranding,
        ProcessName::Laying,
        ProcessName::Extrusion,
        ProcessName::Bedding,
        ProcessName::Sheathing,
        ProcessName::Armouring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessName::WireDrawing => "WireDrawing",
            ProcessName::Stranding => "Stranding",
            ProcessName::Laying => "Laying",
            ProcessName::Extrusion => "Extrusion",
            ProcessName::Bedding => "Bedding",
            ProcessName::Sheathing => "Sheathing",
            ProcessName::Armouring => "Armouring",
        }
    }

    /// Comma-separated list of valid names, used in validation messages.
    pub fn expected_list() -> String {
        Self::ALL
            .iter()
            .map(ProcessName::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProcessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of [`ProcessName::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProcess(pub String);

impl FromStr for ProcessName {
    type Err = UnknownProcess;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact, case-sensitive match
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProcess(s.to_string()))
    }
}

/// A validated render request.
///
/// Only `processName` is checked; the rest of the payload is forwarded to the
/// render target untouched.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    process: ProcessName,
    payload: Map<String, Value>,
}

impl ProcessRequest {
    /// Build a request from an already-validated payload.
    pub(crate) fn new(process: ProcessName, payload: Map<String, Value>) -> Self {
        Self { process, payload }
    }

    pub fn process(&self) -> ProcessName {
        self.process
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Serialize the whole payload (including `processName`) as compact JSON.
    pub fn payload_json(&self) -> String {
        // A map of JSON values always serializes
        serde_json::to_string(&self.payload).unwrap_or_else(|_| "{}".to_string())
    }
}
