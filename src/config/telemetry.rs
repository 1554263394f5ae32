use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for the request telemetry middleware.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct TelemetryConfig {
    /// Fixed sleep applied before every request and reported as "latency".
    ///
    /// This is a synthetic number, not a network measurement. Zero disables it.
    #[serde(default)]
    pub simulated_latency_ms: u64,
}
