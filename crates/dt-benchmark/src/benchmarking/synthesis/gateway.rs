use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::SynthesisRequest;

/// Structured text returned by the collaborator. Carried through as-is, never interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisBundle {
    pub overall_assessment: String,
    pub key_insights: Vec<String>,
    pub actionable_recommendations: Vec<String>,
    pub competitive_advantages: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "synthesis", rename_all = "snake_case")]
pub enum SynthesisReply {
    #[serde(rename = "ok")]
    Bundle(SynthesisBundle),
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("synthesis timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
    #[error("synthesis transport failed: {0}")]
    Transport(String),
    #[error("synthesis collaborator rejected the request with status {status}")]
    Rejected { status: u16 },
    #[error("synthesis payload was malformed: {0}")]
    MalformedPayload(String),
    #[error("no synthesis collaborator is configured")]
    NotConfigured,
}

impl SynthesisError {
    /// A user-initiated retry may succeed.
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotConfigured)
    }
}

/// Outbound port to the natural-language synthesis collaborator.
#[async_trait]
pub trait SynthesisGateway: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest)
        -> Result<SynthesisReply, SynthesisError>;
}

/// Stand-in used when no collaborator endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSynthesisGateway;

#[async_trait]
impl SynthesisGateway for OfflineSynthesisGateway {
    async fn synthesize(
        &self,
        _request: &SynthesisRequest,
    ) -> Result<SynthesisReply, SynthesisError> {
        Err(SynthesisError::NotConfigured)
    }
}
