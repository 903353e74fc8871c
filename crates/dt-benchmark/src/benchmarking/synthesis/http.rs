use std::time::Duration;

use async_trait::async_trait;

use super::gateway::{SynthesisError, SynthesisGateway, SynthesisReply};
use super::SynthesisRequest;

/// Posts synthesis requests as JSON to a collaborator endpoint.
#[derive(Debug, Clone)]
pub struct HttpSynthesisGateway {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSynthesisGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SynthesisError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SynthesisError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> SynthesisError {
        if err.is_timeout() {
            SynthesisError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            SynthesisError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl SynthesisGateway for HttpSynthesisGateway {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisReply, SynthesisError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|err| self.transport_error(err))?;
        serde_json::from_slice::<SynthesisReply>(&body)
            .map_err(|err| SynthesisError::MalformedPayload(err.to_string()))
    }
}
