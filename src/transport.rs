use async_trait::async_trait;
use reqwest::Client;

#[cfg(test)]
use mockall::automock;

use crate::config::GeminiConfig;
use crate::error::{CompassError, Result};
use crate::models::{
    Citation, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleSearch, Part, ServiceRequest, ServiceResponse, ThinkingConfig, Tool,
};

/// One round trip to the generative-text service. No retry, no timeout.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(&self, req: &ServiceRequest) -> Result<ServiceResponse>;
}

pub struct GeminiTransport {
    client: Client,
    gemini: GeminiConfig,
}

impl GeminiTransport {
    pub fn new(gemini: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            gemini,
        }
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.gemini.base_url.trim_end_matches('/'),
            model_id
        )
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate(&self, req: &ServiceRequest) -> Result<ServiceResponse> {
        let api_key = self.gemini.require_credential()?;
        let url = self.endpoint(&req.model_id);

        tracing::info!(
            kind = %req.kind,
            model = %req.model_id,
            tools = req.tools_enabled,
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::from(req))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Gemini request failed");
            return Err(CompassError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        into_service_response(parsed, req.tools_enabled)
    }
}

impl From<&ServiceRequest> for GenerateContentRequest {
    fn from(req: &ServiceRequest) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(req.content.clone()),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(req.system_instruction.clone()),
                }],
            },
            generation_config: GenerationConfig {
                temperature: req.temperature,
                thinking_config: req.reasoning_budget.map(|thinking_budget| ThinkingConfig {
                    thinking_budget,
                }),
            },
            tools: if req.tools_enabled {
                vec![Tool {
                    google_search: GoogleSearch::default(),
                }]
            } else {
                Vec::new()
            },
        }
    }
}

/// Text of the first candidate plus its grounding references.
///
/// Grounding data is dropped unless search was enabled on the request.
pub fn into_service_response(
    resp: GenerateContentResponse,
    tools_enabled: bool,
) -> Result<ServiceResponse> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or(CompassError::EmptyResponse)?;

    let raw_text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    if raw_text.trim().is_empty() {
        return Err(CompassError::EmptyResponse);
    }

    let citations = match (tools_enabled, candidate.grounding_metadata) {
        (true, Some(meta)) => meta
            .grounding_chunks
            .into_iter()
            .map(|chunk| match chunk.web {
                Some(web) => Citation {
                    title: web.title,
                    uri: web.uri,
                },
                None => Citation::default(),
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(ServiceResponse {
        raw_text,
        citations,
    })
}
