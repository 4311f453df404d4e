//! OpenAI Chat Completions provider with strict `json_schema` output.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::selection::DealSelection;
use crate::agent::DealModel;
use crate::config::AiConfig;
use crate::error::ModelError;

const USER_AGENT: &str = "deal-scanner/0.1";
const SCHEMA_NAME: &str = "deal_selection";

/// Requires an API key; see `AiConfig`.
pub struct OpenAiModel {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiModel {
    pub fn new(cfg: &AiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    response_format: ResponseFormat<'a>,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[async_trait]
impl DealModel for OpenAiModel {
    async fn select(
        &self,
        instructions: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<DealSelection, ModelError> {
        if self.api_key.is_empty() {
            return Err(ModelError::MissingApiKey);
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: instructions,
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: SCHEMA_NAME,
                    strict: true,
                    schema,
                },
            },
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| ModelError::Envelope(e.to_string()))?;
        let message = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(ModelError::Empty)?;

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(ModelError::Refusal(refusal));
        }
        let content = message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(ModelError::Empty)?;

        Ok(serde_json::from_str(&content)?)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
