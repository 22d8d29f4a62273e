// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation for the Sokoni assistant.
//!
//! [`LlmResponder`] implements [`ResponderAdapter`] over the completion
//! Messages API: it maps the shopper's recent exchanges into conversation
//! turns, advertises the catalog tools, and loops on tool-use rounds,
//! dispatching each call through the typed [`CatalogTools`] capability.

pub mod catalog;
pub mod client;
pub mod tools;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use sokoni_config::model::ResponderConfig;
use sokoni_core::types::{AdapterType, Direction, HealthStatus, ReplyRequest};
use sokoni_core::{CatalogTools, PluginAdapter, ResponderAdapter, SokoniError};
use tracing::{debug, warn};

pub use catalog::StaticCatalog;
use client::CompletionClient;
use types::{ApiMessage, ContentBlock, MessageRequest, MessageResponse};

/// Maximum tool-use rounds before the loop is cut off.
const MAX_TOOL_ROUNDS: usize = 4;

/// Completion-backend responder implementing [`ResponderAdapter`].
pub struct LlmResponder {
    client: CompletionClient,
    catalog: Arc<dyn CatalogTools>,
    model: String,
    max_tokens: u32,
}

impl LlmResponder {
    /// Creates a responder from config and an injected catalog capability.
    ///
    /// The API key comes from `responder.api_key` or the `ANTHROPIC_API_KEY`
    /// environment variable.
    pub fn new(
        config: &ResponderConfig,
        catalog: Arc<dyn CatalogTools>,
    ) -> Result<Self, SokoniError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                SokoniError::Config(
                    "responder.api_key or ANTHROPIC_API_KEY is required".into(),
                )
            })?;

        let client = CompletionClient::new(&api_key, &config.api_version)?;
        Ok(Self {
            client,
            catalog,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    #[cfg(test)]
    fn with_client(client: CompletionClient, catalog: Arc<dyn CatalogTools>) -> Self {
        Self {
            client,
            catalog,
            model: "test-model".to_string(),
            max_tokens: 256,
        }
    }

    /// Runs the completion, resolving tool-use rounds until the backend
    /// produces a final text reply.
    async fn complete_with_tools(
        &self,
        system: String,
        mut messages: Vec<ApiMessage>,
    ) -> Result<String, SokoniError> {
        for round in 0..=MAX_TOOL_ROUNDS {
            let request = MessageRequest {
                model: self.model.clone(),
                max_tokens: self.max_tokens,
                system: Some(system.clone()),
                messages: messages.clone(),
                tools: Some(tools::definitions()),
            };
            let response = self.client.complete(&request).await?;

            if response.stop_reason.as_deref() != Some("tool_use") {
                let text = response.text();
                if text.is_empty() {
                    return Err(SokoniError::Responder {
                        message: "backend returned an empty reply".into(),
                        source: None,
                    });
                }
                return Ok(text);
            }

            if round == MAX_TOOL_ROUNDS {
                break;
            }
            debug!(round, "resolving tool-use round");
            let results = self.run_tool_round(&response).await?;
            messages.push(ApiMessage {
                role: "assistant".to_string(),
                content: response.content.clone(),
            });
            messages.push(ApiMessage {
                role: "user".to_string(),
                content: results,
            });
        }

        Err(SokoniError::Responder {
            message: format!("tool-use loop exceeded {MAX_TOOL_ROUNDS} rounds"),
            source: None,
        })
    }

    /// Dispatches every tool call in a response through the catalog.
    ///
    /// A failing tool feeds an error string back to the model rather than
    /// aborting the reply.
    async fn run_tool_round(
        &self,
        response: &MessageResponse,
    ) -> Result<Vec<ContentBlock>, SokoniError> {
        let mut results = Vec::new();
        for (id, name, input) in response.tool_uses() {
            let content = match tools::dispatch(self.catalog.as_ref(), name, input).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(tool = name, error = %e, "tool call failed");
                    format!("tool error: {e}")
                }
            };
            results.push(ContentBlock::ToolResult {
                tool_use_id: id.to_string(),
                content,
            });
        }
        Ok(results)
    }
}

#[async_trait]
impl PluginAdapter for LlmResponder {
    fn name(&self) -> &str {
        "completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Responder
    }

    async fn health_check(&self) -> Result<HealthStatus, SokoniError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SokoniError> {
        Ok(())
    }
}

#[async_trait]
impl ResponderAdapter for LlmResponder {
    async fn generate(&self, request: ReplyRequest) -> Result<String, SokoniError> {
        let store = self.catalog.store_details().await?;
        let system = build_system_prompt(&store.name, request.contact_name.as_deref());
        let messages = build_messages(&request);
        self.complete_with_tools(system, messages).await
    }
}

/// Assembles the system prompt for a reply.
fn build_system_prompt(store_name: &str, contact_name: Option<&str>) -> String {
    let mut prompt = format!(
        "You are the WhatsApp assistant for {store_name}. Answer shoppers' \
         questions about products, prices, and the store. Use the catalog \
         tools for product facts instead of guessing. Keep replies short and \
         friendly; this is a chat, not an email."
    );
    if let Some(name) = contact_name {
        prompt.push_str(&format!(" The shopper's name is {name}."));
    }
    prompt
}

/// Maps logged history plus the current message into API turns.
///
/// The API requires the conversation to start with a user turn and to
/// alternate roles, so leading assistant turns are dropped and consecutive
/// same-role turns merged.
fn build_messages(request: &ReplyRequest) -> Vec<ApiMessage> {
    let mut messages: Vec<ApiMessage> = Vec::new();

    for turn in &request.history {
        let role = match turn.direction {
            Direction::Inbound => "user",
            Direction::Outbound => "assistant",
        };
        if messages.is_empty() && role == "assistant" {
            continue;
        }
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push(ContentBlock::Text {
                    text: turn.body.clone(),
                });
            }
            _ => messages.push(ApiMessage {
                role: role.to_string(),
                content: vec![ContentBlock::Text {
                    text: turn.body.clone(),
                }],
            }),
        }
    }

    let mut body = request.body.clone();
    if let Some(media) = &request.media {
        let kind = media.mime_type.as_deref().unwrap_or("attachment");
        body.push_str(&format!("\n[shopper attached media: {kind}]"));
    }
    match messages.last_mut() {
        Some(last) if last.role == "user" => {
            last.content.push(ContentBlock::Text { text: body });
        }
        _ => messages.push(ApiMessage::user_text(body)),
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use sokoni_config::model::{ProductConfig, StoreConfig};
    use sokoni_core::types::{HistoryTurn, MediaAttachment};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog() -> Arc<StaticCatalog> {
        Arc::new(StaticCatalog::from_config(&StoreConfig {
            name: "Duka Mjini".to_string(),
            address: "Tom Mboya St".to_string(),
            opening_hours: "daily 9-5".to_string(),
            phone: "+254711000000".to_string(),
            products: vec![ProductConfig {
                name: "Solar lantern".to_string(),
                price: "KES 1,200".to_string(),
                category: "solar".to_string(),
                url: None,
                on_sale: true,
            }],
        }))
    }

    fn reply_request(body: &str, history: Vec<HistoryTurn>) -> ReplyRequest {
        ReplyRequest {
            contact_name: Some("Asha".to_string()),
            history,
            body: body.to_string(),
            media: None,
        }
    }

    #[test]
    fn messages_drop_leading_assistant_and_merge_roles() {
        let request = reply_request(
            "is it still available?",
            vec![
                HistoryTurn {
                    direction: Direction::Outbound,
                    body: "karibu!".to_string(),
                },
                HistoryTurn {
                    direction: Direction::Inbound,
                    body: "hi".to_string(),
                },
                HistoryTurn {
                    direction: Direction::Inbound,
                    body: "do you sell lanterns?".to_string(),
                },
                HistoryTurn {
                    direction: Direction::Outbound,
                    body: "yes, KES 1,200".to_string(),
                },
            ],
        );
        let messages = build_messages(&request);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content.len(), 2); // merged consecutive user turns
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].role, "user"); // the current message
    }

    #[test]
    fn media_note_is_appended_to_body() {
        let mut request = reply_request("what is this?", vec![]);
        request.media = Some(MediaAttachment {
            url: "http://bridge/media/9".to_string(),
            mime_type: Some("image/jpeg".to_string()),
            caption: None,
        });
        let messages = build_messages(&request);
        let ContentBlock::Text { text } = &messages[0].content[0] else {
            panic!("expected text block");
        };
        assert!(text.contains("image/jpeg"));
    }

    #[test]
    fn system_prompt_names_store_and_shopper() {
        let prompt = build_system_prompt("Duka Mjini", Some("Asha"));
        assert!(prompt.contains("Duka Mjini"));
        assert!(prompt.contains("Asha"));
    }

    #[tokio::test]
    async fn generate_returns_text_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"content":[{"type":"text","text":"Yes, in stock!"}],"stop_reason":"end_turn"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = CompletionClient::new("sk-test", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        let responder = LlmResponder::with_client(client, catalog());

        let reply = responder
            .generate(reply_request("do you have lanterns?", vec![]))
            .await
            .unwrap();
        assert_eq!(reply, "Yes, in stock!");
    }

    #[tokio::test]
    async fn generate_resolves_a_tool_use_round() {
        let server = MockServer::start().await;
        // First round: the model asks for a catalog search.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"content":[{"type":"tool_use","id":"tu_1","name":"search",
                    "input":{"query":"lantern"}}],"stop_reason":"tool_use"}"#,
                "application/json",
            ))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        // Second round: final text.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"content":[{"type":"text","text":"The solar lantern is KES 1,200."}],
                    "stop_reason":"end_turn"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = CompletionClient::new("sk-test", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        let responder = LlmResponder::with_client(client, catalog());

        let reply = responder
            .generate(reply_request("how much is the lantern?", vec![]))
            .await
            .unwrap();
        assert!(reply.contains("KES 1,200"));
    }
}
