//! Zep adapter.
//!
//! Session lifecycle per message:
//!
//! 1. probe `GET /api/v2/sessions/{id}`; on 404 create it once, owned by a
//!    user named after the session
//! 2. append the user message
//! 3. read the session memory
//! 4. synthesize a reply from [`ZEP_RULES`]
//! 5. append the assistant reply (best-effort)
//!
//! Steps 1-3 are load-bearing.

use serde_json::{Value, json};

use memlens_types::chat::VendorReply;
use memlens_types::config::VendorConfig;
use memlens_types::error::ProxyError;

use super::{extract_memories, snippets};
use crate::client::VendorClient;
use crate::outcome::StepOutcome;
use crate::reply::{ReplyContext, ZEP_RULES, synthesize};
use crate::transport::box_transport::BoxTransport;

const SESSIONS_PATH: &str = "/api/v2/sessions";

/// Maximum memory snippets woven into a reply.
pub const REPLY_SNIPPETS: usize = 2;

/// Whether the session existed before this message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Existing,
    Created,
}

/// Zep adapter bound to one resolved configuration.
pub struct ZepAdapter<'a> {
    client: VendorClient<'a>,
}

impl<'a> ZepAdapter<'a> {
    pub fn new(transport: &'a BoxTransport, config: &'a VendorConfig) -> Self {
        Self {
            client: VendorClient::new(transport, config),
        }
    }

    /// Append `message` to `session_id` and build a reply from session memory.
    #[tracing::instrument(name = "zep.send_message", skip_all, fields(session_id = %session_id))]
    pub async fn send_message(&self, message: &str, session_id: &str) -> Result<VendorReply, ProxyError> {
        let state = self.ensure_session(session_id).await?;
        self.append(session_id, "user", message).await?;
        let memory = self.read_memory(session_id).await?;

        let summary = summary_of(&memory);
        let summary_text = summary.as_ref().and_then(summary_text);
        let last_assistant = last_assistant_message(&memory);
        let memories = extract_memories(&memory);
        let mut found = snippets(&memories, REPLY_SNIPPETS);
        if found.is_empty() {
            found.extend(context_snippet(&memory));
        }

        let text = synthesize(
            ZEP_RULES,
            &ReplyContext {
                message,
                snippets: &found,
                summary: summary_text.as_deref(),
                last_assistant: last_assistant.as_deref(),
            },
        );

        let stored = StepOutcome::record(
            self.client.vendor(),
            "store_reply",
            self.append(session_id, "assistant", &text).await,
        );
        tracing::debug!(
            session = ?state,
            memories = memories.len(),
            has_summary = summary.is_some(),
            reply_stored = !stored.is_degraded(),
            "zep reply synthesized"
        );

        Ok(VendorReply {
            text,
            raw: memory,
            memories,
            summary,
            message: message.to_string(),
        })
    }

    /// Make sure the session exists, creating it on 404.
    pub async fn ensure_session(&self, session_id: &str) -> Result<SessionState, ProxyError> {
        match self.client.get(&session_path(session_id)).await {
            Ok(_) => Ok(SessionState::Existing),
            Err(ProxyError::Http { status: 404, .. }) => {
                tracing::info!(session_id, "zep session not found; creating");
                self.client
                    .post(SESSIONS_PATH, json!({ "session_id": session_id, "user_id": session_id }))
                    .await?;
                Ok(SessionState::Created)
            }
            Err(err @ ProxyError::Http { status: 401, .. }) => {
                if let ProxyError::Http { status, url, headers, body } = &err {
                    tracing::warn!(
                        status,
                        %url,
                        headers = ?headers,
                        body = %body.to_details(),
                        "zep rejected the API key while probing the session"
                    );
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn append(&self, session_id: &str, role: &str, content: &str) -> Result<(), ProxyError> {
        let path = format!("{}/messages", session_path(session_id));
        self.client.post(&path, message_body(role, content)).await?;
        Ok(())
    }

    async fn read_memory(&self, session_id: &str) -> Result<Value, ProxyError> {
        let path = format!("{}/memory", session_path(session_id));
        let response = self.client.get(&path).await?;
        Ok(response.body.into_json())
    }
}

fn session_path(session_id: &str) -> String {
    format!("{SESSIONS_PATH}/{}", urlencoding::encode(session_id))
}

/// Request body for the messages endpoint.
pub fn message_body(role: &str, content: &str) -> Value {
    json!({
        "messages": [{ "role": role, "role_type": role, "content": content }],
    })
}

/// The summary object, when the memory carries a non-empty one.
fn summary_of(memory: &Value) -> Option<Value> {
    let summary = memory.get("summary")?;
    summary_text(summary).map(|_| summary.clone())
}

/// `summary.content`, or the summary itself when it is a string.
fn summary_text(summary: &Value) -> Option<String> {
    let text = match summary {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("content").and_then(Value::as_str)?,
        _ => return None,
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Content of the most recent assistant message in the session history.
fn last_assistant_message(memory: &Value) -> Option<String> {
    memory
        .get("messages")?
        .as_array()?
        .iter()
        .rev()
        .filter(|m| {
            ["role", "role_type"]
                .iter()
                .any(|key| m.get(*key).and_then(Value::as_str) == Some("assistant"))
        })
        .find_map(|m| {
            m.get("content")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
        })
}

/// Pre-rendered context string, used when no structured facts came back.
fn context_snippet(memory: &Value) -> Option<String> {
    memory
        .get("context")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;
    use memlens_types::config::AuthScheme;
    use memlens_types::transport::HttpMethod::{Get, Post};
    use memlens_types::vendor::Vendor;
    use secrecy::SecretString;

    const PROBE: &str = "/api/v2/sessions/s-1";
    const MESSAGES: &str = "/api/v2/sessions/s-1/messages";
    const MEMORY: &str = "/api/v2/sessions/s-1/memory";

    fn config() -> VendorConfig {
        VendorConfig {
            vendor: Vendor::Zep,
            base_url: "https://api.getzep.com".to_string(),
            api_key: SecretString::from("z_test".to_string()),
            auth_scheme: AuthScheme::Bearer,
        }
    }

    fn memory() -> Value {
        json!({
            "summary": {"content": "User is planning a trip to Japan."},
            "messages": [
                {"role": "user", "role_type": "user", "content": "I want to visit Kyoto"},
                {"role": "assistant", "role_type": "assistant", "content": "Kyoto is lovely in spring."},
            ],
            "relevant_facts": [{"fact": "User wants to visit Kyoto"}],
        })
    }

    #[tokio::test]
    async fn test_missing_session_is_created_exactly_once() {
        let scripted = ScriptedTransport::new()
            .respond(Get, PROBE, 404, json!({"message": "not found"}))
            .respond(Post, SESSIONS_PATH, 201, json!({"session_id": "s-1"}))
            .respond(Post, MESSAGES, 200, json!({}))
            .respond(Get, MEMORY, 200, memory());
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let reply = ZepAdapter::new(&transport, &cfg)
            .send_message("tell me more", "s-1")
            .await
            .unwrap();

        assert_eq!(scripted.count(Post, SESSIONS_PATH), 1);
        let paths: Vec<_> = scripted.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec![PROBE, SESSIONS_PATH, MESSAGES, MEMORY, MESSAGES]);

        let create = &scripted.calls()[1];
        let create_body = create.body.as_ref().unwrap();
        assert_eq!(create_body["session_id"], "s-1");
        assert_eq!(create_body["user_id"], "s-1");
        assert_eq!(create.authorization, "Bearer z_test");

        assert_eq!(reply.text, "Based on our conversation so far: User is planning a trip to Japan.");
        assert_eq!(reply.summary, Some(json!({"content": "User is planning a trip to Japan."})));
        assert_eq!(reply.memories.len(), 1);
        assert_eq!(reply.raw, memory());
    }

    #[tokio::test]
    async fn test_existing_session_skips_create() {
        let scripted = ScriptedTransport::new()
            .respond(Get, PROBE, 200, json!({"session_id": "s-1"}))
            .respond(Post, MESSAGES, 200, json!({}))
            .respond(Get, MEMORY, 200, json!({"messages": []}));
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let reply = ZepAdapter::new(&transport, &cfg)
            .send_message("I like ramen", "s-1")
            .await
            .unwrap();

        assert_eq!(scripted.count(Post, SESSIONS_PATH), 0);
        assert_eq!(reply.text, "I've added your message to the session: \"I like ramen\"");
        assert!(reply.summary.is_none());

        let append = &scripted.calls()[1];
        let sent = &append.body.as_ref().unwrap()["messages"][0];
        assert_eq!(sent["role"], "user");
        assert_eq!(sent["role_type"], "user");
        assert_eq!(sent["content"], "I like ramen");
    }

    #[tokio::test]
    async fn test_probe_unauthorized_is_hard_failure() {
        let scripted = ScriptedTransport::new().respond_raw(
            Get,
            PROBE,
            401,
            memlens_types::transport::RawBody::Text("Unauthorized".into()),
        );
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let err = ZepAdapter::new(&transport, &cfg)
            .send_message("hello", "s-1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(scripted.call_count(), 1);
    }

    #[tokio::test]
    async fn test_create_failure_is_hard_failure() {
        let scripted = ScriptedTransport::new()
            .respond(Get, PROBE, 404, json!({}))
            .respond(Post, SESSIONS_PATH, 500, json!({"message": "boom"}));
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let err = ZepAdapter::new(&transport, &cfg)
            .send_message("hello", "s-1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(scripted.count(Post, MESSAGES), 0);
    }

    #[tokio::test]
    async fn test_append_failure_is_hard_failure() {
        let scripted = ScriptedTransport::new()
            .respond(Get, PROBE, 200, json!({}))
            .respond(Post, MESSAGES, 500, json!({"message": "append failed"}));
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let err = ZepAdapter::new(&transport, &cfg)
            .send_message("hello", "s-1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(scripted.count(Get, MEMORY), 0);
        assert_eq!(scripted.count(Post, MESSAGES), 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_hard_failure() {
        let scripted = ScriptedTransport::new()
            .respond(Get, PROBE, 200, json!({}))
            .respond(Post, MESSAGES, 200, json!({}))
            .respond(Get, MEMORY, 500, json!({"message": "memory unavailable"}));
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let err = ZepAdapter::new(&transport, &cfg)
            .send_message("hello", "s-1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        // only the user message was appended; no assistant reply stored
        assert_eq!(scripted.count(Post, MESSAGES), 1);
    }

    #[tokio::test]
    async fn test_text_memory_is_passed_through_as_raw() {
        let scripted = ScriptedTransport::new()
            .respond(Get, PROBE, 200, json!({}))
            .respond(Post, MESSAGES, 200, json!({}))
            .respond_raw(Get, MEMORY, 200, memlens_types::transport::RawBody::Text("plain memory text".into()));
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let reply = ZepAdapter::new(&transport, &cfg)
            .send_message("I like ramen", "s-1")
            .await
            .unwrap();

        assert_eq!(reply.raw, json!("plain memory text"));
        assert!(reply.memories.is_empty());
        assert!(!reply.text.is_empty());
    }

    #[tokio::test]
    async fn test_reply_store_failure_is_absorbed() {
        let scripted = ScriptedTransport::new()
            .respond(Get, PROBE, 200, json!({}))
            .respond(Post, MESSAGES, 200, json!({}))
            .respond(Post, MESSAGES, 503, json!({"message": "unavailable"}))
            .respond(Get, MEMORY, 200, memory());
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let reply = ZepAdapter::new(&transport, &cfg)
            .send_message("hi", "s-1")
            .await
            .unwrap();

        assert!(reply.text.starts_with("Hello again!"));
        assert_eq!(scripted.count(Post, MESSAGES), 2);
    }

    #[tokio::test]
    async fn test_session_id_is_url_encoded() {
        let scripted = ScriptedTransport::new()
            .respond(Get, "/api/v2/sessions/a%2Fb", 200, json!({}))
            .respond(Post, "/api/v2/sessions/a%2Fb/messages", 200, json!({}))
            .respond(Get, "/api/v2/sessions/a%2Fb/memory", 200, json!({}));
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        ZepAdapter::new(&transport, &cfg)
            .send_message("hello", "a/b")
            .await
            .unwrap();
        assert_eq!(scripted.count(Post, SESSIONS_PATH), 0);
    }

    #[test]
    fn test_memory_extraction_helpers() {
        assert_eq!(
            last_assistant_message(&memory()).as_deref(),
            Some("Kyoto is lovely in spring.")
        );
        assert_eq!(summary_text(&json!("plain summary")).as_deref(), Some("plain summary"));
        assert!(summary_of(&json!({"summary": {"content": "  "}})).is_none());
        assert_eq!(
            context_snippet(&json!({"context": " FACTS: likes tea "})).as_deref(),
            Some("FACTS: likes tea")
        );
    }

    #[test]
    fn test_last_assistant_matches_role_type_only() {
        let memory = json!({
            "messages": [
                {"role": "Bot", "role_type": "assistant", "content": "first"},
                {"role_type": "user", "content": "question"},
            ]
        });
        assert_eq!(last_assistant_message(&memory).as_deref(), Some("first"));
    }
}
