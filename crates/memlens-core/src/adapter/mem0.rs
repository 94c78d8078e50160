//! Mem0 adapter (synthesized-reply variant).
//!
//! One chat message becomes:
//!
//! 1. `POST /v1/memories/` with the user message -- load-bearing
//! 2. `POST /v1/memories/search/` for up to 5 related memories
//! 3. on search failure, `GET /v1/memories/?user_id=` -- list everything
//! 4. reply synthesis from [`MEM0_RULES`]
//! 5. `POST /v1/memories/` with the assistant reply
//!
//! Only step 1 can fail the request. Steps 2-3 degrade to an empty memory
//! set and step 5 is fire-once.

use serde_json::{Value, json};

use memlens_types::chat::VendorReply;
use memlens_types::config::VendorConfig;
use memlens_types::error::ProxyError;

use super::{extract_memories, snippets};
use crate::client::VendorClient;
use crate::outcome::StepOutcome;
use crate::reply::{MEM0_RULES, ReplyContext, synthesize};
use crate::transport::box_transport::BoxTransport;

const MEMORIES_PATH: &str = "/v1/memories/";
const SEARCH_PATH: &str = "/v1/memories/search/";

/// Maximum memories requested from search.
pub const SEARCH_LIMIT: usize = 5;

/// Maximum memory snippets woven into a reply.
pub const REPLY_SNIPPETS: usize = 3;

/// Mem0 adapter bound to one resolved configuration.
pub struct Mem0Adapter<'a> {
    client: VendorClient<'a>,
}

impl<'a> Mem0Adapter<'a> {
    pub fn new(transport: &'a BoxTransport, config: &'a VendorConfig) -> Self {
        Self {
            client: VendorClient::new(transport, config),
        }
    }

    /// Store `message` for `user_id`, then build a reply from related memories.
    #[tracing::instrument(name = "mem0.send_message", skip_all, fields(user_id = %user_id))]
    pub async fn send_message(&self, message: &str, user_id: &str) -> Result<VendorReply, ProxyError> {
        let added = self.add_memory(user_id, "user", message).await?;

        let memories = self.retrieve(user_id, message).await.completed().unwrap_or_default();
        let found = snippets(&memories, REPLY_SNIPPETS);

        let text = synthesize(
            MEM0_RULES,
            &ReplyContext {
                message,
                snippets: &found,
                summary: None,
                last_assistant: None,
            },
        );

        let stored = StepOutcome::record(
            self.client.vendor(),
            "store_reply",
            self.add_memory(user_id, "assistant", &text).await,
        );
        tracing::debug!(
            memories = memories.len(),
            reply_stored = !stored.is_degraded(),
            "mem0 reply synthesized"
        );

        Ok(VendorReply {
            text,
            raw: added,
            memories,
            summary: None,
            message: message.to_string(),
        })
    }

    /// Search, falling back to a full listing, falling back to nothing.
    async fn retrieve(&self, user_id: &str, query: &str) -> StepOutcome<Vec<Value>> {
        let vendor = self.client.vendor();
        match StepOutcome::record(vendor, "search", self.search(user_id, query).await) {
            StepOutcome::Completed(memories) => StepOutcome::Completed(memories),
            StepOutcome::Degraded { .. } => {
                StepOutcome::record(vendor, "list", self.list(user_id).await)
            }
        }
    }

    async fn add_memory(&self, user_id: &str, role: &str, content: &str) -> Result<Value, ProxyError> {
        let body = json!({
            "messages": [{ "role": role, "content": content }],
            "user_id": user_id,
        });
        let response = self.client.post(MEMORIES_PATH, body).await?;
        Ok(response.body.into_json())
    }

    async fn search(&self, user_id: &str, query: &str) -> Result<Vec<Value>, ProxyError> {
        let body = json!({
            "query": query,
            "user_id": user_id,
            "limit": SEARCH_LIMIT,
        });
        let response = self.client.post(SEARCH_PATH, body).await?;
        let mut memories = extract_memories(&response.body.into_json());
        memories.truncate(SEARCH_LIMIT);
        Ok(memories)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Value>, ProxyError> {
        let path = format!("{MEMORIES_PATH}?user_id={}", urlencoding::encode(user_id));
        let response = self.client.get(&path).await?;
        Ok(extract_memories(&response.body.into_json()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;
    use memlens_types::config::AuthScheme;
    use memlens_types::error::TransportErrorKind;
    use memlens_types::transport::HttpMethod::{Get, Post};
    use memlens_types::vendor::Vendor;
    use secrecy::SecretString;

    fn config() -> VendorConfig {
        VendorConfig {
            vendor: Vendor::Mem0,
            base_url: "https://api.mem0.ai".to_string(),
            api_key: SecretString::from("m0-test".to_string()),
            auth_scheme: AuthScheme::Token,
        }
    }

    fn added() -> Value {
        json!([{"id": "mem-1", "event": "ADD", "data": {"memory": "Likes tea"}}])
    }

    #[tokio::test]
    async fn test_happy_path_uses_search_results() {
        let scripted = ScriptedTransport::new()
            .respond(Post, MEMORIES_PATH, 200, added())
            .respond(
                Post,
                SEARCH_PATH,
                200,
                json!({"results": [{"memory": "Likes tea"}, {"memory": "Lives in Oslo"}]}),
            );
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let reply = Mem0Adapter::new(&transport, &cfg)
            .send_message("what do you remember about me?", "alice")
            .await
            .unwrap();

        assert!(reply.text.contains("- Likes tea"));
        assert!(reply.text.contains("- Lives in Oslo"));
        assert_eq!(reply.memories.len(), 2);
        assert_eq!(reply.raw, added());
        assert_eq!(reply.message, "what do you remember about me?");

        // add user message, search, store reply; no list call
        assert_eq!(scripted.count(Post, MEMORIES_PATH), 2);
        assert_eq!(scripted.count(Get, MEMORIES_PATH), 0);

        let calls = scripted.calls();
        assert_eq!(calls[0].authorization, "Token m0-test");
        assert_eq!(calls[0].body.as_ref().unwrap()["user_id"], "alice");
        assert_eq!(calls[1].body.as_ref().unwrap()["limit"], 5);
        let stored = calls[2].body.as_ref().unwrap();
        assert_eq!(stored["messages"][0]["role"], "assistant");
        assert_eq!(stored["messages"][0]["content"], reply.text);
    }

    #[tokio::test]
    async fn test_search_failure_falls_back_to_list() {
        let scripted = ScriptedTransport::new()
            .respond(Post, MEMORIES_PATH, 200, added())
            .respond(Post, SEARCH_PATH, 500, json!({"detail": "search unavailable"}))
            .respond(Get, MEMORIES_PATH, 200, json!([{"memory": "Has a dog"}]));
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let reply = Mem0Adapter::new(&transport, &cfg)
            .send_message("I got a new leash", "bob smith")
            .await
            .unwrap();

        assert!(reply.text.contains("Has a dog"));
        assert_eq!(scripted.count(Get, MEMORIES_PATH), 1);
        let list_call = scripted
            .calls()
            .into_iter()
            .find(|c| c.method == Get)
            .unwrap();
        assert!(list_call.url.ends_with("?user_id=bob%20smith"));
    }

    #[tokio::test]
    async fn test_add_failure_is_load_bearing() {
        let scripted = ScriptedTransport::new().respond(
            Post,
            MEMORIES_PATH,
            401,
            json!({"detail": "Invalid API key"}),
        );
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();

        let err = Mem0Adapter::new(&transport, &cfg)
            .send_message("hello", "alice")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(scripted.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reply_is_non_empty_when_all_retrieval_fails() {
        let cfg = config();

        for message in ["hi", "what do you remember", "x", "I like rust"] {
            // add succeeds once, then the reply store fails
            let scripted = ScriptedTransport::new()
                .respond(Post, MEMORIES_PATH, 200, added())
                .respond(Post, MEMORIES_PATH, 503, json!({"message": "down"}))
                .fail(Post, SEARCH_PATH, TransportErrorKind::Timeout)
                .respond(Get, MEMORIES_PATH, 500, json!({}));
            let transport = BoxTransport::new(scripted);
            let reply = Mem0Adapter::new(&transport, &cfg)
                .send_message(message, "alice")
                .await
                .unwrap();
            assert!(!reply.text.trim().is_empty(), "empty reply for {message:?}");
            assert!(reply.memories.is_empty());
        }
    }

    #[tokio::test]
    async fn test_repeated_calls_keep_the_same_shape() {
        let scripted = ScriptedTransport::new()
            .respond(Post, MEMORIES_PATH, 200, added())
            .respond(Post, SEARCH_PATH, 200, json!([{"memory": "Likes tea"}]));
        let transport = BoxTransport::new(scripted.clone());
        let cfg = config();
        let adapter = Mem0Adapter::new(&transport, &cfg);

        let first = adapter.send_message("I like coffee too", "alice").await.unwrap();
        let second = adapter.send_message("I like coffee too", "alice").await.unwrap();

        assert_eq!(first.text, second.text);
        assert_eq!(first.memories, second.memories);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert_eq!(scripted.call_count(), 6);
    }
}
