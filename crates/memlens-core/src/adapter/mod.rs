//! Vendor adapters.
//!
//! Each adapter sequences the vendor calls behind one chat message and
//! returns a [`VendorReply`](memlens_types::chat::VendorReply). Load-bearing
//! steps propagate their [`ProxyError`](memlens_types::error::ProxyError);
//! best-effort steps are recorded as [`StepOutcome`](crate::outcome::StepOutcome).

pub mod mem0;
pub mod zep;

use serde_json::Value;

use memlens_types::chat::VendorReply;
use memlens_types::error::ProxyError;
use memlens_types::vendor::Vendor;

use crate::config::ResolvedChat;
use crate::transport::box_transport::BoxTransport;

/// Keys under which vendors return memory lists, in preference order.
const MEMORY_LIST_KEYS: &[&str] = &["results", "memories", "relevant_facts", "facts"];

/// Keys holding the text of a single memory entry, in preference order.
const SNIPPET_KEYS: &[&str] = &["memory", "fact", "content", "text", "data"];

/// Route a resolved chat call to its vendor's adapter.
pub async fn send(transport: &BoxTransport, chat: &ResolvedChat) -> Result<VendorReply, ProxyError> {
    match chat.config.vendor {
        Vendor::Mem0 => {
            mem0::Mem0Adapter::new(transport, &chat.config)
                .send_message(&chat.message, &chat.session_id)
                .await
        }
        Vendor::Zep => {
            zep::ZepAdapter::new(transport, &chat.config)
                .send_message(&chat.message, &chat.session_id)
                .await
        }
    }
}

/// Pull a memory list out of a vendor payload.
///
/// Accepts a bare array or an object carrying one of the known list keys.
/// Anything else yields an empty list.
pub fn extract_memories(body: &Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items.clone(),
        Value::Object(map) => MEMORY_LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Human-readable text of one memory entry, if it has any.
pub fn memory_snippet(memory: &Value) -> Option<String> {
    let text = match memory {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => SNIPPET_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    }?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Snippets of the first `limit` memories that have text.
pub fn snippets(memories: &[Value], limit: usize) -> Vec<String> {
    memories.iter().filter_map(memory_snippet).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_memories_shapes() {
        assert_eq!(extract_memories(&json!([{"memory": "a"}])).len(), 1);
        assert_eq!(extract_memories(&json!({"results": [1, 2]})).len(), 2);
        assert_eq!(extract_memories(&json!({"relevant_facts": [{"fact": "x"}]})).len(), 1);
        assert!(extract_memories(&json!({"results": "nope"})).is_empty());
        assert!(extract_memories(&json!("text")).is_empty());
        assert!(extract_memories(&Value::Null).is_empty());
    }

    #[test]
    fn test_memory_snippet_keys() {
        assert_eq!(memory_snippet(&json!({"memory": " likes tea "})), Some("likes tea".into()));
        assert_eq!(memory_snippet(&json!({"fact": "lives in Oslo"})), Some("lives in Oslo".into()));
        assert_eq!(memory_snippet(&json!("plain")), Some("plain".into()));
        assert_eq!(memory_snippet(&json!({"memory": "  "})), None);
        assert_eq!(memory_snippet(&json!({"id": 3})), None);
    }

    #[test]
    fn test_snippets_skip_empty_entries() {
        let memories = vec![json!({"id": 1}), json!({"memory": "a"}), json!("b"), json!("c")];
        assert_eq!(snippets(&memories, 2), vec!["a".to_string(), "b".to_string()]);
    }
}
