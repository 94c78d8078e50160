//! Side-by-side comparison: one message, both vendors, concurrently.

use memlens_types::chat::{BranchOutcome, ComparisonResult};
use memlens_types::error::ProxyError;
use memlens_types::vendor::Vendor;

use crate::adapter;
use crate::config::ResolvedChat;
use crate::normalize::normalize_error;
use crate::transport::box_transport::BoxTransport;

/// Run both branches concurrently and wait for both.
///
/// Each branch takes its own resolution result, so a validation failure on
/// one side is reported for that side only. Neither branch cancels the other.
#[tracing::instrument(name = "compare", skip_all)]
pub async fn compare(
    transport: &BoxTransport,
    mem0: Result<ResolvedChat, ProxyError>,
    zep: Result<ResolvedChat, ProxyError>,
) -> ComparisonResult {
    let (mem0, zep) = tokio::join!(
        branch(transport, Vendor::Mem0, mem0),
        branch(transport, Vendor::Zep, zep),
    );
    tracing::info!(
        mem0_ok = mem0.is_success(),
        zep_ok = zep.is_success(),
        "comparison finished"
    );
    ComparisonResult { mem0, zep }
}

async fn branch(
    transport: &BoxTransport,
    vendor: Vendor,
    resolved: Result<ResolvedChat, ProxyError>,
) -> BranchOutcome {
    let result = match resolved {
        Ok(chat) => adapter::send(transport, &chat).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(reply) => BranchOutcome::success(reply.text),
        Err(err) => {
            let normalized = normalize_error(vendor, &err);
            BranchOutcome::failure(normalized.user_message, normalized.http_status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_chat;
    use crate::transport::scripted::ScriptedTransport;
    use memlens_types::chat::ChatRequest;
    use memlens_types::config::ServerConfig;
    use memlens_types::transport::HttpMethod::{Get, Post};
    use serde_json::json;

    fn request(key: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: Some("I like tea".into()),
            session_id: Some("s-1".into()),
            api_key: key.map(String::from),
            api_url: None,
        }
    }

    #[tokio::test]
    async fn test_failing_branch_does_not_affect_the_other() {
        let scripted = ScriptedTransport::new()
            .respond(Post, "/v1/memories/", 200, json!([]))
            .respond(Post, "/v1/memories/search/", 200, json!([]))
            .respond(Get, "/api/v2/sessions/s-1", 401, json!({"message": "bad key"}));
        let transport = BoxTransport::new(scripted.clone());
        let server = ServerConfig::default();

        let result = compare(
            &transport,
            resolve_chat(Vendor::Mem0, request(Some("m0-key")), &server),
            resolve_chat(Vendor::Zep, request(Some("z_bad")), &server),
        )
        .await;

        assert_eq!(
            result.mem0.response.as_deref(),
            Some("Got it! I've stored \"I like tea\" in memory.")
        );
        assert!(result.mem0.error.is_none());

        assert!(result.zep.response.is_none());
        assert_eq!(result.zep.status, Some(401));
        assert!(result.zep.error.as_deref().unwrap().contains("invalid or expired"));
    }

    #[tokio::test]
    async fn test_validation_failure_is_reported_per_branch() {
        let scripted = ScriptedTransport::new()
            .respond(Get, "/api/v2/sessions/s-1", 200, json!({}))
            .respond(Post, "/api/v2/sessions/s-1/messages", 200, json!({}))
            .respond(Get, "/api/v2/sessions/s-1/memory", 200, json!({}));
        let transport = BoxTransport::new(scripted.clone());
        let server = ServerConfig::default();

        let result = compare(
            &transport,
            resolve_chat(Vendor::Mem0, request(None), &server),
            resolve_chat(Vendor::Zep, request(Some("z_key")), &server),
        )
        .await;

        assert_eq!(result.mem0.status, Some(400));
        assert!(result.mem0.error.as_deref().unwrap().contains("Mem0 API key is required"));
        assert!(result.zep.is_success());
        assert!(scripted.calls().iter().all(|c| c.path.starts_with("/api/v2/")));
    }
}
