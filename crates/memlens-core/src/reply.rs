//! Reply synthesis from retrieved memory.
//!
//! Neither vendor generates chat replies, so the adapters build one from
//! whatever memory context came back. The heuristic is an ordered list of
//! [`ReplyRule`]s: each pairs a predicate over the message and context with a
//! template. Rules are evaluated in order, the first match wins, and each
//! list ends with an unconditional rule, so synthesis always yields text.

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct ReplyContext<'a> {
    /// The user's message, already trimmed and non-empty.
    pub message: &'a str,
    /// Memory snippets in retrieval order.
    pub snippets: &'a [String],
    /// Vendor-computed conversation summary.
    pub summary: Option<&'a str>,
    /// Most recent assistant message in the session history.
    pub last_assistant: Option<&'a str>,
}

impl ReplyContext<'_> {
    /// Summary or prior assistant turn, whichever is available.
    fn history(&self) -> Option<&str> {
        self.summary.or(self.last_assistant)
    }
}

/// A `(predicate, template)` pair.
pub struct ReplyRule {
    pub name: &'static str,
    pub matches: fn(&ReplyContext<'_>) -> bool,
    pub render: fn(&ReplyContext<'_>) -> String,
}

/// Used only if every matching template renders blank.
pub const FALLBACK_REPLY: &str = "I received your message.";

/// Evaluate `rules` in order and render the first match.
pub fn synthesize(rules: &[ReplyRule], ctx: &ReplyContext<'_>) -> String {
    for rule in rules {
        if !(rule.matches)(ctx) {
            continue;
        }
        let reply = (rule.render)(ctx);
        if !reply.trim().is_empty() {
            tracing::debug!(rule = rule.name, "reply rule matched");
            return reply;
        }
    }
    FALLBACK_REPLY.to_string()
}

const GREETINGS: &[&str] = &["hi", "hello", "hey", "hiya", "howdy", "greetings", "yo"];
const GREETING_PHRASES: &[&str] = &["good morning", "good afternoon", "good evening"];
const RECALL_PHRASES: &[&str] = &[
    "what do you remember",
    "what do you know about me",
    "do you remember",
    "what have i told you",
    "remember about me",
    "what did i tell you",
];

/// "hi", "Hello there!", "good morning" ...
pub fn is_greeting(message: &str) -> bool {
    let lower = message.trim().to_lowercase();
    if GREETING_PHRASES.iter().any(|p| lower.starts_with(p)) {
        return true;
    }
    lower
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .is_some_and(|word| GREETINGS.contains(&word))
}

/// "What do you remember about me?" and friends.
pub fn is_recall_query(message: &str) -> bool {
    let lower = message.to_lowercase();
    RECALL_PHRASES.iter().any(|p| lower.contains(p))
}

fn bullet_list(snippets: &[String], limit: usize) -> String {
    snippets
        .iter()
        .take(limit)
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mem0 rules: tone driven by how many memories came back.
pub const MEM0_RULES: &[ReplyRule] = &[
    ReplyRule {
        name: "greeting",
        matches: |ctx| is_greeting(ctx.message),
        render: |ctx| match ctx.snippets.first() {
            Some(first) => format!("Hello! Good to hear from you again. I remember: {first}"),
            None => "Hello! I'm ready to chat. Anything you tell me will be stored in memory."
                .to_string(),
        },
    },
    ReplyRule {
        name: "recall_with_memories",
        matches: |ctx| is_recall_query(ctx.message) && !ctx.snippets.is_empty(),
        render: |ctx| format!("Here's what I remember:\n{}", bullet_list(ctx.snippets, 3)),
    },
    ReplyRule {
        name: "recall_empty",
        matches: |ctx| is_recall_query(ctx.message),
        render: |_| {
            "I don't have any memories stored for you yet. Tell me something and I'll remember it."
                .to_string()
        },
    },
    ReplyRule {
        name: "related_memories",
        matches: |ctx| !ctx.snippets.is_empty(),
        render: |ctx| {
            let related = ctx.snippets.iter().take(3).cloned().collect::<Vec<_>>().join("; ");
            format!("Got it, I've added that to memory. Related things I remember: {related}")
        },
    },
    ReplyRule {
        name: "acknowledge",
        matches: |_| true,
        render: |ctx| format!("Got it! I've stored \"{}\" in memory.", ctx.message),
    },
];

/// Zep rules: prefer the vendor summary, then session history, then facts.
pub const ZEP_RULES: &[ReplyRule] = &[
    ReplyRule {
        name: "greeting",
        matches: |ctx| is_greeting(ctx.message) && ctx.history().is_some(),
        render: |ctx| {
            format!(
                "Hello again! Here's where we left off: {}",
                ctx.history().unwrap_or_default()
            )
        },
    },
    ReplyRule {
        name: "recall",
        matches: |ctx| is_recall_query(ctx.message) && ctx.history().is_some(),
        render: |ctx| {
            format!(
                "Here's what I remember from our conversation: {}",
                ctx.history().unwrap_or_default()
            )
        },
    },
    ReplyRule {
        name: "summary",
        matches: |ctx| ctx.summary.is_some(),
        render: |ctx| format!("Based on our conversation so far: {}", ctx.summary.unwrap_or_default()),
    },
    ReplyRule {
        name: "last_assistant",
        matches: |ctx| ctx.last_assistant.is_some(),
        render: |ctx| ctx.last_assistant.unwrap_or_default().to_string(),
    },
    ReplyRule {
        name: "memories",
        matches: |ctx| !ctx.snippets.is_empty(),
        render: |ctx| ctx.snippets.iter().take(2).cloned().collect::<Vec<_>>().join(" "),
    },
    ReplyRule {
        name: "acknowledge",
        matches: |_| true,
        render: |ctx| format!("I've added your message to the session: \"{}\"", ctx.message),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(message: &'a str, snippets: &'a [String]) -> ReplyContext<'a> {
        ReplyContext {
            message,
            snippets,
            summary: None,
            last_assistant: None,
        }
    }

    fn snippets(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_greeting_detection() {
        assert!(is_greeting("hi"));
        assert!(is_greeting("Hello there!"));
        assert!(is_greeting("hey, how are you"));
        assert!(is_greeting("Good morning"));
        assert!(!is_greeting("this is not a greeting"));
        assert!(!is_greeting("history lesson"));
    }

    #[test]
    fn test_recall_detection() {
        assert!(is_recall_query("What do you remember about me?"));
        assert!(is_recall_query("so... do you remember my dog?"));
        assert!(!is_recall_query("I like tea"));
    }

    #[test]
    fn test_mem0_recall_lists_up_to_three() {
        let mems = snippets(&["likes tea", "lives in Oslo", "has a dog", "plays chess"]);
        let reply = synthesize(MEM0_RULES, &ctx("What do you remember?", &mems));
        assert!(reply.starts_with("Here's what I remember:"));
        assert!(reply.contains("- has a dog"));
        assert!(!reply.contains("plays chess"));
    }

    #[test]
    fn test_mem0_recall_without_memories() {
        let reply = synthesize(MEM0_RULES, &ctx("what do you remember", &[]));
        assert!(reply.contains("don't have any memories"));
    }

    #[test]
    fn test_mem0_greeting_wins_over_related() {
        let mems = snippets(&["likes tea"]);
        let reply = synthesize(MEM0_RULES, &ctx("hello", &mems));
        assert!(reply.starts_with("Hello!"));
        assert!(reply.contains("likes tea"));
    }

    #[test]
    fn test_mem0_default_acknowledges_message() {
        let reply = synthesize(MEM0_RULES, &ctx("I like hiking", &[]));
        assert_eq!(reply, "Got it! I've stored \"I like hiking\" in memory.");
    }

    #[test]
    fn test_zep_prefers_summary() {
        let mems = snippets(&["fact one"]);
        let mut c = ctx("tell me more", &mems);
        c.summary = Some("User is planning a trip.");
        c.last_assistant = Some("Sure!");
        let reply = synthesize(ZEP_RULES, &c);
        assert_eq!(reply, "Based on our conversation so far: User is planning a trip.");
    }

    #[test]
    fn test_zep_falls_back_to_last_assistant_then_snippets() {
        let mems = snippets(&["fact one", "fact two", "fact three"]);
        let mut c = ctx("tell me more", &mems);
        c.last_assistant = Some("Earlier reply");
        assert_eq!(synthesize(ZEP_RULES, &c), "Earlier reply");

        c.last_assistant = None;
        assert_eq!(synthesize(ZEP_RULES, &c), "fact one fact two");
    }

    #[test]
    fn test_zep_greeting_needs_history() {
        let reply = synthesize(ZEP_RULES, &ctx("hi", &[]));
        assert!(reply.starts_with("I've added your message"));

        let mut c = ctx("hi", &[]);
        c.summary = Some("We discussed Rust.");
        assert!(synthesize(ZEP_RULES, &c).starts_with("Hello again!"));
    }

    #[test]
    fn test_every_rule_list_ends_unconditionally() {
        for rules in [MEM0_RULES, ZEP_RULES] {
            let last = rules.last().unwrap();
            assert!((last.matches)(&ctx("anything", &[])));
        }
    }

    #[test]
    fn test_blank_render_falls_through() {
        let rules = [
            ReplyRule {
                name: "blank",
                matches: |_| true,
                render: |_| "   ".to_string(),
            },
            ReplyRule {
                name: "next",
                matches: |_| true,
                render: |_| "second".to_string(),
            },
        ];
        assert_eq!(synthesize(&rules, &ctx("x", &[])), "second");
        assert_eq!(synthesize(&rules[..1], &ctx("x", &[])), FALLBACK_REPLY);
    }
}
