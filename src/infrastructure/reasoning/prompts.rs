//! Prompt templates for the LLM reasoning gateway

use crate::domain::agent::ContextFragment;

pub const DECIDE_SYSTEM_PROMPT: &str = r#"You are a support agent answering questions about a software product.
You may search two knowledge sources before answering:
- "docs": the product documentation
- "chat_history": previously answered community threads

Decide whether the context gathered so far is enough to answer the question.
Respond with a single JSON object and nothing else, in one of these shapes:
{"action": "continue_research", "sub_query": "<search query>", "sources": ["docs", "chat_history"]}
{"action": "ready_to_answer", "reason": "<why the context is sufficient>"}

Feedback from an admin overrides everything else. Prefer answering once the
context covers the question; do not repeat a query that already returned results."#;

pub const DRAFT_SYSTEM_PROMPT: &str = r#"You are a support agent answering questions about a software product.
Write the final answer to the user's question using only the context provided.
If an admin gave feedback on an earlier draft, the new answer must address it.
Be concise, use markdown, and include code samples when the docs contain them."#;

/// Render the context as labeled sections, oldest first
pub fn render_context(context: &[ContextFragment]) -> String {
    if context.is_empty() {
        return "(none yet)".to_string();
    }

    context
        .iter()
        .enumerate()
        .map(|(i, fragment)| format!("[{}] {}:\n{}", i + 1, fragment.intent, fragment.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_user_prompt(question: &str, context: &[ContextFragment]) -> String {
    format!(
        "Question:\n{}\n\nContext:\n{}",
        question,
        render_context(context)
    )
}
