//! Book services: one completion call each, plus response post-processing.
//!
//! All LLM calls go through `CompletionClient`; nothing here talks HTTP directly.

use anyhow::anyhow;
use tracing::{info, warn};

use crate::books::models::{fallback_recommendations, BookInfo, Recommendation};
use crate::books::prompts::{
    build_analyze_prompt, build_plan_prompt, build_recommend_prompt, RECOMMEND_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{parse_with_fallback, ChatMessage, CompletionClient, CompletionRequest};

const TEMPERATURE: f32 = 0.7;
const ANALYZE_MAX_TOKENS: u32 = 1000;
const PLAN_MAX_TOKENS: u32 = 2000;
const PLAN_TOP_P: f32 = 0.9;
const RECOMMEND_MAX_TOKENS: u32 = 2000;

/// Describes a book: summary, typical reader goals, real-world examples.
///
/// Upstream failures propagate. Unparseable model output is replaced by
/// `BookInfo::fallback()`.
pub async fn analyze_book(
    llm: &dyn CompletionClient,
    model: &str,
    book_title: &str,
) -> Result<BookInfo, AppError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(JSON_ONLY_SYSTEM),
            ChatMessage::user(build_analyze_prompt(book_title)),
        ],
        temperature: TEMPERATURE,
        max_tokens: ANALYZE_MAX_TOKENS,
        top_p: None,
    };

    let raw = llm.complete(request).await?;

    Ok(parse_with_fallback::<BookInfo>(&raw).unwrap_or_else(|e| {
        warn!(book_title, raw_len = raw.len(), "Using fallback book info: {e}");
        BookInfo::fallback()
    }))
}

/// Generates a plain-text action plan in the format the PDF layout understands.
pub async fn generate_plan(
    llm: &dyn CompletionClient,
    model: &str,
    book_title: &str,
    user_context: &str,
) -> Result<String, AppError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(build_plan_prompt(book_title, user_context))],
        temperature: TEMPERATURE,
        max_tokens: PLAN_MAX_TOKENS,
        top_p: Some(PLAN_TOP_P),
    };

    let plan = llm.complete(request).await?;
    info!(book_title, plan_len = plan.len(), "Plan generated");
    Ok(plan.trim().to_string())
}

/// Recommends books for a free-text goal.
///
/// Never fails: any error after validation (upstream, parse, empty list)
/// is logged and answered with `fallback_recommendations()`.
pub async fn recommend_books(
    llm: &dyn CompletionClient,
    model: &str,
    query: &str,
) -> Vec<Recommendation> {
    match try_recommend_books(llm, model, query).await {
        Ok(books) => books,
        Err(e) => {
            warn!(query, "Using fallback recommendations: {e:#}");
            fallback_recommendations()
        }
    }
}

async fn try_recommend_books(
    llm: &dyn CompletionClient,
    model: &str,
    query: &str,
) -> anyhow::Result<Vec<Recommendation>> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(RECOMMEND_SYSTEM),
            ChatMessage::user(build_recommend_prompt(query)),
        ],
        temperature: TEMPERATURE,
        max_tokens: RECOMMEND_MAX_TOKENS,
        top_p: None,
    };

    let raw = llm.complete(request).await?;
    let books: Vec<Recommendation> = parse_with_fallback(&raw)?;
    if books.is_empty() {
        return Err(anyhow!("model returned an empty recommendation list"));
    }
    Ok(books)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    /// Replies with a canned result and records every request it sees.
    pub(crate) struct StubCompletion {
        reply: Result<String, (u16, String)>,
        pub(crate) requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StubCompletion {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16, message: &str) -> Self {
            Self {
                reply: Err((status, message.to_string())),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for StubCompletion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, message)) => Err(LlmError::Api {
                    status: *status,
                    message: message.clone(),
                }),
            }
        }
    }

    const BOOK_INFO_JSON: &str = r#"```json
{
  "description": "This book is about deep focus",
  "popularQueries": ["Focus longer", "Stop checking email", "Write a book", "Study better"],
  "examples": [{"name": "Cal Newport", "quote": "Deep work is the superpower of the 21st century economy."}]
}
```"#;

    #[tokio::test]
    async fn test_analyze_book_parses_fenced_json() {
        let llm = StubCompletion::replying(BOOK_INFO_JSON);
        let info = analyze_book(&llm, "m", "Deep Work").await.unwrap();
        assert_eq!(info.description, "This book is about deep focus");
        assert_eq!(info.popular_queries.len(), 4);
        assert_eq!(info.examples[0].name, "Cal Newport");
    }

    #[tokio::test]
    async fn test_analyze_book_falls_back_on_prose() {
        let llm = StubCompletion::replying("I am not sure which book you mean.");
        let info = analyze_book(&llm, "m", "Unknown").await.unwrap();
        assert_eq!(info, BookInfo::fallback());
    }

    #[tokio::test]
    async fn test_analyze_book_propagates_upstream_error() {
        let llm = StubCompletion::failing(429, "Rate limit reached");
        let err = analyze_book(&llm, "m", "Deep Work").await.unwrap_err();
        assert!(
            matches!(err, AppError::Upstream { status: 429, ref message } if message == "Rate limit reached")
        );
    }

    #[tokio::test]
    async fn test_analyze_book_request_shape() {
        let llm = StubCompletion::replying(BOOK_INFO_JSON);
        analyze_book(&llm, "llama-test", "Deep Work").await.unwrap();
        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "llama-test");
        assert_eq!(requests[0].max_tokens, 1000);
        assert!(requests[0].top_p.is_none());
        assert!(requests[0].messages[1].content.contains("Deep Work"));
    }

    #[tokio::test]
    async fn test_generate_plan_returns_trimmed_text() {
        let llm = StubCompletion::replying("\n\nDeep Work - Cal Newport\n\nMAIN IDEAS:\n");
        let plan = generate_plan(&llm, "m", "Deep Work", "I get distracted")
            .await
            .unwrap();
        assert_eq!(plan, "Deep Work - Cal Newport\n\nMAIN IDEAS:");

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests[0].top_p, Some(0.9));
        assert_eq!(requests[0].max_tokens, 2000);
        assert!(requests[0].messages[0].content.contains("I get distracted"));
    }

    #[tokio::test]
    async fn test_generate_plan_propagates_upstream_error() {
        let llm = StubCompletion::failing(503, "Service unavailable");
        let err = generate_plan(&llm, "m", "Deep Work", "ctx").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_recommend_books_parses_array() {
        let llm = StubCompletion::replying(
            r#"[{"title": "Why We Sleep", "author": "Matthew Walker", "reason": "Explains sleep.", "relevance": 97}]"#,
        );
        let books = recommend_books(&llm, "m", "sleep better").await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Why We Sleep");
        assert_eq!(books[0].relevance, 97.0);
    }

    #[tokio::test]
    async fn test_recommend_books_keeps_fractional_and_string_relevance() {
        let llm = StubCompletion::replying(
            r#"[
                {"title": "Why We Sleep", "author": "Matthew Walker", "reason": "Explains sleep.", "relevance": 92.5},
                {"title": "The Sleep Revolution", "author": "Arianna Huffington", "reason": "Habits.", "relevance": "88"}
            ]"#,
        );
        let books = recommend_books(&llm, "m", "sleep better").await;
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Why We Sleep", "The Sleep Revolution"]);
        assert_eq!(books[0].relevance, 92.5);
    }

    #[tokio::test]
    async fn test_recommend_books_falls_back_on_empty_array() {
        let llm = StubCompletion::replying("[]");
        assert_eq!(
            recommend_books(&llm, "m", "q").await,
            fallback_recommendations()
        );
    }

    #[tokio::test]
    async fn test_recommend_books_falls_back_on_upstream_error() {
        let llm = StubCompletion::failing(500, "boom");
        assert_eq!(
            recommend_books(&llm, "m", "q").await,
            fallback_recommendations()
        );
    }

    #[tokio::test]
    async fn test_recommend_books_falls_back_on_object() {
        let llm = StubCompletion::replying(r#"{"title": "Not an array"}"#);
        assert_eq!(
            recommend_books(&llm, "m", "q").await,
            fallback_recommendations()
        );
    }
}
