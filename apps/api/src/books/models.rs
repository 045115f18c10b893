//! Request and response bodies for the book endpoints, plus fixed fallback payloads.
//!
//! Request fields are `Option` so that a missing field surfaces as a 400
//! validation error from the handler instead of an extractor rejection.

use serde::{Deserialize, Deserializer, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBookRequest {
    pub book_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    pub book_title: Option<String>,
    /// The reader's situation and goal, free text.
    pub user_context: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendBooksRequest {
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfRequest {
    /// Plan text as returned by generate-plan, possibly edited by the user.
    pub content: Option<String>,
    pub book_title: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

/// Context shown before the user writes their goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInfo {
    /// One sentence, starting "This book is about...".
    pub description: String,
    /// Typical reader goals the book addresses, phrased in the first person.
    pub popular_queries: Vec<String>,
    pub examples: Vec<PersonExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonExample {
    pub name: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub author: String,
    pub reason: String,
    /// 80-100, higher is a closer match. Accepts a number or a numeric string.
    #[serde(deserialize_with = "deserialize_relevance")]
    pub relevance: f32,
}

fn deserialize_relevance<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f32),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(text) => text
            .trim()
            .trim_end_matches('%')
            .trim_end()
            .parse()
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Fallbacks
// ────────────────────────────────────────────────────────────────────────────

impl BookInfo {
    /// Generic book context used when the model output cannot be parsed.
    pub fn fallback() -> Self {
        BookInfo {
            description: "This book is about personal growth and changing your life".to_string(),
            popular_queries: vec![
                "I want to change my life".to_string(),
                "Become more productive".to_string(),
                "Reach my goals".to_string(),
                "Find motivation".to_string(),
            ],
            examples: vec![
                PersonExample {
                    name: "The author".to_string(),
                    quote: "Has applied these principles for many years".to_string(),
                },
                PersonExample {
                    name: "A well-known entrepreneur".to_string(),
                    quote: "This book changed the way I approach my work".to_string(),
                },
            ],
        }
    }
}

/// Broadly useful books returned when recommendation fails for any reason.
pub fn fallback_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            title: "Atomic Habits".to_string(),
            author: "James Clear".to_string(),
            reason: "A universal book about change. Works for almost any goal by building \
                     the right small habits."
                .to_string(),
            relevance: 90.0,
        },
        Recommendation {
            title: "Influence: The Psychology of Persuasion".to_string(),
            author: "Robert Cialdini".to_string(),
            reason: "Helps you understand people and work with them effectively. Useful in \
                     every area of life."
                .to_string(),
            relevance: 85.0,
        },
        Recommendation {
            title: "Mindset".to_string(),
            author: "Carol Dweck".to_string(),
            reason: "Builds a growth mindset. Teaches you to treat difficulties as chances \
                     to improve."
                .to_string(),
            relevance: 83.0,
        },
    ]
}
