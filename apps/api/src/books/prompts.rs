//! LLM prompt templates for the book endpoints.
//!
//! Templates use `{placeholder}` markers filled by the builder functions below.
//! The plan template asks for exactly the line markers that
//! `layout::StyleRules::default()` recognizes, so generated plans lay out
//! with headings, action headers and rationales styled.

use crate::llm_client::prompts::PLAIN_LANGUAGE_INSTRUCTION;

// ────────────────────────────────────────────────────────────────────────────
// Analyze book
// ────────────────────────────────────────────────────────────────────────────

pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"You are an expert on self-development and business books. Your job is to help people turn a book into action.

BOOK: "{book_title}"

Return a JSON object with three fields:
1. "description": one sentence describing the book, starting with "This book is about..."
2. "popularQueries": an array of 4 popular goals or problems this book helps with, written as the reader would phrase them
3. "examples": an array of 2 real people (preferably well known) who applied the book's principles, each {"name": "...", "quote": "..."} with a 10-15 word quote

FORMAT:
{
  "description": "This book is about ...",
  "popularQueries": ["I want to ...", "Stop/start ...", "...", "..."],
  "examples": [
    {"name": "...", "quote": "..."},
    {"name": "...", "quote": "..."}
  ]
}

If you do not know this book, produce plausible content based on its title."#;

// ────────────────────────────────────────────────────────────────────────────
// Generate plan
// ────────────────────────────────────────────────────────────────────────────

pub const PLAN_PROMPT_TEMPLATE: &str = r#"You are an expert at turning book knowledge into concrete action. Transform the ideas of a book into immediate, practical steps.

TASK:
- Book: "{book_title}"
- Reader's context: "{user_context}"

PROCESS:
1. Identify the book and its author
2. Extract the 5 MAIN IDEAS of the book
3. Create 3-5 CONCRETE ACTIONS personalised to the reader's context
   - Each action must be simple, doable and specific
   - Explain WHY each action matters, referring to the book's ideas
   - Order actions from easiest to hardest

OUTPUT FORMAT (STRICT):

[Book title] - [Author]

━━━━━━━━━━━━━━━━━━━━━━━

MAIN IDEAS OF THE BOOK:

1. [First key idea, 1-2 sentences]

2. [Second key idea, 1-2 sentences]

3. [Third key idea, 1-2 sentences]

4. [Fourth key idea, 1-2 sentences]

5. [Fifth key idea, 1-2 sentences]

━━━━━━━━━━━━━━━━━━━━━━━

CONCRETE ACTIONS:

Action 1:
[A concrete, specific action]
Why: [Explanation referring to the book's ideas]

Action 2:
[A concrete, specific action]
Why: [Explanation referring to the book's ideas]

Action 3:
[A concrete, specific action]
Why: [Explanation referring to the book's ideas]

RULES:
- Be AS CONCRETE AS POSSIBLE ("tomorrow at 7am do 10 push-ups", not "exercise more")
- Every action must take 5-30 minutes
- Personalise the actions to: "{user_context}"
- Keep the section headings, "Action N:" and "Why:" markers exactly as shown
- The whole answer should be 300-500 words
- {language_instruction}"#;

// ────────────────────────────────────────────────────────────────────────────
// Recommend books
// ────────────────────────────────────────────────────────────────────────────

pub const RECOMMEND_SYSTEM: &str =
    "You are an expert at choosing books. You answer with valid JSON only, without markdown.";

pub const RECOMMEND_PROMPT_TEMPLATE: &str = r#"You are an expert at picking books for personal growth and self-development.

The user described their goal or problem: "{query}"

Suggest the 3 best books that will help reach this goal or solve this problem.

For each book give:
- title: the book title
- author: the author
- reason: why this book fits (2-3 sentences, specific to the user's request)
- relevance: 80 to 100, how closely it matches

Answer ONLY with a valid JSON array, no extra text:
[
  {
    "title": "Title",
    "author": "Author",
    "reason": "Explanation...",
    "relevance": 95
  }
]"#;

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

pub fn build_analyze_prompt(book_title: &str) -> String {
    ANALYZE_PROMPT_TEMPLATE.replace("{book_title}", book_title)
}

pub fn build_plan_prompt(book_title: &str, user_context: &str) -> String {
    PLAN_PROMPT_TEMPLATE
        .replace("{book_title}", book_title)
        .replace("{user_context}", user_context)
        .replace("{language_instruction}", PLAIN_LANGUAGE_INSTRUCTION)
}

pub fn build_recommend_prompt(query: &str) -> String {
    RECOMMEND_PROMPT_TEMPLATE.replace("{query}", query)
}
