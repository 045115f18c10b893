// Book endpoints: analyze a book, generate an action plan, recommend books,
// export a plan as PDF. All LLM calls go through llm_client::CompletionClient.

pub mod export;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
