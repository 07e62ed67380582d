// Document generation: resume, cover letter, HR outreach message.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod context;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;

#[cfg(test)]
pub(crate) mod testing;
