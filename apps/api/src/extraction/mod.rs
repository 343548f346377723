// Transcript extraction: LLM extraction, incremental merge, company
// enrichment and the pending-item review queue.

pub mod enrichment;
pub mod extract;
pub mod handlers;
pub mod merge;
pub mod models;
pub mod pending;
pub mod prompts;
