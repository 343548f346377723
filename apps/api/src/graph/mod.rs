// Knowledge graph views. Graphs are read-time projections: the user graph
// prefers the Zep service and falls back to relational rows; the job graph
// is a deterministic star built from a single job.

pub mod assembler;
pub mod handlers;
pub mod job_graph;
pub mod local;
pub mod sync;
pub mod types;
pub mod zep;
