// Job lookups for saved-job lists and the per-job graph view.

pub mod handlers;
pub mod repository;
