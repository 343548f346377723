// User profile ("repo") view and onboarding persistence.

pub mod completeness;
pub mod handlers;
pub mod repository;
