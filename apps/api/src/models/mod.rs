pub mod job;
pub mod pending;
pub mod profile;
