// Company validation: normalizes free-text employer names and decides
// whether the user should confirm the match before it is saved.

pub mod handlers;
pub mod prompts;
pub mod validator;

pub use validator::{CompanyValidation, CompanyValidator, LlmCompanyValidator, ValidatorError};
