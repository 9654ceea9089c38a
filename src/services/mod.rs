//! Clients of the external APIs that do the actual work on changed files.
pub mod completion;
pub mod execution;

pub use completion::{CompletionApiKey, CompletionClient};
pub use execution::ExecutionClient;
