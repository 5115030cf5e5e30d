// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Runtime identifiers and normalized project file names.

mod project_file;
mod runtime_id;

pub use project_file::ProjectFileName;
pub use runtime_id::{RuntimeIdError, RuntimeIdentifier};
