//! Command implementations for devsite CLI

pub mod completions;
pub mod run;
pub mod version;
