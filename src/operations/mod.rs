//! High-level operations
//!
//! Each operation coordinates the domain types, the step executors and the
//! UI layer for one command.

pub mod provision;
