//! The `run` workflow: resolve arguments, check dependencies, drive the
//! step executors through the pipeline state machine.

pub mod pipeline;
pub mod preflight;
pub mod resolve;

pub use pipeline::{PipelineReport, PipelineState, ProvisioningPipeline, StepSet};
pub use preflight::DependencyValidator;
pub use resolve::{RawOptions, resolve};
