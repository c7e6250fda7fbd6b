//! Query orchestration layer.
//!
//! Everything between the raw gateway outcome and the analysis package the
//! calling agent receives:
//! - `orchestrator`: the process() pipeline
//! - `normalize`: date/time canonicalization
//! - `prompt`: analysis prompt and model steering text
//! - `naming`: internal table identifier to site name translation

pub mod naming;
pub mod normalize;
pub mod orchestrator;
pub mod prompt;

pub use orchestrator::{Orchestrator, PRECONDITION_ERROR};
