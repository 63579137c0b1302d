//! Job source configuration and option handling
//!
//! A job is the script a build step runs: where its text comes from
//! ([`JobSource`]), how sources are registered and constructed
//! ([`JobSourceRegistry`]), and which extra interpreter options the step
//! configuration contributes ([`PropertyOptions`]).

mod errors;
mod options;
mod registry;
mod source;

pub use errors::JobError;
pub use options::{parse_properties, PropertyOptions, DEFAULT_OPTS_VAR};
pub use registry::{JobSourceRegistry, SourceFactory};
pub use source::{FileJobSource, JobSource, StringJobSource};
