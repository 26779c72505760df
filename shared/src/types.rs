pub use crate::error::PipelineError;

pub type Result<T> = std::result::Result<T, PipelineError>;
