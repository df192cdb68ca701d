pub mod errors;
pub mod pack;

pub use errors::{Diagnostic, PackError, PackResult, PackStage};
pub use pack::{
    MetadataOrigin, PackMetadata, PackOrigin, PackReport, PackSource, PackStatus, RunSummary,
};
