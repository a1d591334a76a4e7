//! Transformer plugin infrastructure shared by perftransform and its built-in
//! transform kinds.

pub mod data;
pub mod error;
pub mod traits;

pub use data::{merge_by_subtest, DataPoint, FileData, SourceFile, StandardEntry};
pub use error::{TransformError, TransformResult};
pub use traits::{Transform, TransformFactory};
