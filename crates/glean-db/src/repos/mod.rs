//! Repository modules implementing the article and analysis stores.
//!
//! Each module adds methods to `GleanService` via `impl GleanService` blocks.

pub mod analysis;
pub mod article;
