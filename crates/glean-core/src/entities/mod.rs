//! Entity structs for glean domain objects.
//!
//! `Article` and `AnalysisRecord` map to the `articles` and `article_analyses`
//! tables. All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for
//! JSON output and schema validation.

mod analysis;
mod article;

pub use analysis::{AnalysisFacets, AnalysisRecord, AnalysisTask};
pub use article::{Article, NewArticle};
