mod analysis;
mod article;

pub use analysis::AnalysisCommands;
pub use article::ArticleCommands;
