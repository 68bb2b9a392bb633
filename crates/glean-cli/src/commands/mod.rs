pub mod analysis;
pub mod analyze;
pub mod article;
pub mod dispatch;
pub mod schema;
pub mod shared;
