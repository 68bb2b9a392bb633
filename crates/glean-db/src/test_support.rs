//! Shared test utilities for glean-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use glean_core::entities::{Article, NewArticle};

    use crate::service::GleanService;

    /// Create an in-memory service.
    pub async fn test_service() -> GleanService {
        GleanService::new_local(":memory:").await.unwrap()
    }

    pub fn new_article(title: &str, author: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            author: author.to_string(),
            content: format!("{title}\nby {author}\n\nbody"),
            source_path: format!("/tmp/{title}.txt"),
            file_size: 42,
        }
    }

    /// Insert an article and return it.
    pub async fn seed_article(svc: &GleanService, title: &str) -> Article {
        svc.create_article(&new_article(title, "Jane Doe")).await.unwrap()
    }
}
