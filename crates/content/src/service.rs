use crate::{ContentError, ContentFilters, ContentItem, Episode, EpisodeContext, Season};

/// The hosted catalogue backend, as the pages consume it.
#[async_trait::async_trait]
pub trait ContentService: Send + Sync {
    /// Fetch all catalogue items, newest first, optionally narrowed.
    async fn all_content(
        &self,
        filters: &ContentFilters,
    ) -> Result<Vec<ContentItem>, ContentError>;

    /// Fetch a single item; `None` when it does not exist.
    async fn content_by_id(&self, id: &str) -> Result<Option<ContentItem>, ContentError>;

    /// Seasons of a series, ordered by season number.
    async fn seasons(&self, series_id: &str) -> Result<Vec<Season>, ContentError>;

    /// Episodes of a season, ordered by episode number.
    async fn episodes(&self, season_id: &str) -> Result<Vec<Episode>, ContentError>;

    /// An episode with its season and series attached.
    async fn episode_context(
        &self,
        episode_id: &str,
    ) -> Result<Option<EpisodeContext>, ContentError>;

    /// Case-insensitive title substring search.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContentItem>, ContentError>;

    /// Bump a title's view counter. Fire-and-forget; callers ignore failures.
    async fn increment_views(&self, content_id: &str) -> Result<(), ContentError>;
}
