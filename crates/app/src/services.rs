use std::sync::Arc;

use cinetn_cache::{SqliteStore, TieredCache};
use cinetn_content::service::ContentService;

use crate::library::Library;

/// Everything the page controllers need, constructed once by the entry
/// point and passed down explicitly.
pub struct App {
    pub content: Arc<dyn ContentService>,
    pub cache: TieredCache<SqliteStore>,
    pub library: Library<SqliteStore>,
}
