use serde::{Deserialize, Serialize};

/// Catalogue entry kind stored in the content table's `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Anime,
    Serie,
    Film,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Serie => "serie",
            Self::Film => "film",
        }
    }

    /// Parse a raw kind tag from the backend. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "anime" => Some(Self::Anime),
            "serie" => Some(Self::Serie),
            "film" => Some(Self::Film),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache freshness class. Selects which TTL applies to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    #[default]
    Catalogue,
    Details,
    Genres,
    Search,
}

impl CacheCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Catalogue => "catalogue",
            Self::Details => "details",
            Self::Genres => "genres",
            Self::Search => "search",
        }
    }

    /// Parse a category tag. Unrecognized tags fall back to `Catalogue`,
    /// which also carries the default TTL.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "catalogue" => Self::Catalogue,
            "details" => Self::Details,
            "genres" => Self::Genres,
            "search" => Self::Search,
            _ => Self::Catalogue,
        }
    }
}

impl std::fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
