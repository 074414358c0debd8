//! Shared data model types used by both native and web runtimes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Base URL for poster thumbnails; the stored `poster_path` is appended verbatim.
pub const POSTER_URL_PREFIX: &str = "https://image.tmdb.org/t/p/w200";

/// Maximum number of entries the Top 5 list may hold.
pub const TOP_FIVE_CAPACITY: usize = 5;

/// A movie record as persisted in either list.
///
/// The title is the identity key: two records with the same title are treated
/// as the same movie for removal. Catalog fields we do not interpret (ids,
/// release dates, ...) are carried in `extra` so rewriting a list keeps them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Movie {
    pub fn new(
        title: impl Into<String>,
        overview: impl Into<String>,
        poster_path: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            overview: overview.into(),
            poster_path,
            extra: Map::new(),
        }
    }

    /// Full poster URL, or `None` when the record has no (or an empty) poster path.
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{POSTER_URL_PREFIX}{path}"))
    }

    /// Title equality. Distinct movies sharing a title collide here; a catalog
    /// id from `extra` would be a stronger key.
    pub fn same_title(&self, other: &Movie) -> bool {
        self.title == other.title
    }
}

/// Trims a user-entered poster path and makes it absolute. Empty input means
/// no poster.
pub fn normalize_poster_path(raw: &str) -> Option<String> {
    let path = raw.trim();
    if path.is_empty() {
        None
    } else if path.starts_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("/{path}"))
    }
}

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Watchlist,
    TopFive,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [ListKind::Watchlist, ListKind::TopFive];

    /// Key under which the list is stored.
    pub fn storage_key(self) -> &'static str {
        match self {
            ListKind::Watchlist => "watchlist",
            ListKind::TopFive => "topFive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListKind::Watchlist => "Watchlist",
            ListKind::TopFive => "Top 5",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_poster_url_uses_fixed_template() {
        let movie = Movie::new("Dune", "Spice", Some("/d.jpg".to_string()));
        assert_eq!(
            movie.poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w200/d.jpg")
        );
    }

    #[test]
    fn test_poster_url_skips_missing_and_empty_paths() {
        assert_eq!(Movie::new("A", "", None).poster_url(), None);
        assert_eq!(Movie::new("A", "", Some(String::new())).poster_url(), None);
    }

    #[test]
    fn test_normalize_poster_path() {
        assert_eq!(normalize_poster_path(" d.jpg ").as_deref(), Some("/d.jpg"));
        assert_eq!(normalize_poster_path("/d.jpg").as_deref(), Some("/d.jpg"));
        assert_eq!(normalize_poster_path("   "), None);
    }

    #[test]
    fn test_serializes_null_poster_path() {
        let value = serde_json::to_value(Movie::new("Alien", "In space", None)).unwrap();
        assert_eq!(
            value,
            json!({"title": "Alien", "overview": "In space", "poster_path": null})
        );
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "id": 438631,
            "title": "Dune",
            "overview": "Spice",
            "poster_path": "/d.jpg",
            "release_date": "2021-09-15"
        });
        let movie: Movie = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(movie.extra.get("id"), Some(&json!(438631)));
        assert_eq!(serde_json::to_value(&movie).unwrap(), raw);
    }

    #[test]
    fn test_missing_fields_default() {
        let movie: Movie = serde_json::from_value(json!({"title": "Heat"})).unwrap();
        assert_eq!(movie.overview, "");
        assert_eq!(movie.poster_path, None);
    }

    #[test]
    fn test_null_text_fields_read_as_empty() {
        let movie: Movie =
            serde_json::from_value(json!({"title": "Heat", "overview": null})).unwrap();
        assert_eq!(movie.overview, "");
        assert!(movie.extra.is_empty());
    }

    #[test]
    fn test_list_kind_keys() {
        assert_eq!(ListKind::Watchlist.storage_key(), "watchlist");
        assert_eq!(ListKind::TopFive.storage_key(), "topFive");
    }
}
