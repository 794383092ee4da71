//! Movie listing query composition
//!
//! Builds the four movie-retrieval variants (public/authenticated, all
//! movies/one author) as a single parameterized SELECT. Like and hate
//! counts, the viewer-relative flags, and the author display name are all
//! correlated subqueries, so every derived column reflects the same logical
//! read. Sorting substitutes the ORDER BY column; ties are stabilized with
//! a secondary descending key on movie id.

use crate::errors::Result;
use chrono::{DateTime, Utc};
use sea_orm::{QueryResult, Value};
use serde::{Deserialize, Serialize};

/// Client-supplied sort key for movie listings.
///
/// The mapping is exact and case-sensitive; anything that is not `likes` or
/// `hates` (including the empty string) falls back to creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Likes,
    Hates,
}

impl SortKey {
    /// Map the raw query parameter to a sort key
    pub fn from_param(param: &str) -> Self {
        match param {
            "likes" => SortKey::Likes,
            "hates" => SortKey::Hates,
            // "date" and every unknown value order by creation date
            _ => SortKey::Date,
        }
    }

    /// The ORDER BY column this key selects
    fn order_column(self) -> &'static str {
        match self {
            SortKey::Date => "created_at",
            SortKey::Likes => "likes",
            SortKey::Hates => "hates",
        }
    }
}

/// One raw row of a movie listing, before viewer-relative shaping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub hates: i64,
    /// True when the viewer has a like action on this movie; always false
    /// on public listings where no viewer columns are computed
    pub viewer_liked: bool,
    pub viewer_hated: bool,
    /// Author first and last name joined with a single space
    pub posted_by: String,
}

/// A composed listing query ready to execute against the read connection
#[derive(Debug, Clone)]
pub struct MovieListQuery {
    pub sql: String,
    pub values: Vec<Value>,
    has_viewer: bool,
}

impl MovieListQuery {
    /// Compose the listing query for the given access shape.
    ///
    /// `author_id` scopes the listing to one author's movies; `viewer_id`
    /// adds the viewer-relative `viewer_liked` / `viewer_hated` columns.
    /// Both absent yields the public all-movies variant.
    pub fn compose(author_id: Option<i32>, viewer_id: Option<i32>, sort: SortKey) -> Self {
        let mut values: Vec<Value> = Vec::new();

        let viewer_columns = match viewer_id {
            Some(viewer) => {
                values.push(viewer.into());
                values.push(viewer.into());
                "\n    (SELECT COUNT(*) FROM movie_actions a WHERE a.movie_id = m.id AND a.action = 'like' AND a.user_id = $1) AS viewer_liked,\
                 \n    (SELECT COUNT(*) FROM movie_actions a WHERE a.movie_id = m.id AND a.action = 'hate' AND a.user_id = $2) AS viewer_hated,"
            }
            None => "",
        };

        let author_filter = match author_id {
            Some(author) => {
                values.push(author.into());
                format!("WHERE m.user_id = ${}\n", values.len())
            }
            None => String::new(),
        };

        let sql = format!(
            "SELECT\n    \
                m.id,\n    \
                m.title,\n    \
                m.description,\n    \
                m.user_id,\n    \
                m.created_at,\n    \
                (SELECT COUNT(*) FROM movie_actions WHERE movie_id = m.id AND action = 'like') AS likes,\n    \
                (SELECT COUNT(*) FROM movie_actions WHERE movie_id = m.id AND action = 'hate') AS hates,{viewer_columns}\n    \
                (SELECT CONCAT_WS(' ', first_name, last_name) FROM users WHERE id = m.user_id) AS posted_by\n\
             FROM movies AS m\n\
             {author_filter}\
             ORDER BY {order} DESC, m.id DESC",
            viewer_columns = viewer_columns,
            author_filter = author_filter,
            order = sort.order_column(),
        );

        Self {
            sql,
            values,
            has_viewer: viewer_id.is_some(),
        }
    }

    /// Whether the composed query carries viewer-relative columns
    pub fn has_viewer(&self) -> bool {
        self.has_viewer
    }

    /// Decode one result row into a [`MovieRecord`].
    ///
    /// Column order follows the SELECT above; the viewer columns shift
    /// `posted_by` when present.
    pub fn decode_row(&self, row: &QueryResult) -> Result<MovieRecord> {
        let id = row.try_get_by_index::<i32>(0)?;
        let title = row.try_get_by_index::<String>(1)?;
        let description = row.try_get_by_index::<String>(2)?;
        let user_id = row.try_get_by_index::<i32>(3)?;
        let created_at = row.try_get_by_index::<DateTime<Utc>>(4)?;
        let likes = row.try_get_by_index::<i64>(5)?;
        let hates = row.try_get_by_index::<i64>(6)?;

        let (viewer_liked, viewer_hated, posted_by) = if self.has_viewer {
            let liked = row.try_get_by_index::<i64>(7)? > 0;
            let hated = row.try_get_by_index::<i64>(8)? > 0;
            let posted_by = row.try_get_by_index::<Option<String>>(9)?;
            (liked, hated, posted_by)
        } else {
            let posted_by = row.try_get_by_index::<Option<String>>(7)?;
            (false, false, posted_by)
        };

        Ok(MovieRecord {
            id,
            title,
            description,
            user_id,
            created_at,
            likes,
            hates,
            viewer_liked,
            viewer_hated,
            posted_by: posted_by.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_mapping_is_exact() {
        assert_eq!(SortKey::from_param("date"), SortKey::Date);
        assert_eq!(SortKey::from_param("likes"), SortKey::Likes);
        assert_eq!(SortKey::from_param("hates"), SortKey::Hates);
    }

    #[test]
    fn test_unknown_sort_keys_fall_back_to_date() {
        for param in ["", "Likes", "LIKES", " likes", "rating", "created_at"] {
            assert_eq!(SortKey::from_param(param), SortKey::Date, "param {:?}", param);
        }
    }

    #[test]
    fn test_public_all_listing() {
        let query = MovieListQuery::compose(None, None, SortKey::Date);

        assert!(!query.has_viewer());
        assert!(query.values.is_empty());
        assert!(!query.sql.contains("viewer_liked"));
        assert!(!query.sql.contains("WHERE m.user_id"));
        assert!(query.sql.ends_with("ORDER BY created_at DESC, m.id DESC"));
    }

    #[test]
    fn test_authenticated_all_listing_binds_viewer_twice() {
        let query = MovieListQuery::compose(None, Some(7), SortKey::Likes);

        assert!(query.has_viewer());
        assert_eq!(query.values.len(), 2);
        assert!(query.sql.contains("AS viewer_liked"));
        assert!(query.sql.contains("AS viewer_hated"));
        assert!(query.sql.contains("a.user_id = $1"));
        assert!(query.sql.contains("a.user_id = $2"));
        assert!(query.sql.ends_with("ORDER BY likes DESC, m.id DESC"));
    }

    #[test]
    fn test_public_per_user_listing_binds_author_first() {
        let query = MovieListQuery::compose(Some(2), None, SortKey::Hates);

        assert_eq!(query.values.len(), 1);
        assert!(!query.sql.contains("viewer_liked"));
        assert!(query.sql.contains("WHERE m.user_id = $1"));
        assert!(query.sql.ends_with("ORDER BY hates DESC, m.id DESC"));
    }

    #[test]
    fn test_authenticated_per_user_listing_binds_author_after_viewer() {
        let query = MovieListQuery::compose(Some(2), Some(7), SortKey::Date);

        assert_eq!(query.values.len(), 3);
        assert!(query.sql.contains("a.user_id = $1"));
        assert!(query.sql.contains("a.user_id = $2"));
        assert!(query.sql.contains("WHERE m.user_id = $3"));
    }

    #[test]
    fn test_counts_and_display_name_are_single_round_trip() {
        // Every derived column must live in the one SELECT, not separate calls
        let query = MovieListQuery::compose(None, Some(1), SortKey::Date);

        assert!(query.sql.contains("action = 'like') AS likes"));
        assert!(query.sql.contains("action = 'hate') AS hates"));
        assert!(query.sql.contains("CONCAT_WS(' ', first_name, last_name)"));
        assert_eq!(query.sql.matches("SELECT COUNT(*)").count(), 4);
    }
}
