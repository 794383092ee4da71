//! Movie listing, creation, and action handlers
//!
//! Listing handlers come in four shapes: all movies or one author's movies,
//! each with or without an authenticated viewer. The viewer-relative fields
//! (`user_liked`, `user_hated`, `is_same_user`) are only meaningful on the
//! authenticated variants; public listings return them as false.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::AppState;
use reelshare_common::{
    auth::AuthUser,
    db::models::ActionKind,
    db::{MovieRecord, Repository, SortKey},
    errors::{AppError, Result},
    metrics, timeago,
};

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Client-supplied sort key; unknown values fall back to date ordering
    #[serde(default)]
    pub sort: String,
}

/// One movie in a listing response
#[derive(Debug, Serialize)]
pub struct MovieListItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub user_id: i32,
    pub posted_by: String,
    pub likes: i64,
    pub hates: i64,
    pub user_liked: bool,
    pub user_hated: bool,
    pub is_same_user: bool,
    pub time_ago: String,
}

/// Listing response envelope
#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<MovieListItem>,
}

/// Shape one raw record into its outward representation.
///
/// Pure function of (record, viewer, now): `is_same_user` compares the
/// movie's author against the viewer, `time_ago` renders the stored creation
/// timestamp against the supplied clock, everything else passes through.
fn shape(record: MovieRecord, viewer: Option<i32>, now: DateTime<Utc>) -> MovieListItem {
    MovieListItem {
        id: record.id,
        title: record.title,
        description: record.description,
        user_id: record.user_id,
        posted_by: record.posted_by,
        likes: record.likes,
        hates: record.hates,
        user_liked: record.viewer_liked,
        user_hated: record.viewer_hated,
        is_same_user: viewer.is_some_and(|viewer_id| viewer_id == record.user_id),
        time_ago: timeago::format(record.created_at, now),
    }
}

fn shape_all(records: Vec<MovieRecord>, viewer: Option<i32>) -> MovieListResponse {
    let now = Utc::now();
    MovieListResponse {
        movies: records
            .into_iter()
            .map(|record| shape(record, viewer, now))
            .collect(),
    }
}

/// List all movies without a viewer context
pub async fn list_movies_public(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<MovieListResponse>> {
    let repo = Repository::new(state.db.clone());
    let start = Instant::now();

    let records = repo.list_movies_public(SortKey::from_param(&params.sort)).await?;
    metrics::record_movie_listing(start.elapsed().as_secs_f64(), "all", false);

    Ok(Json(shape_all(records, None)))
}

/// List all movies with viewer-relative fields
pub async fn list_movies(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<MovieListResponse>> {
    let repo = Repository::new(state.db.clone());
    let start = Instant::now();

    let records = repo
        .list_movies(auth.user_id, SortKey::from_param(&params.sort))
        .await?;
    metrics::record_movie_listing(start.elapsed().as_secs_f64(), "all", true);

    Ok(Json(shape_all(records, Some(auth.user_id))))
}

/// List one author's movies without a viewer context
pub async fn list_user_movies_public(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(params): Query<ListParams>,
) -> Result<Json<MovieListResponse>> {
    let repo = Repository::new(state.db.clone());
    let start = Instant::now();

    let records = repo
        .list_user_movies_public(user_id, SortKey::from_param(&params.sort))
        .await?;
    metrics::record_movie_listing(start.elapsed().as_secs_f64(), "user", false);

    Ok(Json(shape_all(records, None)))
}

/// List one author's movies with viewer-relative fields
pub async fn list_user_movies(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i32>,
    Query(params): Query<ListParams>,
) -> Result<Json<MovieListResponse>> {
    let repo = Repository::new(state.db.clone());
    let start = Instant::now();

    let records = repo
        .list_user_movies(user_id, auth.user_id, SortKey::from_param(&params.sort))
        .await?;
    metrics::record_movie_listing(start.elapsed().as_secs_f64(), "user", true);

    Ok(Json(shape_all(records, Some(auth.user_id))))
}

/// New movie payload
#[derive(Debug, Deserialize, Validate)]
pub struct NewMovieRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,
}

/// Create a movie owned by the authenticated viewer
pub async fn create_movie(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<NewMovieRequest>,
) -> Result<StatusCode> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let movie = repo
        .create_movie(auth.user_id, request.title, request.description)
        .await?;

    metrics::record_movie_created();

    tracing::info!(movie_id = movie.id, user_id = auth.user_id, "Movie created");

    Ok(StatusCode::CREATED)
}

/// Record the viewer's like or hate on a movie
pub async fn add_movie_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((movie_id, action)): Path<(i32, String)>,
) -> Result<StatusCode> {
    let kind: ActionKind = action.parse()?;

    let repo = Repository::new(state.db.clone());
    repo.add_movie_action(movie_id, auth.user_id, kind).await?;

    metrics::record_movie_action(kind.as_str(), "add");

    tracing::debug!(movie_id, user_id = auth.user_id, kind = %kind, "Action recorded");

    Ok(StatusCode::OK)
}

/// Remove the viewer's like or hate from a movie
pub async fn remove_movie_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((movie_id, action)): Path<(i32, String)>,
) -> Result<StatusCode> {
    let kind: ActionKind = action.parse()?;

    let repo = Repository::new(state.db.clone());
    repo.remove_movie_action(movie_id, auth.user_id, kind).await?;

    metrics::record_movie_action(kind.as_str(), "remove");

    tracing::debug!(movie_id, user_id = auth.user_id, kind = %kind, "Action removed");

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(author_id: i32) -> MovieRecord {
        MovieRecord {
            id: 1,
            title: "Paris, Texas".to_string(),
            description: "A drifter reunites with his brother".to_string(),
            user_id: author_id,
            created_at: Utc.with_ymd_and_hms(2024, 5, 10, 10, 59, 0).unwrap(),
            likes: 4,
            hates: 1,
            viewer_liked: true,
            viewer_hated: false,
            posted_by: "Jane Doe".to_string(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_shape_passes_fields_through() {
        let item = shape(record(2), Some(7), fixed_now());

        assert_eq!(item.id, 1);
        assert_eq!(item.user_id, 2);
        assert_eq!(item.posted_by, "Jane Doe");
        assert_eq!(item.likes, 4);
        assert_eq!(item.hates, 1);
        assert!(item.user_liked);
        assert!(!item.user_hated);
    }

    #[test]
    fn test_is_same_user_requires_matching_viewer() {
        assert!(shape(record(7), Some(7), fixed_now()).is_same_user);
        assert!(!shape(record(2), Some(7), fixed_now()).is_same_user);
    }

    #[test]
    fn test_is_same_user_false_without_viewer() {
        assert!(!shape(record(7), None, fixed_now()).is_same_user);
    }

    #[test]
    fn test_time_ago_uses_injected_clock() {
        // Created 61 minutes before the fixed clock
        let item = shape(record(2), None, fixed_now());
        assert_eq!(item.time_ago, "about an hour ago");
    }
}
