//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations. Reads execute
//! against the replica connection when one is configured, writes against the
//! primary. Datastore failures propagate to the caller untouched; nothing
//! here retries or substitutes partial results.

use crate::db::models::*;
use crate::db::movie_query::{MovieListQuery, MovieRecord, SortKey};
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Set, SqlErr, Statement,
};

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// Create a new user with an already-hashed password
    pub async fn create_user(
        &self,
        username: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Result<User> {
        let user = UserActiveModel {
            username: Set(username.clone()),
            password_hash: Set(password_hash),
            first_name: Set(first_name),
            last_name: Set(last_name),
            ..Default::default()
        };

        user.insert(self.write_conn()).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::UsernameTaken { username }
                }
                _ => e.into(),
            }
        })
    }

    /// Find a user by username, for credential verification
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Movie Operations
    // ========================================================================

    /// Create a new movie owned by `author_id`.
    ///
    /// Identity and creation timestamp are assigned by the datastore.
    pub async fn create_movie(
        &self,
        author_id: i32,
        title: String,
        description: String,
    ) -> Result<Movie> {
        let movie = MovieActiveModel {
            user_id: Set(author_id),
            title: Set(title),
            description: Set(description),
            ..Default::default()
        };

        movie.insert(self.write_conn()).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::UserNotFound {
                    id: author_id.to_string(),
                },
                _ => e.into(),
            }
        })
    }

    /// Public all-movies listing, no viewer context
    pub async fn list_movies_public(&self, sort: SortKey) -> Result<Vec<MovieRecord>> {
        self.fetch_movie_list(MovieListQuery::compose(None, None, sort)).await
    }

    /// All-movies listing with viewer-relative columns
    pub async fn list_movies(&self, viewer_id: i32, sort: SortKey) -> Result<Vec<MovieRecord>> {
        self.fetch_movie_list(MovieListQuery::compose(None, Some(viewer_id), sort)).await
    }

    /// Public listing of one author's movies
    pub async fn list_user_movies_public(
        &self,
        author_id: i32,
        sort: SortKey,
    ) -> Result<Vec<MovieRecord>> {
        self.fetch_movie_list(MovieListQuery::compose(Some(author_id), None, sort)).await
    }

    /// Listing of one author's movies with viewer-relative columns
    pub async fn list_user_movies(
        &self,
        author_id: i32,
        viewer_id: i32,
        sort: SortKey,
    ) -> Result<Vec<MovieRecord>> {
        self.fetch_movie_list(MovieListQuery::compose(Some(author_id), Some(viewer_id), sort))
            .await
    }

    /// Execute a composed listing query in a single round-trip
    async fn fetch_movie_list(&self, query: MovieListQuery) -> Result<Vec<MovieRecord>> {
        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, &query.sql, query.values.clone());

        let rows = self.read_conn().query_all(stmt).await?;

        rows.iter().map(|row| query.decode_row(row)).collect()
    }

    // ========================================================================
    // Movie Action Operations
    // ========================================================================

    /// Record a viewer's like or hate on a movie.
    ///
    /// Idempotent: the actions table enforces at most one row per
    /// (movie, user, kind), and a duplicate insert is a no-op.
    pub async fn add_movie_action(
        &self,
        movie_id: i32,
        user_id: i32,
        kind: ActionKind,
    ) -> Result<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO movie_actions (movie_id, user_id, action)
            VALUES ($1, $2, $3)
            ON CONFLICT (movie_id, user_id, action) DO NOTHING
            "#,
            vec![movie_id.into(), user_id.into(), kind.as_str().into()],
        );

        self.write_conn().execute(stmt).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::MovieNotFound {
                    id: movie_id.to_string(),
                },
                _ => e.into(),
            }
        })?;

        Ok(())
    }

    /// Remove a viewer's like or hate from a movie.
    ///
    /// Removing an action that was never recorded is a no-op success.
    /// Returns the number of rows deleted.
    pub async fn remove_movie_action(
        &self,
        movie_id: i32,
        user_id: i32,
        kind: ActionKind,
    ) -> Result<u64> {
        let result = MovieActionEntity::delete_many()
            .filter(MovieActionColumn::MovieId.eq(movie_id))
            .filter(MovieActionColumn::UserId.eq(user_id))
            .filter(MovieActionColumn::Action.eq(kind.as_str()))
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected)
    }
}
