//! Movie action entity (likes and hates)

use crate::errors::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of action a viewer records against a movie.
///
/// Closed set at the API boundary; converted to its string form only at the
/// persistence edge. Unknown values are rejected instead of persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Like,
    Hate,
}

impl ActionKind {
    /// The stored string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Like => "like",
            ActionKind::Hate => "hate",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(ActionKind::Like),
            "hate" => Ok(ActionKind::Hate),
            other => Err(AppError::InvalidActionKind {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub movie_id: i32,

    /// The acting viewer, not the movie's author
    pub user_id: i32,

    #[sea_orm(column_type = "Text")]
    pub action: String,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the action as the closed variant
    pub fn kind(&self) -> Result<ActionKind, AppError> {
        self.action.parse()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::Id"
    )]
    Movie,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!("like".parse::<ActionKind>().unwrap(), ActionKind::Like);
        assert_eq!("hate".parse::<ActionKind>().unwrap(), ActionKind::Hate);
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let err = "love".parse::<ActionKind>().unwrap_err();
        assert!(matches!(err, AppError::InvalidActionKind { ref value } if value == "love"));
    }

    #[test]
    fn test_round_trip_str() {
        for kind in [ActionKind::Like, ActionKind::Hate] {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
    }
}
