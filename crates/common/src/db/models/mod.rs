//! SeaORM entity models
//!
//! Database entities for ReelShare

mod movie;
mod movie_action;
mod user;

pub use movie::{
    ActiveModel as MovieActiveModel,
    Column as MovieColumn,
    Entity as MovieEntity,
    Model as Movie,
};

pub use movie_action::{
    ActionKind,
    ActiveModel as MovieActionActiveModel,
    Column as MovieActionColumn,
    Entity as MovieActionEntity,
    Model as MovieAction,
};

pub use user::{
    ActiveModel as UserActiveModel,
    Column as UserColumn,
    Entity as UserEntity,
    Model as User,
};
