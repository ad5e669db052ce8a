//! 游戏数据实体
//!
//! games 表是核心表，类型与平台通过 game_genres / game_platforms 关联。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub release_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub developer: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub publisher: Option<String>,
    pub rating: Option<f64>,

    /// 由数据库默认值 CURRENT_TIMESTAMP 填充
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_genres::Entity")]
    GameGenres,
    #[sea_orm(has_many = "super::game_platforms::Entity")]
    GamePlatforms,
}

impl Related<super::game_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameGenres.def()
    }
}

impl Related<super::game_platforms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GamePlatforms.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_genres::Relation::Genres.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_genres::Relation::Games.def().rev())
    }
}

impl Related<super::platforms::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_platforms::Relation::Platforms.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_platforms::Relation::Games.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
