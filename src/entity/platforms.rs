//! 平台词表实体
//!
//! 名称唯一，首次被游戏引用时创建。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platforms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text", unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_platforms::Entity")]
    GamePlatforms,
}

impl Related<super::game_platforms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GamePlatforms.def()
    }
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_platforms::Relation::Games.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_platforms::Relation::Platforms.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
