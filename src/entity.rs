//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义。

pub mod prelude;

// === 主表 ===
pub mod games;

// === 词表（名称唯一，按需创建）===
pub mod genres;
pub mod platforms;

// === 多对多关联表 ===
pub mod game_genres;
pub mod game_platforms;
