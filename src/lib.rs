//! 游戏目录数据访问层
//!
//! 基于 SeaORM + SQLite 管理游戏、类型、平台以及它们之间的多对多关联。
//!
//! ```no_run
//! use game_catalog::{DatabaseConfig, GameCatalog, NewGame};
//!
//! # async fn demo() -> game_catalog::Result<()> {
//! let catalog = GameCatalog::connect(&DatabaseConfig::resolve()?).await?;
//! catalog.init().await?;
//!
//! let id = catalog
//!     .add_game(NewGame::new("Celeste"), &["Platformer"], &["Switch", "PC"])
//!     .await?;
//! let game = catalog.get_game_by_id(id).await?;
//! # let _ = game;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod utils;

pub use config::DatabaseConfig;
pub use database::GameCatalog;
pub use database::dto::{
    GameDetails, GameUpdate, NewGame, PruneResult, ReferenceKind, ReferenceWithCount,
};
pub use error::{CatalogError, Result};
