#![allow(dead_code)]

use game_catalog::{DatabaseConfig, GameCatalog};
use sea_orm::{ConnectionTrait, DbBackend, Statement};

/// 空列表占位，避免泛型参数无法推断
pub const NONE: [&str; 0] = [];

/// 内存数据库，已执行迁移
pub async fn open_memory() -> GameCatalog {
    let catalog = GameCatalog::connect(&DatabaseConfig::in_memory())
        .await
        .unwrap();
    catalog.init().await.unwrap();
    catalog
}

pub async fn count_rows(catalog: &GameCatalog, table: &str) -> i64 {
    let row = catalog
        .connection()
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            format!(r#"SELECT COUNT(*) AS n FROM "{}""#, table),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

pub async fn execute(catalog: &GameCatalog, sql: &str) -> u64 {
    catalog
        .connection()
        .execute(Statement::from_string(DbBackend::Sqlite, sql))
        .await
        .unwrap()
        .rows_affected()
}
