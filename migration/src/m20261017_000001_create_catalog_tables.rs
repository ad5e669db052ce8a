//! 创建游戏目录基础表
//!
//! games、genres、platforms 以及两张关联表 game_genres、game_platforms。
//! 关联表的外键均为 ON DELETE CASCADE。

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // 1. 游戏主表
        execute_sql(
            conn,
            r#"CREATE TABLE IF NOT EXISTS "games" (
                "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                "title" TEXT NOT NULL,
                "description" TEXT,
                "release_date" DATE,
                "developer" TEXT,
                "publisher" TEXT,
                "rating" REAL,
                "created_at" TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )"#,
        )
        .await?;

        // 2. 类型与平台词表（名称唯一）
        execute_sql(
            conn,
            r#"CREATE TABLE IF NOT EXISTS "genres" (
                "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                "name" TEXT NOT NULL UNIQUE
            )"#,
        )
        .await?;

        execute_sql(
            conn,
            r#"CREATE TABLE IF NOT EXISTS "platforms" (
                "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                "name" TEXT NOT NULL UNIQUE
            )"#,
        )
        .await?;

        // 3. 多对多关联表
        execute_sql(
            conn,
            r#"CREATE TABLE IF NOT EXISTS "game_genres" (
                "game_id" INTEGER NOT NULL,
                "genre_id" INTEGER NOT NULL,
                PRIMARY KEY("game_id", "genre_id"),
                FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE,
                FOREIGN KEY("genre_id") REFERENCES "genres"("id") ON DELETE CASCADE
            )"#,
        )
        .await?;

        execute_sql(
            conn,
            r#"CREATE TABLE IF NOT EXISTS "game_platforms" (
                "game_id" INTEGER NOT NULL,
                "platform_id" INTEGER NOT NULL,
                PRIMARY KEY("game_id", "platform_id"),
                FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE,
                FOREIGN KEY("platform_id") REFERENCES "platforms"("id") ON DELETE CASCADE
            )"#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // 先删关联表，再删被引用的表
        for table in ["game_platforms", "game_genres", "platforms", "genres", "games"] {
            execute_sql(conn, &format!(r#"DROP TABLE IF EXISTS "{}""#, table)).await?;
        }

        Ok(())
    }
}

async fn execute_sql<C>(conn: &C, sql: &str) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .await?;
    Ok(())
}
