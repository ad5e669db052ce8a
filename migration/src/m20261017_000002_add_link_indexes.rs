//! 为关联表添加反向索引
//!
//! 主键 (game_id, xxx_id) 已覆盖按游戏查询；
//! 按类型 / 平台反查游戏需要单独的 genre_id / platform_id 索引。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_game_genres_genre_id")
                    .table(GameGenres::Table)
                    .col(GameGenres::GenreId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_game_platforms_platform_id")
                    .table(GamePlatforms::Table)
                    .col(GamePlatforms::PlatformId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_game_platforms_platform_id")
                    .table(GamePlatforms::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_game_genres_genre_id")
                    .table(GameGenres::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum GameGenres {
    Table,
    GenreId,
}

#[derive(DeriveIden)]
enum GamePlatforms {
    Table,
    PlatformId,
}
