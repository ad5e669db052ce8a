//! 游戏数据仓库
//!
//! games 表的增删改查。类型与平台关联交给 `ReferenceRepository`，
//! 涉及多条语句的写操作都在同一个事务内完成。

use std::collections::HashMap;

use sea_orm::*;

use crate::database::dto::{
    GameDetails, GameUpdate, NewGame, ReferenceKind, validate_rating, validate_title,
};
use crate::database::repository::reference_repository::ReferenceRepository;
use crate::entity::games;
use crate::entity::prelude::*;
use crate::error::Result;

/// 游戏数据仓库
pub struct GamesRepository;

impl GamesRepository {
    // ==================== 游戏 CRUD 操作 ====================

    /// 插入游戏及其类型、平台关联
    ///
    /// 标题校验在任何写操作之前完成；插入游戏行与两类关联处于同一事务，
    /// 任意一步失败都会整体回滚。
    pub async fn insert<S, P>(
        db: &DatabaseConnection,
        game: NewGame,
        genres: &[S],
        platforms: &[P],
    ) -> Result<i32>
    where
        S: AsRef<str>,
        P: AsRef<str>,
    {
        game.validate()?;

        let txn = db.begin().await?;

        let game_active = games::ActiveModel {
            id: NotSet,
            title: Set(game.title),
            description: Set(game.description),
            release_date: Set(game.release_date),
            developer: Set(game.developer),
            publisher: Set(game.publisher),
            rating: Set(game.rating),
            created_at: NotSet,
        };
        let game_id = game_active.insert(&txn).await?.id;

        ReferenceRepository::attach(&txn, game_id, ReferenceKind::Genre, genres).await?;
        ReferenceRepository::attach(&txn, game_id, ReferenceKind::Platform, platforms).await?;

        txn.commit().await?;
        log::info!("新增游戏 {}", game_id);
        Ok(game_id)
    }

    /// 更新游戏数据
    ///
    /// 支持部分更新，未提供的字段保持不变；提供 `genres` / `platforms` 时整体替换对应关联。
    /// 游戏不存在时返回 `None`。
    pub async fn update(
        db: &DatabaseConnection,
        game_id: i32,
        updates: GameUpdate,
    ) -> Result<Option<GameDetails>> {
        if let Some(title) = &updates.title {
            validate_title(title)?;
        }
        if let Some(rating) = updates.rating {
            validate_rating(rating)?;
        }

        let txn = db.begin().await?;

        if Games::find_by_id(game_id).one(&txn).await?.is_none() {
            return Ok(None);
        }

        if updates.touches_game_row() {
            let game_active = games::ActiveModel {
                id: Set(game_id),
                title: updates.title.map_or(NotSet, Set),
                description: updates.description.map_or(NotSet, Set),
                release_date: updates.release_date.map_or(NotSet, Set),
                developer: updates.developer.map_or(NotSet, Set),
                publisher: updates.publisher.map_or(NotSet, Set),
                rating: updates.rating.map_or(NotSet, Set),
                ..Default::default()
            };
            game_active.update(&txn).await?;
        }

        if let Some(genres) = &updates.genres {
            ReferenceRepository::replace(&txn, game_id, ReferenceKind::Genre, genres).await?;
        }
        if let Some(platforms) = &updates.platforms {
            ReferenceRepository::replace(&txn, game_id, ReferenceKind::Platform, platforms)
                .await?;
        }

        txn.commit().await?;
        log::info!("更新游戏 {}", game_id);

        Self::find_by_id(db, game_id).await
    }

    // ==================== 查询操作 ====================

    /// 根据 ID 查询游戏（含类型与平台名称）
    pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<GameDetails>> {
        let Some(game) = Games::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let genres = ReferenceRepository::names_for_game(db, id, ReferenceKind::Genre).await?;
        let platforms = ReferenceRepository::names_for_game(db, id, ReferenceKind::Platform).await?;

        Ok(Some(GameDetails::from_model(game, genres, platforms)))
    }

    /// 获取所有游戏，按 ID（插入顺序）排列
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<GameDetails>> {
        let games = Games::find()
            .order_by_asc(games::Column::Id)
            .all(db)
            .await?;
        Self::with_references(db, games, false).await
    }

    /// 查找关联了指定类型 / 平台的游戏，按 ID 排列
    pub async fn find_by_reference(
        db: &DatabaseConnection,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Vec<GameDetails>> {
        let games = match kind {
            ReferenceKind::Genre => {
                use crate::entity::genres;
                Games::find()
                    .inner_join(Genres)
                    .filter(genres::Column::Name.eq(name))
                    .order_by_asc(games::Column::Id)
                    .all(db)
                    .await?
            }
            ReferenceKind::Platform => {
                use crate::entity::platforms;
                Games::find()
                    .inner_join(Platforms)
                    .filter(platforms::Column::Name.eq(name))
                    .order_by_asc(games::Column::Id)
                    .all(db)
                    .await?
            }
        };
        Self::with_references(db, games, true).await
    }

    /// 获取游戏总数
    pub async fn count(db: &DatabaseConnection) -> Result<u64> {
        Ok(Games::find().count(db).await?)
    }

    // ==================== 删除操作 ====================

    /// 删除游戏，返回是否真正删除了一行
    ///
    /// 关联行在同一事务内显式删除（schema 中的级联删除作为兜底）
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool> {
        let txn = db.begin().await?;

        ReferenceRepository::clear(&txn, id, ReferenceKind::Genre).await?;
        ReferenceRepository::clear(&txn, id, ReferenceKind::Platform).await?;
        let result = Games::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            log::info!("删除游戏 {}", id);
        }
        Ok(deleted)
    }

    /// 批量删除游戏
    ///
    /// 在事务中批量删除，保证原子性，返回删除的游戏数
    pub async fn delete_many(db: &DatabaseConnection, ids: Vec<i32>) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let txn = db.begin().await?;
        let mut count = 0u64;

        for id in ids {
            ReferenceRepository::clear(&txn, id, ReferenceKind::Genre).await?;
            ReferenceRepository::clear(&txn, id, ReferenceKind::Platform).await?;
            count += Games::delete_by_id(id).exec(&txn).await?.rows_affected;
        }

        txn.commit().await?;
        log::info!("批量删除游戏 {} 个", count);
        Ok(count)
    }

    // ==================== 私有方法 ====================

    /// 为一组游戏补全类型与平台名称（每类关联只查询一次）
    ///
    /// `filtered` 为 true 时只加载这组游戏的关联；全表查询时不必附带 IN 列表。
    async fn with_references(
        db: &DatabaseConnection,
        games: Vec<games::Model>,
        filtered: bool,
    ) -> Result<Vec<GameDetails>> {
        if games.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = games.iter().map(|game| game.id).collect();
        let scope = filtered.then_some(ids.as_slice());

        let mut genres: HashMap<i32, Vec<String>> =
            ReferenceRepository::names_by_game(db, ReferenceKind::Genre, scope).await?;
        let mut platforms: HashMap<i32, Vec<String>> =
            ReferenceRepository::names_by_game(db, ReferenceKind::Platform, scope).await?;

        Ok(games
            .into_iter()
            .map(|game| {
                let game_genres = genres.remove(&game.id).unwrap_or_default();
                let game_platforms = platforms.remove(&game.id).unwrap_or_default();
                GameDetails::from_model(game, game_genres, game_platforms)
            })
            .collect())
    }
}
