//! 类型 / 平台词表仓库
//!
//! 负责 "按名称查找或创建" 以及 game_genres / game_platforms 关联的维护。
//! 所有方法都接受任意连接（连接池或事务），由调用方决定事务边界。

use std::collections::{HashMap, HashSet};

use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::*;

use crate::database::dto::{PruneResult, ReferenceKind, ReferenceWithCount, normalize_names};
use crate::entity::prelude::*;
use crate::entity::{game_genres, game_platforms, genres, platforms};
use crate::error::{Result, is_unique_violation};

/// 词表仓库
pub struct ReferenceRepository;

impl ReferenceRepository {
    // ==================== 查找或创建 ====================

    /// 按名称解析词表 ID，不存在时插入
    pub async fn resolve<C>(db: &C, kind: ReferenceKind, name: &str) -> Result<i32>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        match Self::find_id(db, kind, name).await? {
            Some(id) => Ok(id),
            None => Self::insert_or_fetch(db, kind, name).await,
        }
    }

    /// 在保存点内插入名称
    ///
    /// 查询与插入之间若已有同名行写入（另一连接并发创建），唯一约束冲突只回滚保存点，
    /// 外层事务继续可用，随后重新查询返回已存在的 ID。
    async fn insert_or_fetch<C>(db: &C, kind: ReferenceKind, name: &str) -> Result<i32>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let savepoint = db.begin().await?;
        match Self::insert_name(&savepoint, kind, name).await {
            Ok(id) => {
                savepoint.commit().await?;
                log::debug!("新建 {} '{}' (id={})", kind, name, id);
                Ok(id)
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint.rollback().await?;
                log::debug!("{} '{}' 已被并发创建，重新查询", kind, name);
                match Self::find_id(db, kind, name).await? {
                    Some(id) => Ok(id),
                    None => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 按名称精确查找（区分大小写）
    pub async fn find_id<C>(db: &C, kind: ReferenceKind, name: &str) -> Result<Option<i32>>
    where
        C: ConnectionTrait,
    {
        let id = match kind {
            ReferenceKind::Genre => Genres::find()
                .filter(genres::Column::Name.eq(name))
                .one(db)
                .await?
                .map(|genre| genre.id),
            ReferenceKind::Platform => Platforms::find()
                .filter(platforms::Column::Name.eq(name))
                .one(db)
                .await?
                .map(|platform| platform.id),
        };
        Ok(id)
    }

    async fn insert_name<C>(db: &C, kind: ReferenceKind, name: &str) -> Result<i32, DbErr>
    where
        C: ConnectionTrait,
    {
        match kind {
            ReferenceKind::Genre => {
                let genre = genres::ActiveModel {
                    id: NotSet,
                    name: Set(name.to_string()),
                };
                genre.insert(db).await.map(|model| model.id)
            }
            ReferenceKind::Platform => {
                let platform = platforms::ActiveModel {
                    id: NotSet,
                    name: Set(name.to_string()),
                };
                platform.insert(db).await.map(|model| model.id)
            }
        }
    }

    // ==================== 关联维护 ====================

    /// 为游戏追加关联（只增不减）
    ///
    /// 名称去重后逐个解析，已存在的关联视为无操作。
    /// 游戏不存在时外键约束失败，返回 `ConstraintViolation`。
    pub async fn attach<C, S>(db: &C, game_id: i32, kind: ReferenceKind, names: &[S]) -> Result<()>
    where
        C: ConnectionTrait + TransactionTrait,
        S: AsRef<str>,
    {
        let names = normalize_names(kind, names)?;
        Self::attach_normalized(db, game_id, kind, &names).await
    }

    async fn attach_normalized<C>(
        db: &C,
        game_id: i32,
        kind: ReferenceKind,
        names: &[String],
    ) -> Result<()>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let mut linked = 0u64;
        for name in names {
            let reference_id = Self::resolve(db, kind, name).await?;
            if Self::link(db, game_id, kind, reference_id).await? {
                linked += 1;
            }
        }

        if linked > 0 {
            log::debug!("游戏 {} 新增 {} 个 {} 关联", game_id, linked, kind);
        }
        Ok(())
    }

    /// 插入单条关联，返回是否真正插入
    async fn link<C>(db: &C, game_id: i32, kind: ReferenceKind, reference_id: i32) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let inserted = match kind {
            ReferenceKind::Genre => {
                let link = game_genres::ActiveModel {
                    game_id: Set(game_id),
                    genre_id: Set(reference_id),
                };
                GameGenres::insert(link)
                    .on_conflict(
                        OnConflict::columns([
                            game_genres::Column::GameId,
                            game_genres::Column::GenreId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(db)
                    .await?
            }
            ReferenceKind::Platform => {
                let link = game_platforms::ActiveModel {
                    game_id: Set(game_id),
                    platform_id: Set(reference_id),
                };
                GamePlatforms::insert(link)
                    .on_conflict(
                        OnConflict::columns([
                            game_platforms::Column::GameId,
                            game_platforms::Column::PlatformId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(db)
                    .await?
            }
        };
        Ok(inserted > 0)
    }

    /// 将游戏的某类关联整体替换为 `names`
    ///
    /// 差异计算：删除不在新列表中的关联，只为缺失的名称新建关联，未变动的关联保持不动。
    pub async fn replace<C, S>(
        db: &C,
        game_id: i32,
        kind: ReferenceKind,
        names: &[S],
    ) -> Result<()>
    where
        C: ConnectionTrait + TransactionTrait,
        S: AsRef<str>,
    {
        let requested = normalize_names(kind, names)?;
        let requested_set: HashSet<&str> = requested.iter().map(String::as_str).collect();

        let current = Self::linked_for_game(db, game_id, kind).await?;
        let current_names: HashSet<&str> = current.iter().map(|(_, name)| name.as_str()).collect();

        let stale: Vec<i32> = current
            .iter()
            .filter(|(_, name)| !requested_set.contains(name.as_str()))
            .map(|(id, _)| *id)
            .collect();
        let removed = Self::unlink_many(db, game_id, kind, stale).await?;

        let missing: Vec<String> = requested
            .iter()
            .filter(|name| !current_names.contains(name.as_str()))
            .cloned()
            .collect();
        Self::attach_normalized(db, game_id, kind, &missing).await?;

        log::debug!(
            "游戏 {} 的 {} 关联已替换：新增 {}，移除 {}",
            game_id,
            kind,
            missing.len(),
            removed
        );
        Ok(())
    }

    /// 移除游戏的指定关联，返回实际删除的行数
    ///
    /// 不存在的名称直接忽略，词表条目本身保留。
    pub async fn detach<C, S>(
        db: &C,
        game_id: i32,
        kind: ReferenceKind,
        names: &[S],
    ) -> Result<u64>
    where
        C: ConnectionTrait,
        S: AsRef<str>,
    {
        let names = normalize_names(kind, names)?;
        if names.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i32> = match kind {
            ReferenceKind::Genre => Genres::find()
                .filter(genres::Column::Name.is_in(names))
                .all(db)
                .await?
                .into_iter()
                .map(|genre| genre.id)
                .collect(),
            ReferenceKind::Platform => Platforms::find()
                .filter(platforms::Column::Name.is_in(names))
                .all(db)
                .await?
                .into_iter()
                .map(|platform| platform.id)
                .collect(),
        };

        Self::unlink_many(db, game_id, kind, ids).await
    }

    /// 删除游戏的全部某类关联
    pub async fn clear<C>(db: &C, game_id: i32, kind: ReferenceKind) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = match kind {
            ReferenceKind::Genre => {
                GameGenres::delete_many()
                    .filter(game_genres::Column::GameId.eq(game_id))
                    .exec(db)
                    .await?
            }
            ReferenceKind::Platform => {
                GamePlatforms::delete_many()
                    .filter(game_platforms::Column::GameId.eq(game_id))
                    .exec(db)
                    .await?
            }
        };
        Ok(result.rows_affected)
    }

    async fn unlink_many<C>(
        db: &C,
        game_id: i32,
        kind: ReferenceKind,
        reference_ids: Vec<i32>,
    ) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        if reference_ids.is_empty() {
            return Ok(0);
        }

        let result = match kind {
            ReferenceKind::Genre => {
                GameGenres::delete_many()
                    .filter(
                        game_genres::Column::GameId
                            .eq(game_id)
                            .and(game_genres::Column::GenreId.is_in(reference_ids)),
                    )
                    .exec(db)
                    .await?
            }
            ReferenceKind::Platform => {
                GamePlatforms::delete_many()
                    .filter(
                        game_platforms::Column::GameId
                            .eq(game_id)
                            .and(game_platforms::Column::PlatformId.is_in(reference_ids)),
                    )
                    .exec(db)
                    .await?
            }
        };
        Ok(result.rows_affected)
    }

    // ==================== 查询 ====================

    /// 获取游戏关联的名称（按名称排序）
    pub async fn names_for_game<C>(db: &C, game_id: i32, kind: ReferenceKind) -> Result<Vec<String>>
    where
        C: ConnectionTrait,
    {
        Ok(Self::linked_for_game(db, game_id, kind)
            .await?
            .into_iter()
            .map(|(_, name)| name)
            .collect())
    }

    async fn linked_for_game<C>(
        db: &C,
        game_id: i32,
        kind: ReferenceKind,
    ) -> Result<Vec<(i32, String)>>
    where
        C: ConnectionTrait,
    {
        let rows = match kind {
            ReferenceKind::Genre => Genres::find()
                .inner_join(GameGenres)
                .filter(game_genres::Column::GameId.eq(game_id))
                .order_by_asc(genres::Column::Name)
                .all(db)
                .await?
                .into_iter()
                .map(|genre| (genre.id, genre.name))
                .collect(),
            ReferenceKind::Platform => Platforms::find()
                .inner_join(GamePlatforms)
                .filter(game_platforms::Column::GameId.eq(game_id))
                .order_by_asc(platforms::Column::Name)
                .all(db)
                .await?
                .into_iter()
                .map(|platform| (platform.id, platform.name))
                .collect(),
        };
        Ok(rows)
    }

    /// 一次查询取出游戏的某类关联名称，按 game_id 分组（避免 N+1 查询）
    ///
    /// `game_ids` 为 `None` 时加载全部关联。
    pub async fn names_by_game<C>(
        db: &C,
        kind: ReferenceKind,
        game_ids: Option<&[i32]>,
    ) -> Result<HashMap<i32, Vec<String>>>
    where
        C: ConnectionTrait,
    {
        let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();

        match kind {
            ReferenceKind::Genre => {
                let mut query = GameGenres::find();
                if let Some(ids) = game_ids {
                    query = query.filter(game_genres::Column::GameId.is_in(ids.iter().copied()));
                }
                let rows = query
                    .find_also_related(Genres)
                    .order_by_asc(genres::Column::Name)
                    .all(db)
                    .await?;
                for (link, genre) in rows {
                    if let Some(genre) = genre {
                        grouped.entry(link.game_id).or_default().push(genre.name);
                    }
                }
            }
            ReferenceKind::Platform => {
                let mut query = GamePlatforms::find();
                if let Some(ids) = game_ids {
                    query =
                        query.filter(game_platforms::Column::GameId.is_in(ids.iter().copied()));
                }
                let rows = query
                    .find_also_related(Platforms)
                    .order_by_asc(platforms::Column::Name)
                    .all(db)
                    .await?;
                for (link, platform) in rows {
                    if let Some(platform) = platform {
                        grouped.entry(link.game_id).or_default().push(platform.name);
                    }
                }
            }
        }

        Ok(grouped)
    }

    /// 列出词表条目及其关联的游戏数量（按名称排序）
    pub async fn list_with_counts<C>(db: &C, kind: ReferenceKind) -> Result<Vec<ReferenceWithCount>>
    where
        C: ConnectionTrait,
    {
        let (entries, counts): (Vec<(i32, String)>, Vec<(i32, i64)>) = match kind {
            ReferenceKind::Genre => {
                let entries: Vec<(i32, String)> = Genres::find()
                    .order_by_asc(genres::Column::Name)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(|genre| (genre.id, genre.name))
                    .collect();
                let counts = GameGenres::find()
                    .select_only()
                    .column(game_genres::Column::GenreId)
                    .column_as(Expr::col(game_genres::Column::GameId).count(), "game_count")
                    .group_by(game_genres::Column::GenreId)
                    .into_tuple::<(i32, i64)>()
                    .all(db)
                    .await?;
                (entries, counts)
            }
            ReferenceKind::Platform => {
                let entries: Vec<(i32, String)> = Platforms::find()
                    .order_by_asc(platforms::Column::Name)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(|platform| (platform.id, platform.name))
                    .collect();
                let counts = GamePlatforms::find()
                    .select_only()
                    .column(game_platforms::Column::PlatformId)
                    .column_as(
                        Expr::col(game_platforms::Column::GameId).count(),
                        "game_count",
                    )
                    .group_by(game_platforms::Column::PlatformId)
                    .into_tuple::<(i32, i64)>()
                    .all(db)
                    .await?;
                (entries, counts)
            }
        };

        let counts: HashMap<i32, i64> = counts.into_iter().collect();
        Ok(entries
            .into_iter()
            .map(|(id, name)| ReferenceWithCount {
                id,
                name,
                game_count: counts.get(&id).copied().unwrap_or(0).max(0) as u64,
            })
            .collect())
    }

    // ==================== 清理 ====================

    /// 删除没有任何游戏引用的词表条目
    pub async fn prune_orphans<C>(db: &C, kind: ReferenceKind) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = match kind {
            ReferenceKind::Genre => {
                Genres::delete_many()
                    .filter(
                        genres::Column::Id.not_in_subquery(
                            Query::select()
                                .column(game_genres::Column::GenreId)
                                .from(GameGenres)
                                .to_owned(),
                        ),
                    )
                    .exec(db)
                    .await?
            }
            ReferenceKind::Platform => {
                Platforms::delete_many()
                    .filter(
                        platforms::Column::Id.not_in_subquery(
                            Query::select()
                                .column(game_platforms::Column::PlatformId)
                                .from(GamePlatforms)
                                .to_owned(),
                        ),
                    )
                    .exec(db)
                    .await?
            }
        };

        if result.rows_affected > 0 {
            log::info!("清理了 {} 个孤立的 {}", result.rows_affected, kind);
        }
        Ok(result.rows_affected)
    }

    /// 清理所有孤立的类型与平台
    pub async fn prune_all<C>(db: &C) -> Result<PruneResult>
    where
        C: ConnectionTrait,
    {
        Ok(PruneResult {
            genres_removed: Self::prune_orphans(db, ReferenceKind::Genre).await?,
            platforms_removed: Self::prune_orphans(db, ReferenceKind::Platform).await?,
        })
    }
}
