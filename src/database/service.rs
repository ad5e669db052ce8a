use std::path::{Path, PathBuf};

use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::config::DatabaseConfig;
use crate::database::connection;
use crate::database::dto::{
    GameDetails, GameUpdate, NewGame, PruneResult, ReferenceKind, ReferenceWithCount,
};
use crate::database::repository::{
    games_repository::GamesRepository, reference_repository::ReferenceRepository,
};
use crate::error::Result;

/// 游戏目录入口
///
/// 持有注入的数据库连接，本身不保存其他状态。克隆代价很低（连接池句柄）。
#[derive(Debug, Clone)]
pub struct GameCatalog {
    db: DatabaseConnection,
}

impl GameCatalog {
    /// 使用已建立的连接构造
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 按配置建立连接并构造（不执行迁移，需再调用 `init`）
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(connection::establish_connection(config).await?))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 执行数据库迁移，建立表结构
    pub async fn init(&self) -> Result<()> {
        log::info!("开始执行数据库迁移...");
        migration::Migrator::up(&self.db, None).await?;
        log::info!("数据库迁移完成");
        Ok(())
    }

    /// 关闭数据库连接
    pub async fn close(self) -> Result<()> {
        connection::close_connection(self.db).await
    }

    // ==================== 游戏数据相关 ====================

    /// 新增游戏（含类型与平台），返回游戏 ID
    pub async fn add_game<S, P>(&self, game: NewGame, genres: &[S], platforms: &[P]) -> Result<i32>
    where
        S: AsRef<str>,
        P: AsRef<str>,
    {
        GamesRepository::insert(&self.db, game, genres, platforms).await
    }

    /// 根据 ID 查询游戏，不存在时返回 `None`
    pub async fn get_game_by_id(&self, id: i32) -> Result<Option<GameDetails>> {
        GamesRepository::find_by_id(&self.db, id).await
    }

    /// 获取所有游戏（按 ID 排序）
    pub async fn get_all_games(&self) -> Result<Vec<GameDetails>> {
        GamesRepository::find_all(&self.db).await
    }

    /// 删除游戏，返回是否删除了记录
    pub async fn delete_game(&self, id: i32) -> Result<bool> {
        GamesRepository::delete(&self.db, id).await
    }

    /// 批量删除游戏
    pub async fn delete_games_batch(&self, ids: Vec<i32>) -> Result<u64> {
        GamesRepository::delete_many(&self.db, ids).await
    }

    /// 部分更新游戏，提供的类型 / 平台列表整体替换原有关联
    pub async fn update_game(&self, id: i32, updates: GameUpdate) -> Result<Option<GameDetails>> {
        GamesRepository::update(&self.db, id, updates).await
    }

    /// 获取游戏总数
    pub async fn count_games(&self) -> Result<u64> {
        GamesRepository::count(&self.db).await
    }

    pub async fn find_games_by_genre(&self, name: &str) -> Result<Vec<GameDetails>> {
        GamesRepository::find_by_reference(&self.db, ReferenceKind::Genre, name).await
    }

    pub async fn find_games_by_platform(&self, name: &str) -> Result<Vec<GameDetails>> {
        GamesRepository::find_by_reference(&self.db, ReferenceKind::Platform, name).await
    }

    // ==================== 关联相关 ====================

    /// 为游戏追加类型（已有关联保持不变）
    pub async fn attach_genres<S: AsRef<str>>(&self, game_id: i32, names: &[S]) -> Result<()> {
        self.attach(game_id, ReferenceKind::Genre, names).await
    }

    /// 为游戏追加平台（已有关联保持不变）
    pub async fn attach_platforms<S: AsRef<str>>(&self, game_id: i32, names: &[S]) -> Result<()> {
        self.attach(game_id, ReferenceKind::Platform, names).await
    }

    pub async fn detach_genres<S: AsRef<str>>(&self, game_id: i32, names: &[S]) -> Result<u64> {
        ReferenceRepository::detach(&self.db, game_id, ReferenceKind::Genre, names).await
    }

    pub async fn detach_platforms<S: AsRef<str>>(&self, game_id: i32, names: &[S]) -> Result<u64> {
        ReferenceRepository::detach(&self.db, game_id, ReferenceKind::Platform, names).await
    }

    async fn attach<S: AsRef<str>>(
        &self,
        game_id: i32,
        kind: ReferenceKind,
        names: &[S],
    ) -> Result<()> {
        let txn = self.db.begin().await?;
        ReferenceRepository::attach(&txn, game_id, kind, names).await?;
        txn.commit().await?;
        Ok(())
    }

    // ==================== 词表相关 ====================

    /// 所有类型及其游戏数量（按名称排序）
    pub async fn list_genres(&self) -> Result<Vec<ReferenceWithCount>> {
        ReferenceRepository::list_with_counts(&self.db, ReferenceKind::Genre).await
    }

    /// 所有平台及其游戏数量（按名称排序）
    pub async fn list_platforms(&self) -> Result<Vec<ReferenceWithCount>> {
        ReferenceRepository::list_with_counts(&self.db, ReferenceKind::Platform).await
    }

    /// 删除没有任何游戏引用的类型与平台
    ///
    /// 删除游戏时不会自动调用，词表默认保留以便复用
    pub async fn prune_orphaned_references(&self) -> Result<PruneResult> {
        let txn = self.db.begin().await?;
        let result = ReferenceRepository::prune_all(&txn).await?;
        txn.commit().await?;
        Ok(result)
    }

    // ==================== 备份 ====================

    /// 热备份到指定目录
    pub async fn backup_database(&self, backup_dir: &Path) -> Result<PathBuf> {
        connection::backup_database(&self.db, backup_dir).await
    }

    /// 热备份到默认备份目录
    pub async fn backup_to_default_dir(&self) -> Result<PathBuf> {
        let backup_dir = catalog_path::get_default_db_backup_path()
            .map_err(crate::error::CatalogError::Config)?;
        self.backup_database(&backup_dir).await
    }
}
