use std::fs;
use std::path::{Path, PathBuf};

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr};

use crate::config::DatabaseConfig;
use crate::error::{CatalogError, Result};

// ==================== 数据库连接管理 ====================

/// Establish a SeaORM database connection.
pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    // 1. 文件数据库：确保所在目录存在
    if let Some(db_path) = config.file_path() {
        if !db_path.exists() {
            if let Some(parent) = db_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    DbErr::Conn(RuntimeErr::Internal(format!("无法创建数据库目录: {}", e)))
                })?;
            }
            log::info!("首次启动，创建数据库: {}", db_path.display());
        }
    }

    // 2. 设置连接选项
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout())
        .sqlx_logging(config.sqlx_logging);

    // 3. 连接数据库（sqlx 的 sqlite 驱动默认开启 foreign_keys）
    let conn = Database::connect(options).await?;
    log::debug!("数据库连接建立成功: {}", config.url);
    Ok(conn)
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<()> {
    conn.close().await?;
    Ok(())
}

// ==================== 数据库备份 ====================

/// 生成带时间戳的备份文件名
fn generate_backup_filename() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    format!("game_catalog_{}.db", timestamp)
}

/// 使用 VACUUM INTO 进行数据库热备份
///
/// 此方法使用 SQLite 的 VACUUM INTO 语句，可以在数据库正在使用时安全地创建备份。
/// 目标目录不存在时自动创建。
///
/// # Arguments
///
/// * `db` - 数据库连接
/// * `backup_dir` - 备份目标目录
///
/// # Returns
///
/// 备份文件的完整路径
pub async fn backup_database(db: &DatabaseConnection, backup_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(backup_dir)?;

    let target_path = backup_dir.join(generate_backup_filename());

    // SQLite 在 Windows 上也支持正斜杠，使用正斜杠可以避免转义问题
    let target_path_str = target_path
        .to_str()
        .ok_or_else(|| CatalogError::Config("备份路径包含无效字符".to_string()))?
        .replace('\\', "/");

    // 只需要转义单引号
    let escaped_path = target_path_str.replace('\'', "''");
    let vacuum_sql = format!("VACUUM INTO '{}'", escaped_path);

    db.execute_unprepared(&vacuum_sql).await?;

    log::info!("数据库热备份成功: {}", target_path_str);
    Ok(target_path)
}
