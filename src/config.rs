//! 数据库连接配置
//!
//! 默认连接串由 catalog-path 推导（便携模式 / 系统数据目录），
//! 环境变量 `GAME_CATALOG_DATABASE_URL` 可以覆盖。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CatalogError, Result};

/// 覆盖连接串的环境变量
pub const DATABASE_URL_ENV: &str = "GAME_CATALOG_DATABASE_URL";

/// 内存数据库连接串
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// 是否输出 sqlx 语句日志
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: IN_MEMORY_URL.to_string(),
            // 对于本地 SQLite，连接池大小为 1 即可
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 8,
            sqlx_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// 内存数据库配置（测试用，连接池必须为 1，否则每个连接各自一个库）
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// 指定数据库文件路径
    pub fn from_path(db_path: &Path) -> Result<Self> {
        Ok(Self {
            url: sqlite_url_for_path(db_path)?,
            ..Self::default()
        })
    }

    /// 解析最终配置：环境变量优先，否则使用默认数据目录下的数据库文件
    pub fn resolve() -> Result<Self> {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                log::info!("使用环境变量 {} 指定的数据库", DATABASE_URL_ENV);
                return Ok(Self {
                    url: url.trim().to_string(),
                    ..Self::default()
                });
            }
        }

        let db_path = catalog_path::get_db_path().map_err(CatalogError::Config)?;
        let mode = if catalog_path::is_portable_mode() {
            "便携"
        } else {
            "标准"
        };
        log::info!("使用{}模式数据库: {}", mode, db_path.display());
        Self::from_path(&db_path)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// 文件数据库的路径（内存库或非 sqlite 连接串返回 None）
    pub fn file_path(&self) -> Option<std::path::PathBuf> {
        if self.is_in_memory() {
            return None;
        }
        let rest = self.url.strip_prefix("sqlite:")?;
        let path = rest.split('?').next()?.trim_start_matches("//");
        if path.is_empty() {
            return None;
        }
        // 绝对路径由 sqlite_url_for_path 生成，可能带百分号编码；相对路径原样使用
        if path.starts_with('/') {
            Url::parse(&format!("file://{}", path))
                .ok()?
                .to_file_path()
                .ok()
        } else {
            Some(std::path::PathBuf::from(path))
        }
    }
}

/// 使用 `url` crate 安全地构建 sqlite 连接串
///
/// 对于本地文件，sqlite 驱动期望的格式是 `sqlite:path`，`mode=rwc` 表示不存在时创建
pub fn sqlite_url_for_path(db_path: &Path) -> Result<String> {
    let db_url = Url::from_file_path(db_path).map_err(|_| {
        CatalogError::Config(format!("Invalid database path: {}", db_path.display()))
    })?;
    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_a_single_in_memory_connection() {
        let config = DatabaseConfig::default();
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.connect_timeout(), Duration::from_secs(8));
        assert_eq!(config.file_path(), None);
    }

    #[cfg(unix)]
    #[test]
    fn file_url_round_trips_to_path() {
        let config = DatabaseConfig::from_path(Path::new("/var/lib/catalog/games.db")).unwrap();
        assert_eq!(config.url, "sqlite:/var/lib/catalog/games.db?mode=rwc");
        assert_eq!(
            config.file_path().as_deref(),
            Some(Path::new("/var/lib/catalog/games.db"))
        );
    }

    #[test]
    fn relative_override_url_keeps_its_directory() {
        let config = DatabaseConfig {
            url: "sqlite:data/games.db?mode=rwc".to_string(),
            ..DatabaseConfig::default()
        };
        assert_eq!(
            config.file_path().as_deref(),
            Some(Path::new("data/games.db"))
        );
        assert_eq!(
            config.file_path().as_deref().and_then(Path::parent),
            Some(Path::new("data"))
        );
    }

    #[test]
    fn relative_path_is_rejected() {
        let err = DatabaseConfig::from_path(Path::new("games.db")).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{ "url": "sqlite:/tmp/x.db", "sqlx_logging": true }"#)
                .unwrap();
        assert_eq!(config.max_connections, 1);
        assert!(config.sqlx_logging);
    }
}
