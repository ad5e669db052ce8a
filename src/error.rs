//! 错误类型
//!
//! 所有仓库操作统一返回 `CatalogError`。"不存在" 用 `Option` / `bool` 表示，
//! 不作为错误返回。

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// 必填字段缺失或非法（例如空标题、空的类型名）
    #[error("数据校验失败: {0}")]
    Validation(String),

    /// 唯一约束 / 外键约束冲突（未被本地恢复的部分）
    #[error("违反数据库约束: {0}")]
    ConstraintViolation(String),

    /// 数据库不可达或连接池获取失败
    #[error("数据库连接失败: {0}")]
    Connection(String),

    /// 配置错误（无法解析数据目录或连接串）
    #[error("配置错误: {0}")]
    Config(String),

    #[error("文件操作失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("数据库操作失败: {0}")]
    Database(DbErr),

    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return Self::ConstraintViolation(msg);
            }
            _ => {}
        }

        match err {
            DbErr::Conn(RuntimeErr::Internal(msg)) => Self::Connection(msg),
            DbErr::Conn(e) => Self::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => Self::Connection(e.to_string()),
            other => Self::Database(other),
        }
    }
}

/// 判断是否为唯一约束冲突（用于 "查找或创建" 的竞态恢复）
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
