//! 数据传输对象 (DTO)
//!
//! 调用方传入的游戏记录在写入前于此处校验。

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::games;
use crate::error::{CatalogError, Result};

/// 辅助函数：支持 Option<Option<T>> 的反序列化
/// 用于区分"未提供字段"和"显式设为 null"
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// 关联词表的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Genre,
    Platform,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Genre => f.write_str("genre"),
            Self::Platform => f.write_str("platform"),
        }
    }
}

/// 用于插入游戏的数据结构
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewGame {
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub rating: Option<f64>,
}

impl NewGame {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// 写入前校验
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_rating(self.rating)
    }
}

/// 用于更新游戏的数据结构
///
/// 所有字段均为 Option，允许部分更新。
/// 使用 Option<Option<T>> 来区分"未提供"和"设为 null"。
/// `genres` / `platforms` 提供时整体替换对应关联。
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub release_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub developer: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub publisher: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rating: Option<Option<f64>>,

    pub genres: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
}

impl GameUpdate {
    /// 是否包含 games 表本身的字段
    pub fn touches_game_row(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.release_date.is_some()
            || self.developer.is_some()
            || self.publisher.is_some()
            || self.rating.is_some()
    }
}

/// 对外返回的完整游戏数据（含类型与平台名称，按名称排序）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub rating: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
}

impl GameDetails {
    pub fn from_model(game: games::Model, genres: Vec<String>, platforms: Vec<String>) -> Self {
        Self {
            id: game.id,
            title: game.title,
            description: game.description,
            release_date: game.release_date,
            developer: game.developer,
            publisher: game.publisher,
            rating: game.rating,
            created_at: game.created_at,
            genres,
            platforms,
        }
    }
}

/// 带引用计数的词表条目
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceWithCount {
    pub id: i32,
    pub name: String,
    pub game_count: u64,
}

/// 清理孤立词表条目的结果
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneResult {
    pub genres_removed: u64,
    pub platforms_removed: u64,
}

/// 校验标题：不能为空或只含空白，原样保存不做修改
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CatalogError::validation("游戏标题不能为空"));
    }
    Ok(())
}

/// 校验评分：NaN / 无穷大写入 SQLite 后会变成 NULL，直接拒绝
pub fn validate_rating(rating: Option<f64>) -> Result<()> {
    match rating {
        Some(value) if !value.is_finite() => Err(CatalogError::validation(format!(
            "评分必须是有限数值: {}",
            value
        ))),
        _ => Ok(()),
    }
}

/// 规范化词表名称列表：去重并按名称排序，名称本身原样保留
///
/// 空名称或只含空白的名称视为校验错误。名称比较精确匹配，区分大小写与空白。
pub fn normalize_names<S: AsRef<str>>(kind: ReferenceKind, names: &[S]) -> Result<Vec<String>> {
    let mut unique = BTreeSet::new();
    for name in names {
        let name = name.as_ref();
        if name.trim().is_empty() {
            return Err(CatalogError::validation(format!("{} 名称不能为空", kind)));
        }
        unique.insert(name.to_string());
    }
    Ok(unique.into_iter().collect())
}
