use std::path::{Path, PathBuf};

/// 数据库相关路径常量
pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "game_catalog.db";
pub const DB_BACKUP_SUBDIR: &str = "backups";
pub const RESOURCE_DIR: &str = "resources";

/// 判断指定目录下是否存在便携模式数据库
///
/// 检测逻辑：`<dir>/resources/data/game_catalog.db` 存在即视为便携模式
pub fn has_portable_db(dir: &Path) -> bool {
    portable_db_path(dir).is_file()
}

/// 判断是否处于便携模式
///
/// 检查可执行文件同级目录下是否存在 resources/data/game_catalog.db
pub fn is_portable_mode() -> bool {
    exe_dir().map(|dir| has_portable_db(&dir)).unwrap_or(false)
}

/// 获取基础数据目录
pub fn get_base_data_dir() -> Result<PathBuf, String> {
    get_base_data_dir_for_mode(is_portable_mode())
}

/// 获取指定模式的基础数据目录
pub fn get_base_data_dir_for_mode(portable: bool) -> Result<PathBuf, String> {
    if portable {
        // 便携模式：使用可执行文件所在目录的 resources 子目录
        Ok(exe_dir()?.join(RESOURCE_DIR))
    } else {
        get_system_data_dir()
    }
}

/// 获取数据库文件路径
pub fn get_db_path() -> Result<PathBuf, String> {
    Ok(db_path_in(&get_base_data_dir()?))
}

/// 获取默认的数据库备份路径
pub fn get_default_db_backup_path() -> Result<PathBuf, String> {
    Ok(backup_dir_in(&get_base_data_dir()?))
}

/// 基础目录下的数据库文件路径
pub fn db_path_in(base: &Path) -> PathBuf {
    base.join(DB_DATA_DIR).join(DB_FILE_NAME)
}

/// 基础目录下的备份目录
pub fn backup_dir_in(base: &Path) -> PathBuf {
    base.join(DB_DATA_DIR).join(DB_BACKUP_SUBDIR)
}

fn portable_db_path(dir: &Path) -> PathBuf {
    db_path_in(&dir.join(RESOURCE_DIR))
}

fn exe_dir() -> Result<PathBuf, String> {
    let exe_path = std::env::current_exe().map_err(|e| format!("无法获取可执行文件路径: {}", e))?;
    exe_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| "无法获取可执行文件父目录".to_string())
}

/// 获取系统数据目录（跨平台）
fn get_system_data_dir() -> Result<PathBuf, String> {
    use directories::BaseDirs;

    let base_dirs = BaseDirs::new().ok_or_else(|| "无法获取系统目录信息".to_string())?;

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        Ok(base_dirs.data_dir().join("com.gamecatalog.dev"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        Ok(base_dirs.data_dir().join("game-catalog"))
    }
}
