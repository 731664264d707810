// ==========================================
// 车间OEE系统 - 应用配置
// ==========================================
// 职责: 数据库路径 / 导出目录的加载与保存
// 存储: JSON 文件，默认位于平台数据目录下
// 缺省行为: 配置文件不存在时使用默认值（不报错）
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// AppConfig - 应用配置
// ==========================================

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite 数据库文件路径
    pub db_path: PathBuf,
    /// 期末结账导出目录
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            db_path: data_dir.join("shopfloor.db"),
            export_dir: data_dir.join("exports"),
        }
    }
}

impl AppConfig {
    /// 从指定路径加载配置
    ///
    /// 文件不存在时返回默认配置
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// 保存配置到指定路径（父目录不存在时自动创建）
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// 默认配置文件路径
    pub fn default_config_path() -> PathBuf {
        default_data_dir().join("config.json")
    }
}

/// 平台数据目录下的应用目录；取不到平台目录时退回当前目录
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shopfloor-oee")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig {
            db_path: PathBuf::from("/tmp/test.db"),
            export_dir: PathBuf::from("/tmp/exports"),
        };
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let loaded = AppConfig::load("/nonexistent/config.json").unwrap();
        assert_eq!(loaded, AppConfig::default());
    }
}
