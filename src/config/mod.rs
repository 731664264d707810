// ==========================================
// 车间OEE系统 - 配置层
// ==========================================

pub mod app_config;

pub use app_config::{AppConfig, ConfigError, ConfigResult};
