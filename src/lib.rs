// ==========================================
// 车间生产数据采集与OEE分析系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 多工段(冲压/机加/钻削)生产与停机台账,
//          设备综合效率(OEE)核算与期末结账导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导出层 - 期末结账
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ReferenceKind, WorkCenter};

// 领域实体
pub use domain::{
    DowntimeRecord, MachineMeter, MaintenanceRecord, MaintenanceType, OeeReport,
    ProductionRecord, ReferenceItem,
};

// 引擎
pub use engine::{
    EngineError, OeeCalculator, PendingSubmission, ReviewSummary, SubmissionService,
    ValidationError,
};

// 仓储
pub use repository::{
    DowntimeRepository, MachineMeterRepository, MaintenanceRepository, ProductionRepository,
    ReferenceRepository,
};

// API
pub use api::{EntryApi, ReportApi};

// 导出
pub use exporter::ClosingExporter;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车间生产数据采集与OEE分析系统";

// ==========================================
// 预编译检查
// ==========================================
