// ==========================================
// 车间OEE系统 - 领域层
// ==========================================
// 实体: 生产台账 / 停机台账 / 维修台账 / OEE报告 / 基础档案
// ==========================================

pub mod downtime;
pub mod maintenance;
pub mod production;
pub mod reference;
pub mod report;
pub mod types;

// 重导出领域实体
pub use downtime::{DowntimeRecord, FAILURE_TOKENS};
pub use maintenance::{MachineMeter, MaintenanceRecord, MaintenanceType};
pub use production::ProductionRecord;
pub use reference::ReferenceItem;
pub use report::OeeReport;
pub use types::{span_minutes, ReferenceKind, WorkCenter};
