// ==========================================
// 车间OEE系统 - API层
// ==========================================
// 报表接口 / 录入接口
// ==========================================

pub mod entry_api;
pub mod error;
pub mod report_api;

// 重导出
pub use entry_api::EntryApi;
pub use error::{ApiError, ApiResult};
pub use report_api::{DowntimeParetoEntry, OperatorPerformanceEntry, ReportApi};
