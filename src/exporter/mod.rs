// ==========================================
// 车间OEE系统 - 导出层
// ==========================================
// 期末结账: 原始台账按类别导出为表格文件
// ==========================================

pub mod closing;

pub use closing::{ClosingExporter, ClosingExportResult, ExportError, ExportResult};
