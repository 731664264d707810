// ==========================================
// 车间OEE系统 - 引擎层
// ==========================================
// OEE 核算 / 录入校验门 / 两阶段录入服务
// 红线: 引擎不做 I/O，仓储操作由调用方处理
// ==========================================

pub mod error;
pub mod oee;
pub mod submission;
pub mod validation;

// 重导出
pub use error::{EngineError, EngineResult, ValidationError, ValidationResult};
pub use oee::OeeCalculator;
pub use submission::{
    PendingSubmission, ReviewSummary, SubmissionError, SubmissionPayload, SubmissionResult,
    SubmissionService, DEFAULT_PENDING_TTL_MINUTES,
};
pub use validation::{validate_downtime, validate_maintenance, validate_production};
