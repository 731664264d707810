// ==========================================
// 车间OEE系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 原则: 核算失败必须指明问题记录，绝不静默产出 NaN/负值
// ==========================================

use thiserror::Error;

/// OEE 核算错误
///
/// 校验门正常工作时核算端永远不会见到畸形记录；
/// 这里是最后防线: 畸形记录进入核算即报错，而不是产出误导性数字
#[derive(Error, Debug)]
pub enum EngineError {
    /// 畸形记录（时长非正或总件数为零的记录进入了核算）
    #[error("畸形记录: {record_kind} (date={work_date}, machine={machine}): {detail}")]
    MalformedRecord {
        /// 记录类别: PRODUCTION / DOWNTIME
        record_kind: &'static str,
        /// 生产/停机日期
        work_date: String,
        /// 机台
        machine: String,
        /// 具体原因
        detail: String,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

/// 录入校验错误（校验门，入库前置检查）
///
/// 校验失败即整单拒绝，报告给录入人修正，绝不部分入库
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("生产时长非正: 跨午夜修正后 elapsed={elapsed_minutes}分钟")]
    NonPositiveElapsed { elapsed_minutes: f64 },

    #[error("停机时长非正: 跨午夜修正后 duration={duration_minutes}分钟")]
    NonPositiveDuration { duration_minutes: f64 },

    #[error("总件数为零: 良品与废品均为0")]
    ZeroQuantity,

    #[error("数量为负: {field}={value}")]
    NegativeQuantity { field: &'static str, value: i64 },

    #[error("标准节拍非正: cycle_seconds={value}")]
    NonPositiveCycle { value: f64 },

    #[error("换型时间为负: setup_minutes={value}")]
    NegativeSetup { value: f64 },

    #[error("必填字段为空: {field}")]
    BlankField { field: &'static str },
}

/// Result 类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;
