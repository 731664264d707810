// ==========================================
// 车间OEE系统 - 录入校验门
// ==========================================
// 职责: 生产/停机记录入库前的前置检查
// 原则: 校验失败整单拒绝并报告原因，绝不部分入库；
//       不是可重试的恢复流程，由录入人修正后重新提交
// ==========================================

use crate::domain::downtime::DowntimeRecord;
use crate::domain::maintenance::MaintenanceRecord;
use crate::domain::production::ProductionRecord;
use crate::engine::error::{ValidationError, ValidationResult};

/// 校验生产台账记录
///
/// 拒绝条件:
/// - 跨午夜修正后时长 ≤ 0
/// - 良品 + 废品 = 0
/// - 数量为负 / 标准节拍非正 / 换型时间为负
/// - 机台或操作工为空
pub fn validate_production(record: &ProductionRecord) -> ValidationResult<()> {
    if record.machine.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "machine" });
    }
    if record.operator.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "operator" });
    }

    if record.good_qty < 0 {
        return Err(ValidationError::NegativeQuantity {
            field: "good_qty",
            value: record.good_qty,
        });
    }
    if record.scrap_qty < 0 {
        return Err(ValidationError::NegativeQuantity {
            field: "scrap_qty",
            value: record.scrap_qty,
        });
    }
    if record.cycle_seconds <= 0.0 {
        return Err(ValidationError::NonPositiveCycle {
            value: record.cycle_seconds,
        });
    }
    if record.setup_minutes < 0.0 {
        return Err(ValidationError::NegativeSetup {
            value: record.setup_minutes,
        });
    }

    let elapsed = record.elapsed_minutes();
    if elapsed <= 0.0 {
        return Err(ValidationError::NonPositiveElapsed {
            elapsed_minutes: elapsed,
        });
    }

    if record.total_qty() == 0 {
        return Err(ValidationError::ZeroQuantity);
    }

    Ok(())
}

/// 校验停机台账记录
///
/// 拒绝条件:
/// - 跨午夜修正后时长 ≤ 0（零时长停机无意义，规则统一无例外）
/// - 原因或机台为空
pub fn validate_downtime(record: &DowntimeRecord) -> ValidationResult<()> {
    if record.machine.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "machine" });
    }
    if record.reason.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "reason" });
    }

    let duration = record.duration_minutes();
    if duration <= 0.0 {
        return Err(ValidationError::NonPositiveDuration {
            duration_minutes: duration,
        });
    }

    Ok(())
}

/// 校验维修台账记录
///
/// 拒绝条件:
/// - 机台或技师为空
pub fn validate_maintenance(record: &MaintenanceRecord) -> ValidationResult<()> {
    if record.machine.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "machine" });
    }
    if record.technician.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "technician" });
    }

    Ok(())
}
