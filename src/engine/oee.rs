// ==========================================
// 车间OEE系统 - OEE 核算引擎
// ==========================================
// 职责: 对一个(工段, 时间窗)内的生产/停机记录集合
//       计算 时间开动率 × 性能稼动率 × 良品率 = OEE，
//       以及故障 MTTR 与换型负荷
// 输入: 调用方已按工段+日期范围过滤、且仅含 active 记录
// 输出: OeeReport（纯函数，无 I/O，不做过滤）
// ==========================================
// 口径说明（全系统唯一实现，不允许各工段自行变体）:
// - 性能稼动率 = 理论生产时间 / 实际占用时间，封顶 100%
// - 换型时间计入实际占用时间，不计入理论生产时间
// - OEE 为三率严格乘积，不是平均值
// ==========================================

use crate::domain::downtime::DowntimeRecord;
use crate::domain::production::ProductionRecord;
use crate::domain::report::OeeReport;
use crate::engine::error::{EngineError, EngineResult};

// ==========================================
// OeeCalculator - OEE 核算引擎
// ==========================================
pub struct OeeCalculator {
    // 无状态引擎,不需要注入依赖
    // Repository 操作由调用方处理
}

impl Default for OeeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl OeeCalculator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 核算 OEE 报告
    ///
    /// # 参数
    /// - `production`: 生产台账记录（已过滤）
    /// - `downtime`: 停机台账记录（已过滤）
    ///
    /// # 返回
    /// - Ok(OeeReport): 核算结果；空输入返回全零报告（合法，非错误）
    /// - Err(EngineError::MalformedRecord): 畸形记录漏过校验门
    pub fn compute(
        &self,
        production: &[ProductionRecord],
        downtime: &[DowntimeRecord],
    ) -> EngineResult<OeeReport> {
        // 1. 生产侧聚合: 实际占用 / 理论 / 换型
        let mut total_run_minutes = 0.0;
        let mut total_theoretical_minutes = 0.0;
        let mut total_setup_minutes = 0.0;
        let mut total_good_qty: i64 = 0;
        let mut total_scrap_qty: i64 = 0;

        for record in production {
            let elapsed = record.elapsed_minutes();
            if elapsed <= 0.0 {
                return Err(Self::malformed_production(
                    record,
                    format!("跨午夜修正后时长非正: {}分钟", elapsed),
                ));
            }
            if record.total_qty() <= 0 {
                return Err(Self::malformed_production(
                    record,
                    "总件数非正".to_string(),
                ));
            }

            total_run_minutes += elapsed;
            total_theoretical_minutes += record.theoretical_minutes();
            total_setup_minutes += record.setup_minutes;
            total_good_qty += record.good_qty;
            total_scrap_qty += record.scrap_qty;
        }

        // 2. 停机侧聚合
        let mut total_downtime_minutes = 0.0;
        let mut failure_total_minutes = 0.0;
        let mut failure_event_count: usize = 0;

        for record in downtime {
            let duration = record.duration_minutes();
            if duration <= 0.0 {
                return Err(EngineError::MalformedRecord {
                    record_kind: "DOWNTIME",
                    work_date: record.work_date.to_string(),
                    machine: record.machine.clone(),
                    detail: format!("跨午夜修正后时长非正: {}分钟", duration),
                });
            }

            total_downtime_minutes += duration;
            if record.is_failure_event() {
                failure_total_minutes += duration;
                failure_event_count += 1;
            }
        }

        // 3. 时间开动率 = 运行 / (运行 + 停机)；无活动无停机 → 0
        let scheduled_minutes = total_run_minutes + total_downtime_minutes;
        let availability_pct = if scheduled_minutes > 0.0 {
            total_run_minutes / scheduled_minutes * 100.0
        } else {
            0.0
        };

        // 4. 性能稼动率 = 理论 / 运行，封顶 100（快于标准节拍不得超报）
        let performance_pct = if total_run_minutes > 0.0 {
            (total_theoretical_minutes / total_run_minutes * 100.0).min(100.0)
        } else {
            0.0
        };

        // 5. 良品率 = 良品 / 总件数
        let total_qty = total_good_qty + total_scrap_qty;
        let quality_pct = if total_qty > 0 {
            total_good_qty as f64 / total_qty as f64 * 100.0
        } else {
            0.0
        };

        // 6. OEE = 三率严格乘积
        let oee_pct =
            (availability_pct / 100.0) * (performance_pct / 100.0) * (quality_pct / 100.0) * 100.0;

        // 7. MTTR = 故障事件平均时长；无故障 → 0（非错误）
        let mttr_minutes = if failure_event_count > 0 {
            failure_total_minutes / failure_event_count as f64
        } else {
            0.0
        };

        // 8. 换型负荷 = 换型 / 运行
        let setup_load_pct = if total_run_minutes > 0.0 {
            total_setup_minutes / total_run_minutes * 100.0
        } else {
            0.0
        };

        Ok(OeeReport {
            availability_pct,
            performance_pct,
            quality_pct,
            oee_pct,
            mttr_minutes,
            setup_load_pct,
            total_run_minutes,
            total_downtime_minutes,
            total_good_qty,
            total_scrap_qty,
            failure_event_count,
        })
    }

    fn malformed_production(record: &ProductionRecord, detail: String) -> EngineError {
        EngineError::MalformedRecord {
            record_kind: "PRODUCTION",
            work_date: record.work_date.to_string(),
            machine: record.machine.clone(),
            detail,
        }
    }
}
