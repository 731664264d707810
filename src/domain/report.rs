// ==========================================
// 车间OEE系统 - OEE 报告
// ==========================================
// 纯计算结果，按查询即时重算，不落库、无标识
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// OeeReport - OEE 核算报告
// ==========================================

/// OEE 核算报告
///
/// 由 OeeCalculator 对一个(工段, 时间窗)内的生产/停机记录集合计算得出。
/// 百分比指标均落在 [0, 100]；mttr_minutes 与合计字段无上界、恒非负
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeReport {
    /// 时间开动率（%）= 运行 / (运行 + 停机)
    pub availability_pct: f64,
    /// 性能稼动率（%）= 理论生产时间 / 实际占用时间，封顶 100
    pub performance_pct: f64,
    /// 良品率（%）= 良品 / 总件数
    pub quality_pct: f64,
    /// 设备综合效率（%）= 三率严格乘积
    pub oee_pct: f64,
    /// 平均修复时间（分钟，仅故障事件）
    pub mttr_minutes: f64,
    /// 换型负荷（%）= 换型时间 / 实际占用时间
    pub setup_load_pct: f64,

    // ===== 看板展示用合计 =====
    /// 实际占用时间合计（分钟）
    pub total_run_minutes: f64,
    /// 停机时间合计（分钟）
    pub total_downtime_minutes: f64,
    /// 良品合计（件）
    pub total_good_qty: i64,
    /// 废品合计（件）
    pub total_scrap_qty: i64,
    /// 故障事件数
    pub failure_event_count: usize,
}

impl OeeReport {
    /// 全零报告（空时间窗的合法结果，不是错误）
    pub fn zero() -> Self {
        Self {
            availability_pct: 0.0,
            performance_pct: 0.0,
            quality_pct: 0.0,
            oee_pct: 0.0,
            mttr_minutes: 0.0,
            setup_load_pct: 0.0,
            total_run_minutes: 0.0,
            total_downtime_minutes: 0.0,
            total_good_qty: 0,
            total_scrap_qty: 0,
            failure_event_count: 0,
        }
    }
}
