// ==========================================
// 车间OEE系统 - 报表接口
// ==========================================
// 职责: 按(工段, 日期范围)读取有效记录，调用核算引擎，
//       输出 OEE 报告与停机帕累托数据
// 软删除记录在仓储查询层即被过滤，核算端永远见不到
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::report::OeeReport;
use crate::domain::types::WorkCenter;
use crate::engine::oee::OeeCalculator;
use crate::repository::downtime_repo::DowntimeRepository;
use crate::repository::production_repo::ProductionRepository;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// 停机帕累托条目
// ==========================================

/// 停机帕累托条目（按原因汇总，降序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeParetoEntry {
    /// 停机原因
    pub reason: String,
    /// 停机时间合计（分钟）
    pub total_minutes: f64,
    /// 事件数
    pub event_count: usize,
}

// ==========================================
// 操作工绩效条目
// ==========================================

/// 操作工绩效条目（按操作工汇总，效率降序）
///
/// 效率口径与整体性能率一致: 理论生产时间 / 实际占用时间，上限 100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorPerformanceEntry {
    /// 操作工
    pub operator: String,
    /// 良品数合计
    pub good_qty: i64,
    /// 废品数合计
    pub scrap_qty: i64,
    /// 实际占用时间合计（分钟）
    pub run_minutes: f64,
    /// 效率（%，上限 100）
    pub efficiency_pct: f64,
}

// ==========================================
// ReportApi - 报表接口
// ==========================================
pub struct ReportApi {
    production_repo: ProductionRepository,
    downtime_repo: DowntimeRepository,
    calculator: OeeCalculator,
}

impl ReportApi {
    /// 创建报表接口（两个仓储共享一条连接）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let conn = crate::db::open_and_init(db_path)
            .map_err(|e| crate::api::error::ApiError::DatabaseConnectionError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        Ok(Self {
            production_repo: ProductionRepository::from_connection(Arc::clone(&conn)),
            downtime_repo: DowntimeRepository::from_connection(conn),
            calculator: OeeCalculator::new(),
        })
    }

    /// 从已有仓储创建（测试/组合用）
    pub fn from_repositories(
        production_repo: ProductionRepository,
        downtime_repo: DowntimeRepository,
    ) -> Self {
        Self {
            production_repo,
            downtime_repo,
            calculator: OeeCalculator::new(),
        }
    }

    /// 生成 OEE 报告
    ///
    /// # 参数
    /// - work_center: 工段
    /// - from / to: 日期范围（闭区间）
    ///
    /// # 返回
    /// - Ok(OeeReport): 空时间窗返回全零报告
    pub fn oee_report(
        &self,
        work_center: WorkCenter,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<OeeReport> {
        let production = self
            .production_repo
            .find_active_by_range(work_center, from, to)?;
        let downtime = self
            .downtime_repo
            .find_active_by_range(work_center, from, to)?;

        tracing::debug!(
            %work_center,
            %from,
            %to,
            production_count = production.len(),
            downtime_count = downtime.len(),
            "开始OEE核算"
        );

        let report = self.calculator.compute(&production, &downtime)?;
        Ok(report)
    }

    /// 停机帕累托数据（按原因汇总停机分钟数，降序）
    pub fn downtime_pareto(
        &self,
        work_center: WorkCenter,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<Vec<DowntimeParetoEntry>> {
        let downtime = self
            .downtime_repo
            .find_active_by_range(work_center, from, to)?;

        let mut by_reason: HashMap<String, (f64, usize)> = HashMap::new();
        for record in &downtime {
            let entry = by_reason.entry(record.reason.clone()).or_insert((0.0, 0));
            entry.0 += record.duration_minutes();
            entry.1 += 1;
        }

        let mut entries: Vec<DowntimeParetoEntry> = by_reason
            .into_iter()
            .map(|(reason, (total_minutes, event_count))| DowntimeParetoEntry {
                reason,
                total_minutes,
                event_count,
            })
            .collect();

        // 按停机时间降序；同时长按原因名稳定排序
        entries.sort_by(|a, b| {
            b.total_minutes
                .partial_cmp(&a.total_minutes)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.reason.cmp(&b.reason))
        });

        Ok(entries)
    }

    /// 操作工绩效数据（按操作工汇总产量与效率，效率降序）
    pub fn operator_performance(
        &self,
        work_center: WorkCenter,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<Vec<OperatorPerformanceEntry>> {
        let production = self
            .production_repo
            .find_active_by_range(work_center, from, to)?;

        // (良品, 废品, 理论分钟, 实际分钟)
        let mut by_operator: HashMap<String, (i64, i64, f64, f64)> = HashMap::new();
        for record in &production {
            let entry = by_operator
                .entry(record.operator.clone())
                .or_insert((0, 0, 0.0, 0.0));
            entry.0 += record.good_qty;
            entry.1 += record.scrap_qty;
            entry.2 += record.theoretical_minutes();
            entry.3 += record.elapsed_minutes();
        }

        let mut entries: Vec<OperatorPerformanceEntry> = by_operator
            .into_iter()
            .map(|(operator, (good_qty, scrap_qty, theoretical, run_minutes))| {
                // 与整体性能率同口径: 理论/实际，上限 100
                let efficiency_pct = if run_minutes > 0.0 {
                    (theoretical / run_minutes * 100.0).min(100.0)
                } else {
                    0.0
                };
                OperatorPerformanceEntry {
                    operator,
                    good_qty,
                    scrap_qty,
                    run_minutes,
                    efficiency_pct,
                }
            })
            .collect();

        // 效率降序；同效率按操作工名稳定排序
        entries.sort_by(|a, b| {
            b.efficiency_pct
                .partial_cmp(&a.efficiency_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.operator.cmp(&b.operator))
        });

        Ok(entries)
    }
}
