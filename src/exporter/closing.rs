// ==========================================
// 车间OEE系统 - 期末结账导出
// ==========================================
// 职责: 将选定期间的原始台账（非核算结果）导出为表格文件，
//       每个记录类别一个文件:
//       producao        - 生产台账
//       paradas         - 停机台账
//       manutencao      - 维修台账
//       resumo_operador - 按操作工汇总的良品/废品合计
// 消费的是原始记录，OEE 指标由报表接口另行输出
// ==========================================

use crate::domain::downtime::DowntimeRecord;
use crate::domain::maintenance::MaintenanceRecord;
use crate::domain::production::ProductionRecord;
use crate::domain::types::WorkCenter;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ==========================================
// 错误类型
// ==========================================

/// 导出错误
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("导出目录创建失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("表格写入失败: {0}")]
    Csv(#[from] csv::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

// ==========================================
// 导出结果
// ==========================================

/// 期末结账导出结果（写出的文件清单）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingExportResult {
    /// 生产台账文件
    pub production_file: PathBuf,
    /// 停机台账文件
    pub downtime_file: PathBuf,
    /// 维修台账文件
    pub maintenance_file: PathBuf,
    /// 操作工汇总文件
    pub operator_summary_file: PathBuf,
    /// 导出的生产记录数
    pub production_rows: usize,
    /// 导出的停机记录数
    pub downtime_rows: usize,
    /// 导出的维修记录数
    pub maintenance_rows: usize,
}

/// 操作工汇总行
#[derive(Debug, Clone, Serialize)]
struct OperatorSummaryRow {
    operator: String,
    good_qty: i64,
    scrap_qty: i64,
}

// ==========================================
// ClosingExporter - 期末结账导出器
// ==========================================
pub struct ClosingExporter {
    export_dir: PathBuf,
}

impl ClosingExporter {
    /// 构造函数
    ///
    /// # 参数
    /// - export_dir: 导出目录（不存在时自动创建）
    pub fn new(export_dir: impl AsRef<Path>) -> Self {
        Self {
            export_dir: export_dir.as_ref().to_path_buf(),
        }
    }

    /// 导出期末结账
    ///
    /// # 参数
    /// - work_center: 工段（用于文件命名）
    /// - from / to: 结账期间（用于文件命名）
    /// - production / downtime / maintenance: 调用方查出的原始有效记录
    ///
    /// # 返回
    /// - Ok(ClosingExportResult): 写出的文件清单与行数
    pub fn export_period(
        &self,
        work_center: WorkCenter,
        from: NaiveDate,
        to: NaiveDate,
        production: &[ProductionRecord],
        downtime: &[DowntimeRecord],
        maintenance: &[MaintenanceRecord],
    ) -> ExportResult<ClosingExportResult> {
        std::fs::create_dir_all(&self.export_dir)?;

        let prefix = format!(
            "fechamento_{}_{}_{}",
            work_center.as_str().to_lowercase(),
            from.format("%Y%m%d"),
            to.format("%Y%m%d")
        );

        // 1. 生产台账
        let production_file = self.export_dir.join(format!("{}_producao.csv", prefix));
        {
            let mut writer = csv::Writer::from_path(&production_file)?;
            for record in production {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        // 2. 停机台账
        let downtime_file = self.export_dir.join(format!("{}_paradas.csv", prefix));
        {
            let mut writer = csv::Writer::from_path(&downtime_file)?;
            for record in downtime {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        // 3. 维修台账
        let maintenance_file = self.export_dir.join(format!("{}_manutencao.csv", prefix));
        {
            let mut writer = csv::Writer::from_path(&maintenance_file)?;
            for record in maintenance {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        // 4. 操作工汇总（BTreeMap 保证输出顺序稳定）
        let operator_summary_file = self
            .export_dir
            .join(format!("{}_resumo_operador.csv", prefix));
        {
            let mut by_operator: BTreeMap<String, (i64, i64)> = BTreeMap::new();
            for record in production {
                let entry = by_operator.entry(record.operator.clone()).or_insert((0, 0));
                entry.0 += record.good_qty;
                entry.1 += record.scrap_qty;
            }

            let mut writer = csv::Writer::from_path(&operator_summary_file)?;
            for (operator, (good_qty, scrap_qty)) in by_operator {
                writer.serialize(OperatorSummaryRow {
                    operator,
                    good_qty,
                    scrap_qty,
                })?;
            }
            writer.flush()?;
        }

        tracing::info!(
            %work_center,
            %from,
            %to,
            production_rows = production.len(),
            downtime_rows = downtime.len(),
            maintenance_rows = maintenance.len(),
            "期末结账导出完成"
        );

        Ok(ClosingExportResult {
            production_file,
            downtime_file,
            maintenance_file,
            operator_summary_file,
            production_rows: production.len(),
            downtime_rows: downtime.len(),
            maintenance_rows: maintenance.len(),
        })
    }
}
