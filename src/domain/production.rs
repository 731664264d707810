// ==========================================
// 车间OEE系统 - 生产台账实体
// ==========================================
// 一条记录 = 一个班次/批次的生产录入
// 跨午夜规则: end_time < start_time 视为次日结束
// ==========================================

use crate::domain::types::{span_minutes, WorkCenter};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionRecord - 生产台账记录
// ==========================================

/// 生产台账记录
///
/// 生命周期: 录入端创建后不再修改，只能软删除（active 置 0）；
/// OEE 核算只读取 active 记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// 数据库主键（未持久化时为 None）
    pub id: Option<i64>,
    /// 工段
    pub work_center: WorkCenter,
    /// 生产日期
    pub work_date: NaiveDate,
    /// 开始时刻
    pub start_time: NaiveTime,
    /// 结束时刻（早于开始时刻表示跨午夜）
    pub end_time: NaiveTime,
    /// 标准节拍（秒/件，额定速度）
    pub cycle_seconds: f64,
    /// 良品数
    pub good_qty: i64,
    /// 废品数
    pub scrap_qty: i64,
    /// 换型/调机时间（分钟，计入实际占用时间，不计入理论生产时间）
    pub setup_minutes: f64,
    /// 机台
    pub machine: String,
    /// 操作工
    pub operator: String,
    /// 客户
    pub customer: Option<String>,
    /// 产品/零件描述
    pub product: Option<String>,
    /// 工序
    pub operation: Option<String>,
    /// 物料
    pub material: Option<String>,
    /// 软删除标志
    pub active: bool,
}

impl ProductionRecord {
    /// 实际占用时间（分钟，跨午夜修正）
    pub fn elapsed_minutes(&self) -> f64 {
        span_minutes(self.start_time, self.end_time)
    }

    /// 理论生产时间（分钟）= 总件数 × 标准节拍 / 60
    pub fn theoretical_minutes(&self) -> f64 {
        (self.good_qty + self.scrap_qty) as f64 * self.cycle_seconds / 60.0
    }

    /// 总件数（良品 + 废品）
    pub fn total_qty(&self) -> i64 {
        self.good_qty + self.scrap_qty
    }

    /// 实际节拍（秒/件），总件数为 0 时返回 0
    ///
    /// 录入确认页展示用指标
    pub fn actual_cycle_seconds(&self) -> f64 {
        let total = self.total_qty();
        if total > 0 {
            self.elapsed_minutes() * 60.0 / total as f64
        } else {
            0.0
        }
    }
}
