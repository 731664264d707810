// ==========================================
// 车间OEE系统 - 停机台账实体
// ==========================================
// 一条记录 = 一次停机事件
// 故障判定: 原因文本命中故障关键字即计入 MTTR
// ==========================================

use crate::domain::types::{span_minutes, WorkCenter};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// 故障关键字
// ==========================================
// 停机原因目录沿用巴西工厂的葡语词表；
// 命中任一关键字（不区分大小写）即判定为故障事件
pub const FAILURE_TOKENS: [&str; 3] = ["QUEBRA", "PANE", "MANUTENÇÃO"];

// ==========================================
// DowntimeRecord - 停机台账记录
// ==========================================

/// 停机台账记录
///
/// 生命周期与生产台账一致: 创建后只能软删除，核算只读取 active 记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeRecord {
    /// 数据库主键（未持久化时为 None）
    pub id: Option<i64>,
    /// 工段
    pub work_center: WorkCenter,
    /// 停机日期
    pub work_date: NaiveDate,
    /// 开始时刻
    pub start_time: NaiveTime,
    /// 结束时刻（早于开始时刻表示跨午夜）
    pub end_time: NaiveTime,
    /// 停机原因（基础档案枚举或自由文本）
    pub reason: String,
    /// 机台
    pub machine: String,
    /// 备注
    pub note: Option<String>,
    /// 软删除标志
    pub active: bool,
}

impl DowntimeRecord {
    /// 停机时长（分钟，跨午夜修正）
    pub fn duration_minutes(&self) -> f64 {
        span_minutes(self.start_time, self.end_time)
    }

    /// 是否为故障事件（计入 MTTR）
    ///
    /// 判定: 原因文本大写化后包含任一故障关键字
    pub fn is_failure_event(&self) -> bool {
        let upper = self.reason.to_uppercase();
        FAILURE_TOKENS.iter().any(|token| upper.contains(token))
    }
}
