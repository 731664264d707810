// ==========================================
// 车间OEE系统 - 维修档案实体
// ==========================================
// 维修台账: 预防性/纠正性维修记录（日期/机台/技师/内容）
// 机台时数表: 累计运行小时 vs 保养目标，超标即提示保养到期
// ==========================================

use crate::domain::types::WorkCenter;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 维修类型 (Maintenance Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceType {
    Preventive, // 预防性
    Corrective, // 纠正性
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "PREVENTIVE",
            MaintenanceType::Corrective => "CORRECTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PREVENTIVE" => Some(MaintenanceType::Preventive),
            "CORRECTIVE" => Some(MaintenanceType::Corrective),
            _ => None,
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// MaintenanceRecord - 维修台账记录
// ==========================================

/// 维修台账记录
///
/// 生命周期与其他台账一致: 创建后只能软删除；
/// 登记时可选择将机台时数表清零（保养完成）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// 数据库主键（未持久化时为 None）
    pub id: Option<i64>,
    /// 工段
    pub work_center: WorkCenter,
    /// 维修日期
    pub maint_date: NaiveDate,
    /// 机台
    pub machine: String,
    /// 维修类型
    pub maint_type: MaintenanceType,
    /// 技师
    pub technician: String,
    /// 更换件/作业内容
    pub description: Option<String>,
    /// 软删除标志
    pub active: bool,
}

// ==========================================
// MachineMeter - 机台时数表
// ==========================================

/// 机台时数表（保养状态页数据）
///
/// 生产记录入库时按实际占用小时累加；保养登记可清零
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineMeter {
    /// 工段
    pub work_center: WorkCenter,
    /// 机台
    pub machine: String,
    /// 累计运行小时
    pub total_hours: f64,
    /// 保养目标小时
    pub target_hours: f64,
}

impl MachineMeter {
    /// 时数利用比（目标为 0 时返回 0，不报 NaN）
    pub fn usage_ratio(&self) -> f64 {
        if self.target_hours > 0.0 {
            self.total_hours / self.target_hours
        } else {
            0.0
        }
    }

    /// 保养是否到期（累计时数达到目标）
    pub fn maintenance_due(&self) -> bool {
        self.target_hours > 0.0 && self.total_hours >= self.target_hours
    }
}
