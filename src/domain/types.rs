// ==========================================
// 车间OEE系统 - 领域类型定义
// ==========================================
// 工段划分: 冲压 / 机加 / 钻削
// 基础档案: 操作工 / 机台 / 停机原因 / 工序 / 物料
// ==========================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工段 (Work Center)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkCenter {
    Stamping,  // 冲压
    Machining, // 机加
    Drilling,  // 钻削
}

impl WorkCenter {
    /// 数据库存储形式
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkCenter::Stamping => "STAMPING",
            WorkCenter::Machining => "MACHINING",
            WorkCenter::Drilling => "DRILLING",
        }
    }

    /// 从数据库存储形式解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STAMPING" => Some(WorkCenter::Stamping),
            "MACHINING" => Some(WorkCenter::Machining),
            "DRILLING" => Some(WorkCenter::Drilling),
            _ => None,
        }
    }
}

impl fmt::Display for WorkCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 基础档案类别 (Reference Kind)
// ==========================================
// 对应主管维护的五张基础列表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceKind {
    Operator,   // 操作工
    Machine,    // 机台
    StopReason, // 停机原因
    Operation,  // 工序
    Material,   // 物料
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Operator => "OPERATOR",
            ReferenceKind::Machine => "MACHINE",
            ReferenceKind::StopReason => "STOP_REASON",
            ReferenceKind::Operation => "OPERATION",
            ReferenceKind::Material => "MATERIAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPERATOR" => Some(ReferenceKind::Operator),
            "MACHINE" => Some(ReferenceKind::Machine),
            "STOP_REASON" => Some(ReferenceKind::StopReason),
            "OPERATION" => Some(ReferenceKind::Operation),
            "MATERIAL" => Some(ReferenceKind::Material),
            _ => None,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 跨午夜时间跨度
// ==========================================

/// 计算起止时刻之间的分钟数（跨午夜修正）
///
/// 规则: end < start 视为跨日班次，终点加一天；
/// end == start 返回 0（由校验门拒绝，不在此处判错）
///
/// # 参数
/// - `start`: 开始时刻
/// - `end`: 结束时刻
///
/// # 返回
/// 分钟数（f64，end == start 时为 0）
pub fn span_minutes(start: NaiveTime, end: NaiveTime) -> f64 {
    let seconds = if end < start {
        // 跨午夜: 补一整天
        (end - start).num_seconds() + 24 * 3600
    } else {
        (end - start).num_seconds()
    };
    seconds as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_minutes_same_day() {
        let start = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        let end = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        assert_eq!(span_minutes(start, end), 570.0);
    }

    #[test]
    fn test_span_minutes_cross_midnight() {
        // 23:00 -> 01:00 跨日 = 120 分钟
        let start = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(1, 0, 0).unwrap();
        assert_eq!(span_minutes(start, end), 120.0);
    }

    #[test]
    fn test_span_minutes_zero() {
        let t = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert_eq!(span_minutes(t, t), 0.0);
    }

    #[test]
    fn test_work_center_roundtrip() {
        for wc in [WorkCenter::Stamping, WorkCenter::Machining, WorkCenter::Drilling] {
            assert_eq!(WorkCenter::parse(wc.as_str()), Some(wc));
        }
        assert_eq!(WorkCenter::parse("WELDING"), None);
    }
}
