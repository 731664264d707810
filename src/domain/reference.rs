// ==========================================
// 车间OEE系统 - 基础档案实体
// ==========================================
// 主管维护的下拉列表: 操作工/机台/停机原因/工序/物料
// ==========================================

use crate::domain::types::{ReferenceKind, WorkCenter};
use serde::{Deserialize, Serialize};

/// 基础档案条目
///
/// 名称入库前统一 trim + 大写；同名重新添加时恢复软删除条目而非新建
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    /// 数据库主键（未持久化时为 None）
    pub id: Option<i64>,
    /// 所属工段
    pub work_center: WorkCenter,
    /// 档案类别
    pub kind: ReferenceKind,
    /// 名称（已规范化）
    pub name: String,
    /// 软删除标志
    pub active: bool,
}
