// ==========================================
// 车间OEE系统 - 基础档案仓储
// ==========================================
// 主管维护的下拉列表: 操作工/机台/停机原因/工序/物料
// 约定:
// - 名称入库前 trim + 大写
// - 同名重新添加时恢复软删除条目（回收站找回），不新建
// ==========================================

use crate::domain::reference::ReferenceItem;
use crate::domain::types::{ReferenceKind, WorkCenter};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// ReferenceRepository - 基础档案仓储
// ==========================================

/// 基础档案仓储
/// 职责: 管理 reference_item 表的添加/查询/软删除
pub struct ReferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReferenceRepository {
    /// 创建新的仓储实例（打开连接并初始化表结构）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 添加档案条目
    ///
    /// 行为:
    /// - 名称规范化（trim + 大写）后查重
    /// - 已存在且有效 → UniqueConstraintViolation
    /// - 已存在但被软删除 → 恢复（active 置 1）
    /// - 不存在 → 新建
    ///
    /// # 返回
    /// - Ok(ReferenceItem): 新建或恢复后的条目
    pub fn add(
        &self,
        work_center: WorkCenter,
        kind: ReferenceKind,
        name: &str,
    ) -> RepositoryResult<ReferenceItem> {
        let normalized = name.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "name".to_string(),
                message: "名称不能为空".to_string(),
            });
        }

        let conn = self.get_conn()?;

        // 查重（含软删除条目）
        let existing: Option<(i64, i64)> = conn
            .query_row(
                r#"
                SELECT id, active FROM reference_item
                WHERE work_center = ?1 AND kind = ?2 AND name = ?3
                "#,
                params![work_center.as_str(), kind.as_str(), normalized],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let id = match existing {
            Some((_, 1)) => {
                return Err(RepositoryError::UniqueConstraintViolation(format!(
                    "{}/{} 已存在: {}",
                    work_center, kind, normalized
                )));
            }
            Some((id, _)) => {
                // 回收站找回
                conn.execute(
                    "UPDATE reference_item SET active = 1 WHERE id = ?1",
                    params![id],
                )?;
                tracing::info!(%work_center, %kind, name = %normalized, "软删除档案条目已恢复");
                id
            }
            None => {
                conn.execute(
                    r#"
                    INSERT INTO reference_item (work_center, kind, name, active)
                    VALUES (?1, ?2, ?3, 1)
                    "#,
                    params![work_center.as_str(), kind.as_str(), normalized],
                )?;
                conn.last_insert_rowid()
            }
        };

        Ok(ReferenceItem {
            id: Some(id),
            work_center,
            kind,
            name: normalized,
            active: true,
        })
    }

    /// 某工段某类别的有效条目名称列表（下拉列表数据源，按名称排序）
    pub fn list_active(
        &self,
        work_center: WorkCenter,
        kind: ReferenceKind,
    ) -> RepositoryResult<Vec<ReferenceItem>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, work_center, kind, name, active
            FROM reference_item
            WHERE work_center = ?1 AND kind = ?2 AND active = 1
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map(params![work_center.as_str(), kind.as_str()], |row| {
            let wc_str: String = row.get(1)?;
            let kind_str: String = row.get(2)?;
            Ok((
                row.get::<_, i64>(0)?,
                wc_str,
                kind_str,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, wc_str, kind_str, name, active) = row?;
            let work_center =
                WorkCenter::parse(&wc_str).ok_or_else(|| RepositoryError::FieldValueError {
                    field: "work_center".to_string(),
                    message: format!("未知工段: {}", wc_str),
                })?;
            let kind =
                ReferenceKind::parse(&kind_str).ok_or_else(|| RepositoryError::FieldValueError {
                    field: "kind".to_string(),
                    message: format!("未知档案类别: {}", kind_str),
                })?;
            items.push(ReferenceItem {
                id: Some(id),
                work_center,
                kind,
                name,
                active: active != 0,
            });
        }
        Ok(items)
    }

    /// 软删除（active 置 0）
    pub fn soft_delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE reference_item SET active = 0 WHERE id = ?1 AND active = 1",
            params![id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ReferenceItem".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
