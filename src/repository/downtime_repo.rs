// ==========================================
// 车间OEE系统 - 停机台账仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 软删除约定: 查询一律只取 active=1
// ==========================================

use crate::domain::downtime::DowntimeRecord;
use crate::domain::types::WorkCenter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// DowntimeRepository - 停机台账仓储
// ==========================================

/// 停机台账仓储
/// 职责: 管理 downtime_log 表的插入/查询/软删除
pub struct DowntimeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DowntimeRepository {
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

    /// 插入一条停机记录
    pub fn insert(&self, record: &DowntimeRecord) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO downtime_log (
                work_center, work_date, start_time, end_time,
                reason, machine, note, active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)
            "#,
            params![
                record.work_center.as_str(),
                record.work_date,
                record.start_time,
                record.end_time,
                record.reason,
                record.machine,
                record.note,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按工段和日期范围查询有效记录（OEE 核算的数据来源）
    pub fn find_active_by_range(
        &self,
        work_center: WorkCenter,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<DowntimeRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, work_center, work_date, start_time, end_time,
                reason, machine, note, active
            FROM downtime_log
            WHERE work_center = ?1
              AND work_date BETWEEN ?2 AND ?3
              AND active = 1
            ORDER BY work_date, start_time
            "#,
        )?;

        let rows = stmt.query_map(params![work_center.as_str(), from, to], Self::map_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// 某一天的有效停机记录（录入页"当日停机"面板）
    pub fn find_active_by_date(
        &self,
        work_center: WorkCenter,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<DowntimeRecord>> {
        self.find_active_by_range(work_center, date, date)
    }

    /// 软删除（active 置 0）
    pub fn soft_delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE downtime_log SET active = 0 WHERE id = ?1 AND active = 1",
            params![id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "DowntimeRecord".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 行映射
    // ==========================================

    fn map_row(row: &Row<'_>) -> rusqlite::Result<DowntimeRecord> {
        let wc_str: String = row.get(1)?;
        let work_center = WorkCenter::parse(&wc_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("未知工段: {}", wc_str).into(),
            )
        })?;

        Ok(DowntimeRecord {
            id: Some(row.get(0)?),
            work_center,
            work_date: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            reason: row.get(5)?,
            machine: row.get(6)?,
            note: row.get(7)?,
            active: row.get::<_, i64>(8)? != 0,
        })
    }
}
