// ==========================================
// 车间OEE系统 - 生产台账仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 软删除约定: 查询一律只取 active=1（软删除即过滤）
// ==========================================

use crate::domain::production::ProductionRecord;
use crate::domain::types::WorkCenter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductionRepository - 生产台账仓储
// ==========================================

/// 生产台账仓储
/// 职责: 管理 production_log 表的插入/查询/软删除
pub struct ProductionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRepository {
    /// 创建新的仓储实例（打开连接并初始化表结构）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入一条生产记录
    ///
    /// # 返回
    /// - Ok(i64): 新记录的数据库主键
    pub fn insert(&self, record: &ProductionRecord) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO production_log (
                work_center, work_date, start_time, end_time,
                cycle_seconds, good_qty, scrap_qty, setup_minutes,
                machine, operator, customer, product, operation, material, active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 1)
            "#,
            params![
                record.work_center.as_str(),
                record.work_date,
                record.start_time,
                record.end_time,
                record.cycle_seconds,
                record.good_qty,
                record.scrap_qty,
                record.setup_minutes,
                record.machine,
                record.operator,
                record.customer,
                record.product,
                record.operation,
                record.material,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按工段和日期范围查询有效记录（OEE 核算的数据来源）
    ///
    /// # 参数
    /// - work_center: 工段
    /// - from / to: 日期范围（闭区间）
    pub fn find_active_by_range(
        &self,
        work_center: WorkCenter,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, work_center, work_date, start_time, end_time,
                cycle_seconds, good_qty, scrap_qty, setup_minutes,
                machine, operator, customer, product, operation, material, active
            FROM production_log
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

    /// 最近 N 条有效记录（录入页"最近记录"面板）
    pub fn list_recent(
        &self,
        work_center: WorkCenter,
        limit: usize,
    ) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, work_center, work_date, start_time, end_time,
                cycle_seconds, good_qty, scrap_qty, setup_minutes,
                machine, operator, customer, product, operation, material, active
            FROM production_log
            WHERE work_center = ?1 AND active = 1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![work_center.as_str(), limit as i64], Self::map_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// 软删除（active 置 0）
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在或已删除
    pub fn soft_delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE production_log SET active = 0 WHERE id = ?1 AND active = 1",
            params![id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ProductionRecord".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 行映射
    // ==========================================

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ProductionRecord> {
        let wc_str: String = row.get(1)?;
        let work_center = WorkCenter::parse(&wc_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("未知工段: {}", wc_str).into(),
            )
        })?;

        Ok(ProductionRecord {
            id: Some(row.get(0)?),
            work_center,
            work_date: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            cycle_seconds: row.get(5)?,
            good_qty: row.get(6)?,
            scrap_qty: row.get(7)?,
            setup_minutes: row.get(8)?,
            machine: row.get(9)?,
            operator: row.get(10)?,
            customer: row.get(11)?,
            product: row.get(12)?,
            operation: row.get(13)?,
            material: row.get(14)?,
            active: row.get::<_, i64>(15)? != 0,
        })
    }
}
