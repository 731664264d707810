// ==========================================
// 车间OEE系统 - 维修台账与机台时数仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 维修台账: 与生产/停机台账同构（插入/范围查询/软删除）
// 机台时数: (工段, 机台) 主键 upsert，生产入库时累加、保养时清零
// ==========================================

use crate::domain::maintenance::{MachineMeter, MaintenanceRecord, MaintenanceType};
use crate::domain::types::WorkCenter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// MaintenanceRepository - 维修台账仓储
// ==========================================

/// 维修台账仓储
/// 职责: 管理 maintenance_log 表的插入/查询/软删除
pub struct MaintenanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceRepository {
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

    /// 插入一条维修记录
    ///
    /// # 返回
    /// - Ok(i64): 新记录的数据库主键
    pub fn insert(&self, record: &MaintenanceRecord) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO maintenance_log (
                work_center, maint_date, machine, maint_type,
                technician, description, active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
            "#,
            params![
                record.work_center.as_str(),
                record.maint_date,
                record.machine,
                record.maint_type.as_str(),
                record.technician,
                record.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按工段和日期范围查询有效记录（结账导出的数据来源）
    pub fn find_active_by_range(
        &self,
        work_center: WorkCenter,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<MaintenanceRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, work_center, maint_date, machine, maint_type,
                technician, description, active
            FROM maintenance_log
            WHERE work_center = ?1
              AND maint_date BETWEEN ?2 AND ?3
              AND active = 1
            ORDER BY maint_date, id
            "#,
        )?;

        let rows = stmt.query_map(params![work_center.as_str(), from, to], Self::map_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// 软删除（active 置 0）
    pub fn soft_delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE maintenance_log SET active = 0 WHERE id = ?1 AND active = 1",
            params![id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MaintenanceRecord".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 行映射
    // ==========================================

    fn map_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceRecord> {
        let wc_str: String = row.get(1)?;
        let work_center = WorkCenter::parse(&wc_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("未知工段: {}", wc_str).into(),
            )
        })?;

        let mt_str: String = row.get(4)?;
        let maint_type = MaintenanceType::parse(&mt_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("未知维修类型: {}", mt_str).into(),
            )
        })?;

        Ok(MaintenanceRecord {
            id: Some(row.get(0)?),
            work_center,
            maint_date: row.get(2)?,
            machine: row.get(3)?,
            maint_type,
            technician: row.get(5)?,
            description: row.get(6)?,
            active: row.get::<_, i64>(7)? != 0,
        })
    }
}

// ==========================================
// MachineMeterRepository - 机台时数仓储
// ==========================================

/// 机台时数仓储
/// 职责: 管理 machine_meter 表的累加/清零/目标设定/查询
pub struct MachineMeterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineMeterRepository {
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

    /// 累加机台运行小时（无记录时自动建行）
    ///
    /// # 参数
    /// - hours: 本次生产实际占用小时数
    pub fn accumulate(
        &self,
        work_center: WorkCenter,
        machine: &str,
        hours: f64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO machine_meter (work_center, machine, total_hours, target_hours)
            VALUES (?1, ?2, ?3, 0)
            ON CONFLICT (work_center, machine)
            DO UPDATE SET total_hours = total_hours + excluded.total_hours
            "#,
            params![work_center.as_str(), machine, hours],
        )?;
        Ok(())
    }

    /// 设定保养目标小时（无记录时自动建行）
    pub fn set_target(
        &self,
        work_center: WorkCenter,
        machine: &str,
        target_hours: f64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO machine_meter (work_center, machine, total_hours, target_hours)
            VALUES (?1, ?2, 0, ?3)
            ON CONFLICT (work_center, machine)
            DO UPDATE SET target_hours = excluded.target_hours
            "#,
            params![work_center.as_str(), machine, target_hours],
        )?;
        Ok(())
    }

    /// 累计时数清零（保养完成）
    ///
    /// # 返回
    /// - Err(NotFound): 该机台无时数记录
    pub fn reset(&self, work_center: WorkCenter, machine: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE machine_meter SET total_hours = 0 WHERE work_center = ?1 AND machine = ?2",
            params![work_center.as_str(), machine],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MachineMeter".to_string(),
                id: format!("{}/{}", work_center.as_str(), machine),
            });
        }
        Ok(())
    }

    /// 按工段查询全部机台时数（保养状态页）
    pub fn list(&self, work_center: WorkCenter) -> RepositoryResult<Vec<MachineMeter>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT work_center, machine, total_hours, target_hours
            FROM machine_meter
            WHERE work_center = ?1
            ORDER BY machine
            "#,
        )?;

        let rows = stmt.query_map(params![work_center.as_str()], Self::map_row)?;

        let mut meters = Vec::new();
        for row in rows {
            meters.push(row?);
        }
        Ok(meters)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<MachineMeter> {
        let wc_str: String = row.get(0)?;
        let work_center = WorkCenter::parse(&wc_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("未知工段: {}", wc_str).into(),
            )
        })?;

        Ok(MachineMeter {
            work_center,
            machine: row.get(1)?,
            total_hours: row.get(2)?,
            target_hours: row.get(3)?,
        })
    }
}
