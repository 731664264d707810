// ==========================================
// 车间OEE系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一建表语句，保证测试库与正式库结构一致
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库表结构（幂等，可重复执行）
///
/// 表清单:
/// - production_log: 生产台账（按工段）
/// - downtime_log:   停机台账（按工段）
/// - reference_item: 基础档案（操作工/机台/停机原因/工序/物料）
/// - maintenance_log: 维修台账（按工段）
/// - machine_meter:  机台时数表（累计运行小时 vs 保养目标）
///
/// 软删除约定: active=1 有效, active=0 已删除；查询层只取 active=1
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS production_log (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            work_center     TEXT NOT NULL,
            work_date       TEXT NOT NULL,
            start_time      TEXT NOT NULL,
            end_time        TEXT NOT NULL,
            cycle_seconds   REAL NOT NULL,
            good_qty        INTEGER NOT NULL,
            scrap_qty       INTEGER NOT NULL,
            setup_minutes   REAL NOT NULL DEFAULT 0,
            machine         TEXT NOT NULL,
            operator        TEXT NOT NULL,
            customer        TEXT,
            product         TEXT,
            operation       TEXT,
            material        TEXT,
            active          INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_production_log_wc_date
            ON production_log (work_center, work_date);

        CREATE TABLE IF NOT EXISTS downtime_log (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            work_center     TEXT NOT NULL,
            work_date       TEXT NOT NULL,
            start_time      TEXT NOT NULL,
            end_time        TEXT NOT NULL,
            reason          TEXT NOT NULL,
            machine         TEXT NOT NULL,
            note            TEXT,
            active          INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_downtime_log_wc_date
            ON downtime_log (work_center, work_date);

        CREATE TABLE IF NOT EXISTS reference_item (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            work_center     TEXT NOT NULL,
            kind            TEXT NOT NULL,
            name            TEXT NOT NULL,
            active          INTEGER NOT NULL DEFAULT 1,
            UNIQUE (work_center, kind, name)
        );

        CREATE TABLE IF NOT EXISTS maintenance_log (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            work_center     TEXT NOT NULL,
            maint_date      TEXT NOT NULL,
            machine         TEXT NOT NULL,
            maint_type      TEXT NOT NULL,
            technician      TEXT NOT NULL,
            description     TEXT,
            active          INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_maintenance_log_wc_date
            ON maintenance_log (work_center, maint_date);

        CREATE TABLE IF NOT EXISTS machine_meter (
            work_center     TEXT NOT NULL,
            machine         TEXT NOT NULL,
            total_hours     REAL NOT NULL DEFAULT 0,
            target_hours    REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (work_center, machine)
        );
        "#,
    )?;
    Ok(())
}

/// 打开连接 + 应用 PRAGMA + 初始化表结构，一步到位
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}
