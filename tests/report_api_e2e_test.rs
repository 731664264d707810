// ==========================================
// 报表接口端到端测试
// ==========================================
// 测试目标: 录入 → 入库 → 按(工段, 期间)核算 OEE 的完整链路
// 覆盖范围: 范围过滤 / 软删除过滤 / 停机帕累托
// ==========================================


use chrono::NaiveDate;
use shopfloor_oee::api::{EntryApi, ReportApi};
use shopfloor_oee::domain::types::WorkCenter;
use shopfloor_oee::logging;
use shopfloor_oee::repository::{DowntimeRepository, ProductionRepository};
use test_helpers::{create_downtime_record, create_production_record, create_test_db};

fn march() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    )
}

// ==========================================
// 测试用例 1: 完整链路
// ==========================================

#[test]
fn test_full_entry_to_report_flow() {
    logging::init_test();
    let (_dir, db_path) = create_test_db();

    // 步骤 1: 两阶段录入一条生产 + 一条停机
    let entry = EntryApi::new(&db_path).expect("Failed to create EntryApi");

    let mut production = create_production_record((8, 0), (10, 0), 900, 100);
    production.cycle_seconds = 6.0; // 理论 = 1000×6/60 = 100 分钟
    let pending = entry.review_production(production).unwrap();
    entry.commit(&pending.token).unwrap();

    let downtime = create_downtime_record((10, 0), (10, 30), "Quebra de eixo");
    let pending = entry.review_downtime(downtime).unwrap();
    entry.commit(&pending.token).unwrap();

    // 步骤 2: 报表核算
    let report_api = ReportApi::new(&db_path).expect("Failed to create ReportApi");
    let (from, to) = march();
    let report = report_api.oee_report(WorkCenter::Stamping, from, to).unwrap();

    assert!((report.availability_pct - 80.0).abs() < 1e-9); // 120/150
    assert!((report.quality_pct - 90.0).abs() < 1e-9);
    assert!((report.mttr_minutes - 30.0).abs() < 1e-9);
    assert!((report.oee_pct - 60.0).abs() < 1e-6);
}

// ==========================================
// 测试用例 2: 空期间 → 全零报告
// ==========================================

#[test]
fn test_empty_period_reports_zero() {
    let (_dir, db_path) = create_test_db();
    let report_api = ReportApi::new(&db_path).unwrap();

    let (from, to) = march();
    let report = report_api.oee_report(WorkCenter::Drilling, from, to).unwrap();

    assert_eq!(report.availability_pct, 0.0);
    assert_eq!(report.performance_pct, 0.0);
    assert_eq!(report.quality_pct, 0.0);
    assert_eq!(report.oee_pct, 0.0);
    assert_eq!(report.mttr_minutes, 0.0);
    assert_eq!(report.setup_load_pct, 0.0);
}

// ==========================================
// 测试用例 3: 软删除记录不参与核算
// ==========================================

#[test]
fn test_soft_deleted_records_excluded_from_report() {
    let (_dir, db_path) = create_test_db();

    let production_repo = ProductionRepository::new(&db_path).unwrap();
    let kept = create_production_record((8, 0), (9, 0), 720, 0);
    production_repo.insert(&kept).unwrap();

    // 一条全废品记录被录错后软删除
    let wrong = create_production_record((9, 0), (10, 0), 0, 500);
    let wrong_id = production_repo.insert(&wrong).unwrap();
    production_repo.soft_delete(wrong_id).unwrap();

    let report_api = ReportApi::new(&db_path).unwrap();
    let (from, to) = march();
    let report = report_api.oee_report(WorkCenter::Stamping, from, to).unwrap();

    // 软删除记录不可见: 良品率 100%，不是 720/1220
    assert!((report.quality_pct - 100.0).abs() < 1e-9);
    assert_eq!(report.total_scrap_qty, 0);
}

// ==========================================
// 测试用例 4: 工段隔离
// ==========================================

#[test]
fn test_work_center_scoped_report() {
    let (_dir, db_path) = create_test_db();

    let production_repo = ProductionRepository::new(&db_path).unwrap();
    let stamping = create_production_record((8, 0), (9, 0), 720, 0);
    production_repo.insert(&stamping).unwrap();

    let mut machining = create_production_record((8, 0), (9, 0), 100, 100);
    machining.work_center = WorkCenter::Machining;
    production_repo.insert(&machining).unwrap();

    let report_api = ReportApi::new(&db_path).unwrap();
    let (from, to) = march();

    let stamping_report = report_api.oee_report(WorkCenter::Stamping, from, to).unwrap();
    assert!((stamping_report.quality_pct - 100.0).abs() < 1e-9);

    let machining_report = report_api.oee_report(WorkCenter::Machining, from, to).unwrap();
    assert!((machining_report.quality_pct - 50.0).abs() < 1e-9);
}

// ==========================================
// 测试用例 5: 停机帕累托
// ==========================================

#[test]
fn test_downtime_pareto_ordering() {
    let (_dir, db_path) = create_test_db();

    let downtime_repo = DowntimeRepository::new(&db_path).unwrap();
    // Quebra: 30 + 40 = 70 分钟(2次)；Troca de turno: 15 分钟(1次)
    downtime_repo.insert(&create_downtime_record((9, 0), (9, 30), "Quebra de eixo")).unwrap();
    downtime_repo.insert(&create_downtime_record((14, 0), (14, 40), "Quebra de eixo")).unwrap();
    downtime_repo.insert(&create_downtime_record((12, 0), (12, 15), "Troca de turno")).unwrap();

    let report_api = ReportApi::new(&db_path).unwrap();
    let (from, to) = march();
    let pareto = report_api.downtime_pareto(WorkCenter::Stamping, from, to).unwrap();

    assert_eq!(pareto.len(), 2);
    assert_eq!(pareto[0].reason, "Quebra de eixo");
    assert!((pareto[0].total_minutes - 70.0).abs() < 1e-9);
    assert_eq!(pareto[0].event_count, 2);
    assert_eq!(pareto[1].reason, "Troca de turno");
}

// ==========================================
// 测试用例 6: 操作工绩效
// ==========================================

#[test]
fn test_operator_performance_breakdown() {
    let (_dir, db_path) = create_test_db();

    let production_repo = ProductionRepository::new(&db_path).unwrap();

    // OP-A: 60 分钟产 600 件 @5秒 → 理论 50 分钟 → 效率 83.33%
    let mut fast = create_production_record((8, 0), (9, 0), 590, 10);
    fast.operator = "OP-A".to_string();
    production_repo.insert(&fast).unwrap();

    // OP-B: 两条合计 120 分钟产 720 件 @5秒 → 理论 60 分钟 → 效率 50%
    for (start, end) in [((9, 0), (10, 0)), ((10, 0), (11, 0))] {
        let mut slow = create_production_record(start, end, 360, 0);
        slow.operator = "OP-B".to_string();
        production_repo.insert(&slow).unwrap();
    }

    let report_api = ReportApi::new(&db_path).unwrap();
    let (from, to) = march();
    let entries = report_api.operator_performance(WorkCenter::Stamping, from, to).unwrap();

    assert_eq!(entries.len(), 2);
    // 效率降序
    assert_eq!(entries[0].operator, "OP-A");
    assert!((entries[0].efficiency_pct - 600.0 * 5.0 / 60.0 / 60.0 * 100.0).abs() < 1e-6);
    assert_eq!(entries[0].good_qty, 590);
    assert_eq!(entries[0].scrap_qty, 10);

    assert_eq!(entries[1].operator, "OP-B");
    assert!((entries[1].efficiency_pct - 50.0).abs() < 1e-6);
    assert!((entries[1].run_minutes - 120.0).abs() < 1e-9);
}

#[test]
fn test_operator_performance_efficiency_capped() {
    let (_dir, db_path) = create_test_db();

    let production_repo = ProductionRepository::new(&db_path).unwrap();
    // 理论 100 分钟 > 实际 60 分钟 → 上限 100，口径与整体性能率一致
    let mut over = create_production_record((8, 0), (9, 0), 1200, 0);
    over.cycle_seconds = 5.0;
    production_repo.insert(&over).unwrap();

    let report_api = ReportApi::new(&db_path).unwrap();
    let (from, to) = march();
    let entries = report_api.operator_performance(WorkCenter::Stamping, from, to).unwrap();

    assert_eq!(entries.len(), 1);
    assert!((entries[0].efficiency_pct - 100.0).abs() < 1e-9);
}
