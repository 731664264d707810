// ==========================================
// OeeCalculator 引擎测试
// ==========================================
// 测试目标: 验证 OEE 核算口径与边界规则
// 覆盖范围: 三率/OEE乘积/MTTR/换型负荷/零分母/封顶/跨午夜/畸形记录
// ==========================================


use shopfloor_oee::engine::{EngineError, OeeCalculator};
use test_helpers::{create_downtime_record, create_production_record};

// ==========================================
// 测试用例 1: 空输入 → 全零报告
// ==========================================

#[test]
fn test_empty_inputs_yield_zero_report() {
    let calculator = OeeCalculator::new();

    let report = calculator.compute(&[], &[]).expect("空输入是合法输入");

    assert_eq!(report.availability_pct, 0.0);
    assert_eq!(report.performance_pct, 0.0);
    assert_eq!(report.quality_pct, 0.0);
    assert_eq!(report.oee_pct, 0.0);
    assert_eq!(report.mttr_minutes, 0.0);
    assert_eq!(report.setup_load_pct, 0.0);
    assert_eq!(report.failure_event_count, 0);
}

// ==========================================
// 测试用例 2: 理想班次 → 三率均为 100
// ==========================================

#[test]
fn test_perfect_run_scores_100() {
    let calculator = OeeCalculator::new();

    // 60 分钟 × 节拍5秒 = 恰好 720 件，无废品、无停机
    let record = create_production_record((8, 0), (9, 0), 720, 0);
    let report = calculator.compute(&[record], &[]).unwrap();

    assert!((report.availability_pct - 100.0).abs() < 1e-9);
    assert!((report.performance_pct - 100.0).abs() < 1e-9);
    assert!((report.quality_pct - 100.0).abs() < 1e-9);
    assert!((report.oee_pct - 100.0).abs() < 1e-9);
}

// ==========================================
// 测试用例 3: 综合场景 三率与乘积
// ==========================================

#[test]
fn test_combined_scenario() {
    let calculator = OeeCalculator::new();

    // 生产: 08:00-10:00 = 120 分钟, 节拍6秒, 良品900 废品100
    // 理论 = 1000 × 6 / 60 = 100 分钟
    let mut record = create_production_record((8, 0), (10, 0), 900, 100);
    record.cycle_seconds = 6.0;

    // 停机: 30 分钟故障
    let downtime = create_downtime_record((10, 0), (10, 30), "Quebra de eixo");

    let report = calculator.compute(&[record], &[downtime]).unwrap();

    // 时间开动率 = 120 / 150 = 80%
    assert!((report.availability_pct - 80.0).abs() < 1e-9);
    // 性能稼动率 = 100 / 120 = 83.33..%
    assert!((report.performance_pct - 100.0 / 120.0 * 100.0).abs() < 1e-9);
    // 良品率 = 900 / 1000 = 90%
    assert!((report.quality_pct - 90.0).abs() < 1e-9);
    // OEE = 0.8 × 0.8333.. × 0.9 × 100 = 60%
    assert!((report.oee_pct - 60.0).abs() < 1e-9);
    // MTTR: 唯一一次故障 30 分钟
    assert!((report.mttr_minutes - 30.0).abs() < 1e-9);
}

// ==========================================
// 测试用例 4: OEE 恒等于三率乘积
// ==========================================

#[test]
fn test_oee_equals_product_of_factors() {
    let calculator = OeeCalculator::new();

    let mut r1 = create_production_record((7, 30), (12, 0), 1500, 120);
    r1.cycle_seconds = 8.0;
    r1.setup_minutes = 20.0;
    let mut r2 = create_production_record((13, 0), (17, 45), 2000, 55);
    r2.cycle_seconds = 7.5;

    let d1 = create_downtime_record((9, 0), (9, 40), "PANE elétrica");
    let d2 = create_downtime_record((14, 0), (14, 10), "Troca de turno");

    let report = calculator.compute(&[r1, r2], &[d1, d2]).unwrap();

    let expected = report.availability_pct * report.performance_pct * report.quality_pct / 10000.0;
    assert!((report.oee_pct - expected).abs() < 1e-9);

    // 所有百分比指标落在 [0, 100]
    for value in [
        report.availability_pct,
        report.performance_pct,
        report.quality_pct,
        report.oee_pct,
        report.setup_load_pct,
    ] {
        assert!((0.0..=100.0).contains(&value), "指标越界: {}", value);
    }
    assert!(report.mttr_minutes >= 0.0);
}

// ==========================================
// 测试用例 5: 性能稼动率封顶 100
// ==========================================

#[test]
fn test_performance_clamped_at_100() {
    let calculator = OeeCalculator::new();

    // 60 分钟生产 720 件但节拍标定 10 秒 → 理论 120 分钟 > 实际 60 分钟
    let mut record = create_production_record((8, 0), (9, 0), 720, 0);
    record.cycle_seconds = 10.0;

    let report = calculator.compute(&[record], &[]).unwrap();

    // 快于标准节拍不得超报
    assert!((report.performance_pct - 100.0).abs() < 1e-9);
    assert!(report.oee_pct <= 100.0);
}

// ==========================================
// 测试用例 6: 良品率 90/10
// ==========================================

#[test]
fn test_quality_90_over_10() {
    let calculator = OeeCalculator::new();

    let record = create_production_record((8, 0), (9, 0), 90, 10);
    let report = calculator.compute(&[record], &[]).unwrap();

    assert!((report.quality_pct - 90.0).abs() < 1e-9);
}

// ==========================================
// 测试用例 7: MTTR 只统计故障事件
// ==========================================

#[test]
fn test_mttr_counts_only_failure_events() {
    let calculator = OeeCalculator::new();

    let record = create_production_record((8, 0), (16, 0), 1000, 0);

    // 30 分钟故障 + 15 分钟换班: 只有前者计入 MTTR
    let d1 = create_downtime_record((10, 0), (10, 30), "Quebra de eixo");
    let d2 = create_downtime_record((12, 0), (12, 15), "Troca de turno");

    let report = calculator.compute(&[record], &[d1, d2]).unwrap();

    assert_eq!(report.failure_event_count, 1);
    assert!((report.mttr_minutes - 30.0).abs() < 1e-9);
    // 停机合计仍然是 45 分钟（时间开动率口径不分故障与否）
    assert!((report.total_downtime_minutes - 45.0).abs() < 1e-9);
}

// ==========================================
// 测试用例 8: 跨午夜班次
// ==========================================

#[test]
fn test_cross_midnight_shift() {
    let calculator = OeeCalculator::new();

    // 23:00 → 01:00(次日) = 120 分钟，不得为负
    let record = create_production_record((23, 0), (1, 0), 600, 0);
    let report = calculator.compute(&[record], &[]).unwrap();

    assert!((report.total_run_minutes - 120.0).abs() < 1e-9);
    assert!(report.availability_pct >= 0.0);
}

// ==========================================
// 测试用例 9: 换型负荷
// ==========================================

#[test]
fn test_setup_load() {
    let calculator = OeeCalculator::new();

    // 120 分钟班次中换型 30 分钟 → 25%
    let mut record = create_production_record((8, 0), (10, 0), 500, 0);
    record.setup_minutes = 30.0;

    let report = calculator.compute(&[record], &[]).unwrap();
    assert!((report.setup_load_pct - 25.0).abs() < 1e-9);
}

// ==========================================
// 测试用例 10: 畸形记录 → MalformedRecord
// ==========================================

#[test]
fn test_malformed_production_zero_elapsed() {
    let calculator = OeeCalculator::new();

    // 起止同刻: 校验门之外的最后防线
    let record = create_production_record((8, 0), (8, 0), 100, 0);
    let result = calculator.compute(&[record], &[]);

    match result {
        Err(EngineError::MalformedRecord { record_kind, .. }) => {
            assert_eq!(record_kind, "PRODUCTION");
        }
        other => panic!("Expected MalformedRecord, got {:?}", other.map(|r| r.oee_pct)),
    }
}

#[test]
fn test_malformed_production_zero_quantity() {
    let calculator = OeeCalculator::new();

    let record = create_production_record((8, 0), (9, 0), 0, 0);
    let result = calculator.compute(&[record], &[]);
    assert!(matches!(
        result,
        Err(EngineError::MalformedRecord {
            record_kind: "PRODUCTION",
            ..
        })
    ));
}

#[test]
fn test_malformed_downtime_zero_duration() {
    let calculator = OeeCalculator::new();

    let production = create_production_record((8, 0), (9, 0), 100, 0);
    let downtime = create_downtime_record((10, 0), (10, 0), "Quebra");

    let result = calculator.compute(&[production], &[downtime]);
    assert!(matches!(
        result,
        Err(EngineError::MalformedRecord {
            record_kind: "DOWNTIME",
            ..
        })
    ));
}

// ==========================================
// 测试用例 11: 只有停机、没有生产
// ==========================================

#[test]
fn test_downtime_only_period() {
    let calculator = OeeCalculator::new();

    let downtime = create_downtime_record((8, 0), (9, 0), "MANUTENÇÃO preventiva");
    let report = calculator.compute(&[], &[downtime]).unwrap();

    // 运行 0 分钟: 开动率 = 0/(0+60) = 0；性能/良品/换型按零分母规则为 0
    assert_eq!(report.availability_pct, 0.0);
    assert_eq!(report.performance_pct, 0.0);
    assert_eq!(report.quality_pct, 0.0);
    assert_eq!(report.oee_pct, 0.0);
    // MTTR 仍按故障事件统计
    assert!((report.mttr_minutes - 60.0).abs() < 1e-9);
}
