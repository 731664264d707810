// ==========================================
// 两阶段录入流程测试
// ==========================================
// 测试目标: review → commit / cancel 的端到端行为
// 关键性质:
// - review 拒绝非法草稿时不落库、不登记状态
// - commit 恰好持久化一次，令牌一次性
// ==========================================


use chrono::{Duration, NaiveDate};
use shopfloor_oee::api::{ApiError, EntryApi};
use shopfloor_oee::db;
use shopfloor_oee::domain::types::WorkCenter;
use shopfloor_oee::engine::{ReviewSummary, SubmissionService};
use shopfloor_oee::repository::{DowntimeRepository, ProductionRepository};
use test_helpers::{create_downtime_record, create_production_record, create_test_db};

fn range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    )
}

// ==========================================
// 测试用例 1: 生产录入 复核 → 确认
// ==========================================

#[test]
fn test_production_review_then_commit() {
    let (_dir, db_path) = create_test_db();
    let api = EntryApi::new(&db_path).expect("Failed to create EntryApi");

    // 120 件 / 60 分钟 → 实际节拍 30 秒
    let mut draft = create_production_record((8, 0), (9, 0), 110, 10);
    draft.cycle_seconds = 28.0;

    let pending = api.review_production(draft).expect("复核应通过");

    // 复核摘要是确认页的展示指标
    match &pending.summary {
        ReviewSummary::Production {
            total_qty,
            elapsed_minutes,
            actual_cycle_seconds,
        } => {
            assert_eq!(*total_qty, 120);
            assert!((elapsed_minutes - 60.0).abs() < 1e-9);
            assert!((actual_cycle_seconds - 30.0).abs() < 1e-9);
        }
        other => panic!("Expected production summary, got {:?}", other),
    }

    // 确认前不落库
    let check_repo = ProductionRepository::new(&db_path).unwrap();
    let (from, to) = range();
    assert!(check_repo.find_active_by_range(WorkCenter::Stamping, from, to).unwrap().is_empty());

    // 确认 → 恰好一条入库
    let id = api.commit(&pending.token).expect("确认应成功");
    assert!(id > 0);
    let stored = check_repo.find_active_by_range(WorkCenter::Stamping, from, to).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].good_qty, 110);
}

// ==========================================
// 测试用例 2: 令牌一次性
// ==========================================

#[test]
fn test_token_cannot_be_committed_twice() {
    let (_dir, db_path) = create_test_db();
    let api = EntryApi::new(&db_path).unwrap();

    let pending = api
        .review_production(create_production_record((8, 0), (9, 0), 100, 0))
        .unwrap();

    api.commit(&pending.token).unwrap();

    // 第二次提交同一令牌必须报错，不得重复入库
    let result = api.commit(&pending.token);
    assert!(matches!(result, Err(ApiError::UnknownToken(_))));

    let check_repo = ProductionRepository::new(&db_path).unwrap();
    let (from, to) = range();
    assert_eq!(check_repo.find_active_by_range(WorkCenter::Stamping, from, to).unwrap().len(), 1);
}

// ==========================================
// 测试用例 3: 非法草稿在复核阶段被打回
// ==========================================

#[test]
fn test_invalid_draft_rejected_at_review() {
    let (_dir, db_path) = create_test_db();
    let api = EntryApi::new(&db_path).unwrap();

    // 总件数为零 → 校验门拒绝
    let draft = create_production_record((8, 0), (9, 0), 0, 0);
    let result = api.review_production(draft);
    assert!(matches!(result, Err(ApiError::ValidationFailed(_))));

    // 什么都没有持久化
    let check_repo = ProductionRepository::new(&db_path).unwrap();
    let (from, to) = range();
    assert!(check_repo.find_active_by_range(WorkCenter::Stamping, from, to).unwrap().is_empty());
}

// ==========================================
// 测试用例 4: 取消丢弃草稿
// ==========================================

#[test]
fn test_cancel_discards_draft() {
    let (_dir, db_path) = create_test_db();
    let api = EntryApi::new(&db_path).unwrap();

    let pending = api
        .review_production(create_production_record((8, 0), (9, 0), 100, 0))
        .unwrap();
    api.cancel(&pending.token).unwrap();

    // 取消后令牌失效
    assert!(matches!(api.commit(&pending.token), Err(ApiError::UnknownToken(_))));

    let check_repo = ProductionRepository::new(&db_path).unwrap();
    let (from, to) = range();
    assert!(check_repo.find_active_by_range(WorkCenter::Stamping, from, to).unwrap().is_empty());
}

// ==========================================
// 测试用例 5: 停机录入流程
// ==========================================

#[test]
fn test_downtime_review_then_commit() {
    let (_dir, db_path) = create_test_db();
    let api = EntryApi::new(&db_path).unwrap();

    let draft = create_downtime_record((10, 0), (10, 30), "Quebra de eixo");
    let pending = api.review_downtime(draft).unwrap();

    match &pending.summary {
        ReviewSummary::Downtime {
            duration_minutes,
            failure_event,
        } => {
            assert!((duration_minutes - 30.0).abs() < 1e-9);
            assert!(*failure_event);
        }
        other => panic!("Expected downtime summary, got {:?}", other),
    }

    api.commit(&pending.token).unwrap();

    let check_repo = DowntimeRepository::new(&db_path).unwrap();
    let (from, to) = range();
    let stored = check_repo.find_active_by_range(WorkCenter::Stamping, from, to).unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].is_failure_event());
}

// ==========================================
// 测试用例 6: 草稿超时清理
// ==========================================

#[test]
fn test_expired_draft_token_is_invalid() {
    let (_dir, db_path) = create_test_db();
    // TTL 为零: 草稿登记后立即视为超时
    let api = EntryApi::new(&db_path)
        .unwrap()
        .with_submission_service(SubmissionService::with_ttl(Duration::zero()));

    let pending = api
        .review_production(create_production_record((8, 0), (9, 0), 100, 0))
        .unwrap();

    // 超时草稿的令牌视同不存在，不得入库
    let result = api.commit(&pending.token);
    assert!(matches!(result, Err(ApiError::UnknownToken(_))));

    let check_repo = ProductionRepository::new(&db_path).unwrap();
    let (from, to) = range();
    assert!(check_repo.find_active_by_range(WorkCenter::Stamping, from, to).unwrap().is_empty());
}

#[test]
fn test_pending_pool_does_not_accumulate_expired_drafts() {
    let service = SubmissionService::with_ttl(Duration::zero());

    for _ in 0..10 {
        service
            .review_production(create_production_record((8, 0), (9, 0), 100, 0))
            .unwrap();
    }

    // 超时草稿在访问池时被清理，不会无限堆积
    assert_eq!(service.pending_count().unwrap(), 0);
}

// ==========================================
// 测试用例 7: 入库失败不丢草稿
// ==========================================

#[test]
fn test_commit_failure_preserves_draft_for_retry() {
    let (_dir, db_path) = create_test_db();
    let api = EntryApi::new(&db_path).unwrap();

    let pending = api
        .review_production(create_production_record((8, 0), (9, 0), 100, 0))
        .unwrap();

    // 模拟入库故障: 另开连接删除目标表
    let admin = db::open_sqlite_connection(&db_path).unwrap();
    admin.execute_batch("DROP TABLE production_log;").unwrap();

    let result = api.commit(&pending.token);
    assert!(result.is_err());
    // 令牌没有被消费掉
    assert!(!matches!(result, Err(ApiError::UnknownToken(_))));

    // 故障排除后原令牌可重试
    db::init_schema(&admin).unwrap();
    let id = api.commit(&pending.token).expect("重试应成功");
    assert!(id > 0);

    let check_repo = ProductionRepository::new(&db_path).unwrap();
    let (from, to) = range();
    assert_eq!(check_repo.find_active_by_range(WorkCenter::Stamping, from, to).unwrap().len(), 1);
}
