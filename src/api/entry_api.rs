// ==========================================
// 车间OEE系统 - 录入接口
// ==========================================
// 职责: 两阶段录入流程与仓储的绑定
//       review  -> 校验草稿，返回令牌 + 复核摘要（不落库）
//       commit  -> 凭令牌持久化，令牌一次性；入库失败草稿放回池中可重试
//       cancel  -> 凭令牌丢弃草稿
// 附带: 维修登记与机台时数维护（生产入库时累加运行小时）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::downtime::DowntimeRecord;
use crate::domain::maintenance::{MachineMeter, MaintenanceRecord};
use crate::domain::production::ProductionRecord;
use crate::domain::types::WorkCenter;
use crate::engine::submission::{PendingSubmission, SubmissionPayload, SubmissionService};
use crate::engine::validation::validate_maintenance;
use crate::repository::downtime_repo::DowntimeRepository;
use crate::repository::error::RepositoryError;
use crate::repository::maintenance_repo::{MachineMeterRepository, MaintenanceRepository};
use crate::repository::production_repo::ProductionRepository;
use std::sync::{Arc, Mutex};

// ==========================================
// EntryApi - 录入接口
// ==========================================
pub struct EntryApi {
    submission: SubmissionService,
    production_repo: ProductionRepository,
    downtime_repo: DowntimeRepository,
    maintenance_repo: MaintenanceRepository,
    meter_repo: MachineMeterRepository,
}

impl EntryApi {
    /// 创建录入接口（各仓储共享一条连接）
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let conn = crate::db::open_and_init(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        Ok(Self {
            submission: SubmissionService::new(),
            production_repo: ProductionRepository::from_connection(Arc::clone(&conn)),
            downtime_repo: DowntimeRepository::from_connection(Arc::clone(&conn)),
            maintenance_repo: MaintenanceRepository::from_connection(Arc::clone(&conn)),
            meter_repo: MachineMeterRepository::from_connection(conn),
        })
    }

    /// 从已有仓储创建（测试/组合用）
    pub fn from_repositories(
        production_repo: ProductionRepository,
        downtime_repo: DowntimeRepository,
        maintenance_repo: MaintenanceRepository,
        meter_repo: MachineMeterRepository,
    ) -> Self {
        Self {
            submission: SubmissionService::new(),
            production_repo,
            downtime_repo,
            maintenance_repo,
            meter_repo,
        }
    }

    /// 替换两阶段录入服务（测试用，如缩短草稿 TTL）
    pub fn with_submission_service(mut self, submission: SubmissionService) -> Self {
        self.submission = submission;
        self
    }

    /// 第一阶段: 复核生产草稿
    ///
    /// 校验门拒绝时直接报错，不登记任何状态、不落库
    pub fn review_production(&self, draft: ProductionRecord) -> ApiResult<PendingSubmission> {
        let pending = self.submission.review_production(draft)?;
        Ok(pending)
    }

    /// 第一阶段: 复核停机草稿
    pub fn review_downtime(&self, draft: DowntimeRecord) -> ApiResult<PendingSubmission> {
        let pending = self.submission.review_downtime(draft)?;
        Ok(pending)
    }

    /// 第二阶段: 确认并持久化
    ///
    /// 入库失败时草稿放回待确认池，原令牌可在排除故障后重试
    ///
    /// # 返回
    /// - Ok(i64): 新记录的数据库主键；令牌随即失效，重复提交报错
    pub fn commit(&self, token: &str) -> ApiResult<i64> {
        let payload = self.submission.take(token)?;

        let id = match self.persist(&payload) {
            Ok(id) => id,
            Err(e) => {
                // 草稿不能因一次入库失败而丢失
                self.submission.restore(token, payload)?;
                return Err(e);
            }
        };

        // 生产入库成功后累加机台运行小时（保养状态页数据来源）
        if let SubmissionPayload::Production(record) = &payload {
            self.meter_repo.accumulate(
                record.work_center,
                &record.machine,
                record.elapsed_minutes() / 60.0,
            )?;
        }

        Ok(id)
    }

    /// 取消待确认草稿
    pub fn cancel(&self, token: &str) -> ApiResult<()> {
        self.submission.cancel(token)?;
        Ok(())
    }

    // ==========================================
    // 维修登记 / 机台时数
    // ==========================================

    /// 登记一条维修记录（单阶段，无需复核）
    ///
    /// # 参数
    /// - reset_meter: true 表示保养完成，机台累计时数清零
    pub fn record_maintenance(
        &self,
        record: MaintenanceRecord,
        reset_meter: bool,
    ) -> ApiResult<i64> {
        validate_maintenance(&record)?;

        let id = self.maintenance_repo.insert(&record)?;

        if reset_meter {
            // 该机台尚无时数记录时清零是空操作，不算错误
            match self.meter_repo.reset(record.work_center, &record.machine) {
                Ok(()) | Err(RepositoryError::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            id,
            work_center = %record.work_center,
            machine = %record.machine,
            maint_type = %record.maint_type,
            reset_meter,
            "维修记录已入库"
        );
        Ok(id)
    }

    /// 设定机台保养目标小时
    pub fn set_meter_target(
        &self,
        work_center: WorkCenter,
        machine: &str,
        target_hours: f64,
    ) -> ApiResult<()> {
        if machine.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台不能为空".to_string()));
        }
        if target_hours < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "保养目标小时不能为负: {}",
                target_hours
            )));
        }

        self.meter_repo.set_target(work_center, machine, target_hours)?;
        Ok(())
    }

    /// 按工段查询机台时数/保养到期状态
    pub fn machine_meter_status(&self, work_center: WorkCenter) -> ApiResult<Vec<MachineMeter>> {
        let meters = self.meter_repo.list(work_center)?;
        Ok(meters)
    }

    // ==========================================
    // 内部方法
    // ==========================================

    fn persist(&self, payload: &SubmissionPayload) -> ApiResult<i64> {
        match payload {
            SubmissionPayload::Production(record) => {
                let id = self.production_repo.insert(record)?;
                tracing::info!(
                    id,
                    work_center = %record.work_center,
                    machine = %record.machine,
                    "生产记录已入库"
                );
                Ok(id)
            }
            SubmissionPayload::Downtime(record) => {
                let id = self.downtime_repo.insert(record)?;
                tracing::info!(
                    id,
                    work_center = %record.work_center,
                    machine = %record.machine,
                    reason = %record.reason,
                    "停机记录已入库"
                );
                Ok(id)
            }
        }
    }
}
