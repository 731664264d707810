// ==========================================
// 车间OEE系统 - 两阶段录入服务
// ==========================================
// 背景: 旧系统用会话级全局标志实现"确认后保存"向导，
//       此处重构为显式两阶段请求:
//       review  -> 校验草稿，返回待确认令牌 + 复核摘要
//       commit  -> 凭令牌取出草稿交仓储持久化（令牌一次性）
//       cancel  -> 凭令牌丢弃草稿
// 待确认状态保存在服务实例内，不存在进程级可变标志
// 草稿有存活时限（TTL）: 超时未确认的草稿在下次访问时清理，
// 防止放弃的草稿在池中无限堆积
// ==========================================

use crate::domain::downtime::DowntimeRecord;
use crate::domain::production::ProductionRecord;
use crate::engine::error::ValidationError;
use crate::engine::validation::{validate_downtime, validate_production};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

// ==========================================
// 错误类型
// ==========================================

/// 两阶段录入错误
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// 草稿未通过校验门
    #[error("录入校验失败: {0}")]
    Validation(#[from] ValidationError),

    /// 令牌不存在或已被消费
    #[error("待确认令牌无效或已消费: {token}")]
    UnknownToken { token: String },

    /// 内部锁获取失败
    #[error("待确认状态锁获取失败: {0}")]
    LockError(String),
}

pub type SubmissionResult<T> = Result<T, SubmissionError>;

// ==========================================
// 复核摘要 / 待确认对象
// ==========================================

/// 复核摘要（确认页展示指标）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewSummary {
    /// 生产草稿摘要
    Production {
        /// 总件数（良品 + 废品）
        total_qty: i64,
        /// 实际占用时间（分钟）
        elapsed_minutes: f64,
        /// 实际节拍（秒/件）
        actual_cycle_seconds: f64,
    },
    /// 停机草稿摘要
    Downtime {
        /// 停机时长（分钟）
        duration_minutes: f64,
        /// 是否判定为故障事件
        failure_event: bool,
    },
}

/// 待持久化的草稿载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionPayload {
    Production(ProductionRecord),
    Downtime(DowntimeRecord),
}

/// 待确认对象（review 的返回值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSubmission {
    /// 一次性令牌
    pub token: String,
    /// 复核摘要
    pub summary: ReviewSummary,
    /// 创建时间（UTC）
    pub created_at: NaiveDateTime,
}

// ==========================================
// SubmissionService - 两阶段录入服务
// ==========================================

/// 默认草稿存活时限（分钟）
pub const DEFAULT_PENDING_TTL_MINUTES: i64 = 30;

/// 池中的待确认条目（草稿 + 登记时刻）
struct PendingEntry {
    payload: SubmissionPayload,
    registered_at: DateTime<Utc>,
}

pub struct SubmissionService {
    pending: Mutex<HashMap<String, PendingEntry>>,
    ttl: Duration,
}

impl Default for SubmissionService {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionService {
    /// 构造函数（默认 TTL）
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_PENDING_TTL_MINUTES))
    }

    /// 指定草稿存活时限的构造函数
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// 第一阶段: 校验生产草稿，通过则登记为待确认
    ///
    /// # 返回
    /// - Ok(PendingSubmission): 令牌 + 复核摘要
    /// - Err(SubmissionError::Validation): 校验门拒绝，未登记任何状态
    pub fn review_production(
        &self,
        draft: ProductionRecord,
    ) -> SubmissionResult<PendingSubmission> {
        validate_production(&draft)?;

        let summary = ReviewSummary::Production {
            total_qty: draft.total_qty(),
            elapsed_minutes: draft.elapsed_minutes(),
            actual_cycle_seconds: draft.actual_cycle_seconds(),
        };

        self.register(SubmissionPayload::Production(draft), summary)
    }

    /// 第一阶段: 校验停机草稿，通过则登记为待确认
    pub fn review_downtime(&self, draft: DowntimeRecord) -> SubmissionResult<PendingSubmission> {
        validate_downtime(&draft)?;

        let summary = ReviewSummary::Downtime {
            duration_minutes: draft.duration_minutes(),
            failure_event: draft.is_failure_event(),
        };

        self.register(SubmissionPayload::Downtime(draft), summary)
    }

    /// 第二阶段: 凭令牌取出草稿（令牌随即失效）
    ///
    /// 持久化由调用方（EntryApi）负责，服务本身不接触仓储；
    /// 超时草稿视同不存在
    pub fn take(&self, token: &str) -> SubmissionResult<SubmissionPayload> {
        let mut pending = self.lock_pending()?;
        Self::purge_expired(&mut pending, self.ttl);
        pending
            .remove(token)
            .map(|entry| entry.payload)
            .ok_or_else(|| SubmissionError::UnknownToken {
                token: token.to_string(),
            })
    }

    /// 草稿放回待确认池（入库失败时调用，令牌保持可用）
    ///
    /// 登记时刻重置，TTL 重新起算
    pub fn restore(&self, token: &str, payload: SubmissionPayload) -> SubmissionResult<()> {
        let mut pending = self.lock_pending()?;
        pending.insert(
            token.to_string(),
            PendingEntry {
                payload,
                registered_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// 取消: 凭令牌丢弃草稿
    pub fn cancel(&self, token: &str) -> SubmissionResult<()> {
        self.take(token).map(|_| ())
    }

    /// 当前待确认草稿数（监控/测试用，不含已超时草稿）
    pub fn pending_count(&self) -> SubmissionResult<usize> {
        let mut pending = self.lock_pending()?;
        Self::purge_expired(&mut pending, self.ttl);
        Ok(pending.len())
    }

    // ==========================================
    // 内部方法
    // ==========================================

    fn register(
        &self,
        payload: SubmissionPayload,
        summary: ReviewSummary,
    ) -> SubmissionResult<PendingSubmission> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut pending = self.lock_pending()?;
        Self::purge_expired(&mut pending, self.ttl);
        pending.insert(
            token.clone(),
            PendingEntry {
                payload,
                registered_at: now,
            },
        );

        tracing::debug!(token = %token, "草稿通过校验门，登记待确认");

        Ok(PendingSubmission {
            token,
            summary,
            created_at: now.naive_utc(),
        })
    }

    /// 清理超时草稿（每次访问池时执行）
    fn purge_expired(pending: &mut HashMap<String, PendingEntry>, ttl: Duration) {
        let now = Utc::now();
        let before = pending.len();
        pending.retain(|_, entry| now - entry.registered_at < ttl);

        let purged = before - pending.len();
        if purged > 0 {
            tracing::debug!(purged, "清理超时未确认草稿");
        }
    }

    fn lock_pending(
        &self,
    ) -> SubmissionResult<std::sync::MutexGuard<'_, HashMap<String, PendingEntry>>> {
        self.pending
            .lock()
            .map_err(|e| SubmissionError::LockError(e.to_string()))
    }
}
