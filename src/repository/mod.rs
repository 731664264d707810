// ==========================================
// 车间OEE系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 连接: Arc<Mutex<Connection>> 共享，PRAGMA 由 db 模块统一
// ==========================================

pub mod downtime_repo;
pub mod error;
pub mod maintenance_repo;
pub mod production_repo;
pub mod reference_repo;

// 重导出
pub use downtime_repo::DowntimeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use maintenance_repo::{MachineMeterRepository, MaintenanceRepository};
pub use production_repo::ProductionRepository;
pub use reference_repo::ReferenceRepository;
