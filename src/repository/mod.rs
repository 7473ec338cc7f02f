// ==========================================
// 车队台账导入导出系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供十张固定表的记录读写，屏蔽存储细节
// 约束: 同表写入串行，跨表写入并行，读取不加锁
// ==========================================

pub mod error;
pub mod record_repo;
pub mod table_store;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use record_repo::RecordRepository;
pub use table_store::JsonTableStore;
