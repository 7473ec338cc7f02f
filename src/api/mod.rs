// ==========================================
// 车队台账导入导出系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 CLI 或外部服务调用
// ==========================================

pub mod error;
pub mod fleet_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use fleet_api::{AnalyzeResponse, FleetApi};
