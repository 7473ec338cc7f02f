// ==========================================
// 车队台账导入导出系统 - 记录仓储 Trait
// ==========================================
// 职责: 定义分表记录的数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{EntityType, Fields, Record, StoreStats};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde_json::Value;

// ==========================================
// RecordRepository Trait
// ==========================================
// 用途: 十张固定表的记录读写
// 实现者: JsonTableStore（每表一个 JSON 文件 + 每表一把锁）
//
// 所有方法接收表标识字符串；非十张固定表之一 → RepositoryError::UnknownTable
#[async_trait]
pub trait RecordRepository: Send + Sync {
    // ===== 写入（持有该表的锁完成 读 → 改 → 写 全过程）=====

    /// 插入单条记录
    ///
    /// # 返回
    /// - Ok(String): 新分配的记录 id
    async fn insert(&self, table: &str, fields: Fields) -> RepositoryResult<String>;

    /// 批量插入（一次落盘，不存在部分写入）
    ///
    /// # 返回
    /// - Ok(Vec<String>): 新 id 列表，顺序与入参一致
    async fn insert_many(&self, table: &str, batch: Vec<Fields>) -> RepositoryResult<Vec<String>>;

    /// 合并覆盖更新，刷新 updated_at
    ///
    /// # 返回
    /// - Ok(false): id 不存在
    async fn update(&self, table: &str, id: &str, patch: Fields) -> RepositoryResult<bool>;

    /// 删除记录
    ///
    /// # 返回
    /// - Ok(false): id 不存在
    async fn delete(&self, table: &str, id: &str) -> RepositoryResult<bool>;

    /// 清空表（表本身保留可用）
    async fn clear_table(&self, table: &str) -> RepositoryResult<bool>;

    /// 逐表清空全部十张表（各表独立提交，无跨表原子性）
    async fn clear_all(&self) -> RepositoryResult<()> {
        for entity in EntityType::ALL {
            self.clear_table(entity.as_str()).await?;
        }
        Ok(())
    }

    // ===== 读取（不加锁，不保证快照隔离）=====

    async fn find_all(&self, table: &str) -> RepositoryResult<Vec<Record>>;

    async fn find_by_id(&self, table: &str, id: &str) -> RepositoryResult<Option<Record>>;

    /// 按字段精确匹配（全部条件同时满足）
    async fn find_where(
        &self,
        table: &str,
        filters: &[(&str, Value)],
    ) -> RepositoryResult<Vec<Record>>;

    // ===== 统计 =====

    async fn stats(&self) -> RepositoryResult<StoreStats>;
}
