// ==========================================
// 车队台账导入导出系统 - JSON 分表存储实现
// ==========================================
// 存储: <data_dir>/<table>.json，每表一个 JSON 数组
// 并发: 每表一把 tokio::sync::Mutex，串行化同表的 读 → 改 → 写
//       不同表互不阻塞；读取不加锁（可能与进行中的写入交错）
// 容错: 读取时文件缺失/损坏按空表处理，单条坏记录跳过
//       写入前若文件存在但无法完整解析，拒绝覆盖 (StorageWrite)
// ==========================================

use crate::domain::types::TABLE_COUNT;
use crate::domain::{EntityType, Fields, Record, StoreStats};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_repo::RecordRepository;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// JsonTableStore
// ==========================================
#[derive(Default)]
struct TableSnapshot {
    records: Vec<Record>,
    // 无法解析而跳过的记录数
    skipped: usize,
}

pub struct JsonTableStore {
    root: PathBuf,
    // 下标 = EntityType 声明序号
    locks: [Mutex<()>; TABLE_COUNT],
}

impl JsonTableStore {
    /// 创建存储实例（不触碰磁盘，需再调用 initialize）
    ///
    /// # 参数
    /// - root: 存储目录
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// 初始化: 创建目录，为缺失的表创建空文件
    ///
    /// 已有文件一律保留（非破坏性）
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn initialize(&self) -> RepositoryResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| RepositoryError::InitializationError {
                path: self.root.display().to_string(),
                message: e.to_string(),
            })?;

        for entity in EntityType::ALL {
            let path = self.table_path(entity);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }
            let _guard = self.lock_for(entity).lock().await;
            self.write_table(entity, &[]).await?;
            debug!(table = %entity, "创建空数据表");
        }

        info!("数据存储初始化完成");
        Ok(())
    }

    /// 关闭: 等待所有进行中的写入结束
    ///
    /// 每次写入在释放锁前已 fsync，此处逐表获取一次锁即可
    pub async fn close(&self) {
        for entity in EntityType::ALL {
            let _guard = self.lock_for(entity).lock().await;
        }
        info!(root = %self.root.display(), "数据存储已关闭");
    }

    /// 存储目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, table: &str) -> RepositoryResult<EntityType> {
        Ok(table.parse::<EntityType>()?)
    }

    fn table_path(&self, entity: EntityType) -> PathBuf {
        self.root.join(format!("{}.json", entity.as_str()))
    }

    fn lock_for(&self, entity: EntityType) -> &Mutex<()> {
        &self.locks[entity as usize]
    }

    /// 解析整表文件；逐条解析记录，坏记录跳过并计数
    ///
    /// 文件缺失或为空 → 空表；文件存在但不是 JSON 数组 → Err
    async fn load_table(&self, entity: EntityType) -> Result<TableSnapshot, String> {
        let path = self.table_path(entity);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(table = %entity, "数据表文件不存在，按空表处理");
                return Ok(TableSnapshot::default());
            }
            Err(e) => return Err(e.to_string()),
        };

        if content.trim().is_empty() {
            return Ok(TableSnapshot::default());
        }

        let values = serde_json::from_str::<Vec<Value>>(&content).map_err(|e| e.to_string())?;
        let mut snapshot = TableSnapshot {
            records: Vec::with_capacity(values.len()),
            skipped: 0,
        };
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<Record>(value) {
                Ok(record) => snapshot.records.push(record),
                Err(e) => {
                    warn!(table = %entity, index, error = %e, "记录无法解析，已跳过");
                    snapshot.skipped += 1;
                }
            }
        }
        Ok(snapshot)
    }

    /// 读取整表（只读路径）；文件损坏视为空表
    async fn read_table(&self, entity: EntityType) -> Vec<Record> {
        match self.load_table(entity).await {
            Ok(snapshot) => snapshot.records,
            Err(e) => {
                warn!(table = %entity, error = %e, "数据表文件损坏，按空表处理");
                Vec::new()
            }
        }
    }

    /// 读取整表（读 → 改 → 写 路径）
    ///
    /// 存在无法解析的内容时返回 StorageWrite，原文件保持不动
    /// 调用方必须持有该表的锁
    async fn read_for_write(&self, entity: EntityType) -> RepositoryResult<Vec<Record>> {
        let refuse = |message: String| {
            warn!(table = %entity, error = %message, "数据表无法完整解析，拒绝写入");
            RepositoryError::StorageWrite {
                table: entity.as_str().to_string(),
                message,
            }
        };

        match self.load_table(entity).await {
            Ok(snapshot) if snapshot.skipped == 0 => Ok(snapshot.records),
            Ok(snapshot) => Err(refuse(format!(
                "{} 条记录无法解析，拒绝覆盖原文件",
                snapshot.skipped
            ))),
            Err(e) => Err(refuse(format!("数据表文件无法解析，拒绝覆盖: {}", e))),
        }
    }

    /// 整表写回: 先写临时文件并 fsync，再原子替换
    ///
    /// 调用方必须持有该表的锁
    async fn write_table(&self, entity: EntityType, records: &[Record]) -> RepositoryResult<()> {
        let table = entity.as_str().to_string();
        let payload =
            serde_json::to_vec_pretty(records).map_err(|e| RepositoryError::Serialization {
                table: table.clone(),
                message: e.to_string(),
            })?;

        let path = self.table_path(entity);
        let tmp_path = self.root.join(format!("{}.json.tmp", entity.as_str()));
        let write_err = |e: std::io::Error| RepositoryError::StorageWrite {
            table: table.clone(),
            message: e.to_string(),
        };

        let mut file = tokio::fs::File::create(&tmp_path).await.map_err(write_err)?;
        file.write_all(&payload).await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);

        tokio::fs::rename(&tmp_path, &path).await.map_err(write_err)?;
        Ok(())
    }
}

#[async_trait]
impl RecordRepository for JsonTableStore {
    async fn insert(&self, table: &str, fields: Fields) -> RepositoryResult<String> {
        let entity = self.resolve(table)?;
        let _guard = self.lock_for(entity).lock().await;

        let mut records = self.read_for_write(entity).await?;
        let record = Record::new(Uuid::new_v4().to_string(), Utc::now(), fields);
        let id = record.id.clone();
        records.push(record);
        self.write_table(entity, &records).await?;

        debug!(table = %entity, id = %id, "插入记录");
        Ok(id)
    }

    async fn insert_many(&self, table: &str, batch: Vec<Fields>) -> RepositoryResult<Vec<String>> {
        let entity = self.resolve(table)?;
        let _guard = self.lock_for(entity).lock().await;

        let mut records = self.read_for_write(entity).await?;
        let now = Utc::now();
        let mut ids = Vec::with_capacity(batch.len());
        for fields in batch {
            let record = Record::new(Uuid::new_v4().to_string(), now, fields);
            ids.push(record.id.clone());
            records.push(record);
        }
        self.write_table(entity, &records).await?;

        debug!(table = %entity, count = ids.len(), "批量插入记录");
        Ok(ids)
    }

    async fn update(&self, table: &str, id: &str, patch: Fields) -> RepositoryResult<bool> {
        let entity = self.resolve(table)?;
        let _guard = self.lock_for(entity).lock().await;

        let mut records = self.read_for_write(entity).await?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        record.apply_patch(patch, Utc::now());
        self.write_table(entity, &records).await?;
        Ok(true)
    }

    async fn delete(&self, table: &str, id: &str) -> RepositoryResult<bool> {
        let entity = self.resolve(table)?;
        let _guard = self.lock_for(entity).lock().await;

        let mut records = self.read_for_write(entity).await?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_table(entity, &records).await?;
        Ok(true)
    }

    async fn clear_table(&self, table: &str) -> RepositoryResult<bool> {
        let entity = self.resolve(table)?;
        let _guard = self.lock_for(entity).lock().await;

        self.write_table(entity, &[]).await?;
        info!(table = %entity, "数据表已清空");
        Ok(true)
    }

    async fn find_all(&self, table: &str) -> RepositoryResult<Vec<Record>> {
        let entity = self.resolve(table)?;
        Ok(self.read_table(entity).await)
    }

    async fn find_by_id(&self, table: &str, id: &str) -> RepositoryResult<Option<Record>> {
        let entity = self.resolve(table)?;
        Ok(self
            .read_table(entity)
            .await
            .into_iter()
            .find(|r| r.id == id))
    }

    async fn find_where(
        &self,
        table: &str,
        filters: &[(&str, Value)],
    ) -> RepositoryResult<Vec<Record>> {
        let entity = self.resolve(table)?;
        Ok(self
            .read_table(entity)
            .await
            .into_iter()
            .filter(|r| r.matches(filters))
            .collect())
    }

    async fn stats(&self) -> RepositoryResult<StoreStats> {
        let counts = join_all(
            EntityType::ALL
                .iter()
                .map(|entity| async move { (*entity, self.read_table(*entity).await.len()) }),
        )
        .await;

        let tables: BTreeMap<String, usize> = counts
            .into_iter()
            .map(|(entity, count)| (entity.as_str().to_string(), count))
            .collect();
        let total_records = tables.values().sum();

        Ok(StoreStats {
            database_path: self.root.display().to_string(),
            tables,
            total_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    async fn create_store() -> (TempDir, JsonTableStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonTableStore::new(dir.path().join("db"));
        store.initialize().await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_initialize_creates_all_tables() {
        let (_dir, store) = create_store().await;
        for entity in EntityType::ALL {
            assert!(store.table_path(entity).exists(), "{} 应已创建", entity);
        }
    }

    #[tokio::test]
    async fn test_initialize_is_not_destructive() {
        let (_dir, store) = create_store().await;
        store
            .insert("routes", fields(json!({"route_name": "R1"})))
            .await
            .unwrap();

        store.initialize().await.unwrap();
        assert_eq!(store.find_all("routes").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let (_dir, store) = create_store().await;
        let path = store.table_path(EntityType::Drivers);
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(store.find_all("drivers").await.unwrap().is_empty());

        // 损坏文件不被覆盖
        let err = store
            .insert("drivers", fields(json!({"name": "Ali"})))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::StorageWrite { ref table, .. } if table == "drivers"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "{ not json");

        // 显式清空可恢复
        store.clear_table("drivers").await.unwrap();
        store
            .insert("drivers", fields(json!({"name": "Ali"})))
            .await
            .unwrap();
        assert_eq!(store.find_all("drivers").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_naive_timestamps_survive_insert() {
        let (_dir, store) = create_store().await;
        let legacy = json!([
            {
                "id": "old-1",
                "registration_number": "ABC-123",
                "created_at": "2024-01-01T10:00:00.123456",
                "updated_at": "2024-01-01T10:00:00.123456"
            },
            {
                "id": "old-2",
                "registration_number": "DEF-456",
                "created_at": "2024-01-02T11:30:00"
            }
        ]);
        tokio::fs::write(
            store.table_path(EntityType::Vehicles),
            serde_json::to_string_pretty(&legacy).unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(store.find_all("vehicles").await.unwrap().len(), 2);

        let id = store
            .insert("vehicles", fields(json!({"registration_number": "GHI-789"})))
            .await
            .unwrap();

        let all = store.find_all("vehicles").await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["old-1", "old-2", id.as_str()]);
        assert_eq!(all[0].created_at.to_rfc3339(), "2024-01-01T10:00:00.123456+00:00");
        assert_eq!(all[1].updated_at, all[1].created_at);
    }

    #[tokio::test]
    async fn test_bad_record_blocks_overwrite() {
        let (_dir, store) = create_store().await;
        let path = store.table_path(EntityType::Routes);
        let content = serde_json::to_string(&json!([
            {"id": "r1", "route_name": "R1", "created_at": "2024-01-01T00:00:00Z"},
            {"route_name": "no id"}
        ]))
        .unwrap();
        tokio::fs::write(&path, &content).await.unwrap();

        // 读取只跳过坏记录
        let all = store.find_all("routes").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "r1");

        let err = store.delete("routes", "r1").await.unwrap_err();
        assert!(matches!(err, RepositoryError::StorageWrite { .. }));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonTableStore::new(dir.path().join("never_initialized"));
        assert!(store.find_all("trips").await.unwrap().is_empty());
        assert!(store.find_by_id("trips", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_table_rejected() {
        let (_dir, store) = create_store().await;
        let err = store.insert("fleet", Fields::new()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UnknownTable(ref t) if t == "fleet"));
        assert!(store.find_all("fleet").await.is_err());
        assert!(store.clear_table("fleet").await.is_err());
    }

    #[tokio::test]
    async fn test_stats_counts_per_table() {
        let (_dir, store) = create_store().await;
        store
            .insert_many(
                "vehicles",
                vec![
                    fields(json!({"registration_number": "ABC-123"})),
                    fields(json!({"registration_number": "DEF-456"})),
                ],
            )
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.tables.len(), 10);
        assert_eq!(stats.tables["vehicles"], 2);
        assert_eq!(stats.tables["overtime"], 0);
        assert_eq!(stats.total_records, 2);
    }
}
