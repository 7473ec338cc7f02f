// ==========================================
// 车队台账导入导出系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: AppConfig（从环境变量加载）
pub trait ImportConfigReader: Send + Sync {
    /// 列覆盖率识别阈值（得分须严格大于该值）
    ///
    /// # 默认值
    /// - 0.3
    fn detection_threshold(&self) -> f64;

    /// 分析结果中每个工作表的预览行数
    ///
    /// # 默认值
    /// - 5
    fn preview_rows(&self) -> usize;

    /// 可接受的最大文件字节数
    ///
    /// # 默认值
    /// - 50 MB
    fn max_file_size(&self) -> u64;
}
