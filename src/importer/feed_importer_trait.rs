// ==========================================
// 商品数据导入系统 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各环节接口（不包含实现）
// 流程: 数据源 → 行映射 → 记录校验 → 批量落库
// ==========================================

use crate::domain::{ImportOptions, ImportResult, Item, RawRow, ValidationOutcome};
use crate::importer::error::ImporterResult;
use async_trait::async_trait;

/// 进度回调: (已读取行数, 预估总行数)
///
/// 同步观察者,不承载取消语义;调用方如需超时自行包裹 import 调用
pub type ProgressFn = dyn Fn(u64, Option<u64>) + Send + Sync;

// ==========================================
// FeedReader Trait
// ==========================================
// 用途: 行结构数据源接口（阶段 0）
// 实现者: CsvFeedReader, XlsxFeedReader
// 约定: 行号由数据源给出,从 2 起（第 1 行为表头）
pub trait FeedReader: Send + Sync {
    /// 打开数据源并返回行迭代器
    ///
    /// # 返回
    /// - Ok(iter): 逐行产出 (行号, 原始行);行内 Err 表示流中途解析失败
    /// - Err: 数据源完全无法打开/解析（源级错误,终止导入）
    fn read(
        &self,
    ) -> ImporterResult<Box<dyn Iterator<Item = ImporterResult<(u64, RawRow)>> + Send>>;

    /// 廉价的总行数估算
    ///
    /// # 返回
    /// - Some(n): 估算值（引号内换行等场景可能有偏差）
    /// - None: 无法估算
    fn estimated_count(&self) -> Option<u64>;
}

// ==========================================
// RowMapper Trait
// ==========================================
// 用途: 原始行 → 领域记录映射接口（阶段 1）
// 实现者: ItemMapper
pub trait RowMapper: Send + Sync {
    /// 将原始行映射为 Item
    ///
    /// # 参数
    /// - row: 原始行（列名 → 值）
    /// - line_number: 源行号（用于错误报告）
    ///
    /// # 返回
    /// - Ok(Item): 映射成功
    /// - Err: 必需列缺失（判定依据是列不存在,而非值为空）
    fn map(&self, row: &RawRow, line_number: u64) -> ImporterResult<Item>;

    /// 判断必需列是否齐全（不做转换）
    ///
    /// 供在多个映射器间选择的调用方使用
    fn supports(&self, row: &RawRow) -> bool;
}

// ==========================================
// RecordValidator Trait
// ==========================================
// 用途: 领域记录业务规则校验接口（阶段 2）
// 实现者: ItemValidator
// 红线: 纯函数,永不失败,规则间不短路
pub trait RecordValidator: Send + Sync {
    /// 校验单条记录,返回通过/失败结论
    ///
    /// 每条失败规则恰好追加一个错误类别
    fn validate(&self, item: &Item) -> ValidationOutcome;
}

// ==========================================
// FeedImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: DataImporterImpl
#[async_trait]
pub trait FeedImporter: Send + Sync {
    /// 执行一次完整导入
    ///
    /// # 参数
    /// - reader: 行结构数据源
    /// - options: 导入配置
    /// - progress: 可选进度回调,每次满批落库后调用
    ///
    /// # 返回
    /// - Ok(ImportResult): 导入完成（含部分失败）
    /// - Err: 源级读取错误或批次落库错误（致命,无聚合结果）
    async fn import(
        &self,
        reader: &dyn FeedReader,
        options: &ImportOptions,
        progress: Option<&ProgressFn>,
    ) -> ImporterResult<ImportResult>;
}
