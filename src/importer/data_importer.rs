// ==========================================
// 商品数据导入系统 - 导入编排器实现
// ==========================================
// 职责: 整合导入流程,从数据源到数据库
// 流程: 逐行读取 → 映射 → 校验 → 攒批 → 事务落库
// 约定: 行级失败就地记录并继续,源级/批次级失败终止整次导入
// ==========================================

use crate::domain::types::{ImportStatus, ValidationError};
use crate::domain::{ImportOptions, ImportResult, Item};
use crate::importer::error::ImporterResult;
use crate::importer::feed_importer_trait::{
    FeedImporter, FeedReader, ProgressFn, RecordValidator, RowMapper,
};
use crate::repository::ItemRepository;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// GTIN 宽松模式汇总日志中保留的样本上限
const GTIN_SKIP_SAMPLE_LIMIT: usize = 5;

// ==========================================
// DataImporterImpl - 导入编排器实现
// ==========================================
pub struct DataImporterImpl<R>
where
    R: ItemRepository,
{
    // 数据访问层
    item_repo: R,

    // 导入组件
    mapper: Box<dyn RowMapper>,
    validator: Box<dyn RecordValidator>,
}

impl<R> DataImporterImpl<R>
where
    R: ItemRepository,
{
    /// 创建新的导入编排器实例
    ///
    /// # 参数
    /// - item_repo: 商品仓储
    /// - mapper: 行映射器
    /// - validator: 记录校验器
    pub fn new(item_repo: R, mapper: Box<dyn RowMapper>, validator: Box<dyn RecordValidator>) -> Self {
        Self {
            item_repo,
            mapper,
            validator,
        }
    }
}

#[async_trait::async_trait]
impl<R> FeedImporter for DataImporterImpl<R>
where
    R: ItemRepository + Send + Sync,
{
    /// 执行一次完整导入
    ///
    /// # 流程（每行）
    /// 1. processed += 1
    /// 2. 映射;失败则记为跳过并继续
    /// 3. 校验
    /// 4. 宽松模式下剔除 invalid_gtin 后再判定（是降级,不是跳过整行）
    /// 5. 仍不合法则记为跳过并继续
    /// 6. 追加到当前批
    /// 7. 满批落库并触发进度回调
    /// 8. 源耗尽后落库尾批
    /// 9. 计算最终状态
    #[instrument(skip_all, fields(batch_size = options.batch_size, dry_run = options.dry_run))]
    async fn import(
        &self,
        reader: &dyn FeedReader,
        options: &ImportOptions,
        progress: Option<&ProgressFn>,
    ) -> ImporterResult<ImportResult> {
        let mut processed: u64 = 0;
        let mut imported: u64 = 0;
        let mut skipped: u64 = 0;
        let mut errors: BTreeMap<u64, Vec<String>> = BTreeMap::new();

        let mut batch: Vec<Item> = Vec::with_capacity(options.batch_size);
        let estimated_total = reader.estimated_count();
        let mut gtin_skip_count: u64 = 0;
        let mut gtin_skip_samples: Vec<(u64, String)> = Vec::new();

        info!(estimated_total = ?estimated_total, "开始导入商品数据");

        // 源级错误: 数据源完全无法打开/解析,直接终止
        let rows = reader.read()?;

        for row_result in rows {
            // 流中途解析失败同样是源级错误,终止导入
            let (line_number, row) = row_result?;
            processed += 1;

            // === 映射 ===
            let item = match self.mapper.map(&row, line_number) {
                Ok(item) => item,
                Err(e) => {
                    record_skip(&mut skipped, &mut errors, line_number, vec![e.to_string()]);
                    continue;
                }
            };

            // === 校验 ===
            let outcome = self.validator.validate(&item);
            let mut remaining = outcome.errors;
            let mut is_valid = outcome.is_valid;

            // === GTIN 宽松模式 ===
            // 仅剔除 invalid_gtin 类别;其余失败类别仍然拒绝该行
            if options.skip_gtin_validation && !remaining.is_empty() {
                let before = remaining.len();
                remaining.retain(|e| *e != ValidationError::InvalidGtin);

                if remaining.len() != before {
                    gtin_skip_count += 1;
                    if gtin_skip_samples.len() < GTIN_SKIP_SAMPLE_LIMIT {
                        gtin_skip_samples.push((line_number, item.gtin.clone()));
                    }
                }

                is_valid = remaining.is_empty();
            }

            if !is_valid {
                let messages = remaining
                    .iter()
                    .map(|e| e.message().to_string())
                    .collect();
                record_skip(&mut skipped, &mut errors, line_number, messages);
                continue;
            }

            // === 攒批与落库 ===
            batch.push(item);

            if batch.len() >= options.batch_size {
                imported += self.flush_batch(&mut batch, options.dry_run).await?;

                if let Some(callback) = progress {
                    callback(processed, estimated_total);
                }
            }
        }

        // === 尾批落库（不要求进度回调）===
        if !batch.is_empty() {
            imported += self.flush_batch(&mut batch, options.dry_run).await?;
        }

        // === GTIN 宽松模式汇总（至多一条）===
        if options.skip_gtin_validation && gtin_skip_count > 0 {
            info!(
                rows = gtin_skip_count,
                samples = ?gtin_skip_samples,
                "GTIN 校验已对部分行降级"
            );
        }

        let status = determine_status(processed, imported, skipped);

        info!(
            processed = processed,
            imported = imported,
            skipped = skipped,
            status = %status,
            "商品数据导入完成"
        );

        Ok(ImportResult {
            status,
            processed,
            imported,
            skipped,
            errors,
        })
    }
}

// 辅助方法
impl<R> DataImporterImpl<R>
where
    R: ItemRepository,
{
    /// 落库当前批并清空
    ///
    /// # 返回
    /// - Ok(n): 本批计入 imported 的行数
    /// - Err: 批次事务失败（整批回滚,向上传播终止导入）
    async fn flush_batch(&self, batch: &mut Vec<Item>, dry_run: bool) -> ImporterResult<u64> {
        let count = batch.len() as u64;

        if dry_run {
            debug!(count = count, "试运行: 跳过批次落库");
            batch.clear();
            return Ok(count);
        }

        self.item_repo.upsert_batch(batch).await?;
        batch.clear();
        Ok(count)
    }
}

/// 记录一条被跳过的行
fn record_skip(
    skipped: &mut u64,
    errors: &mut BTreeMap<u64, Vec<String>>,
    line_number: u64,
    messages: Vec<String>,
) {
    *skipped += 1;
    warn!(line = line_number, errors = ?messages, "导入跳过行");
    errors.insert(line_number, messages);
}

/// 计算最终状态
///
/// # 规则
/// - processed == 0 → Failed
/// - skipped == 0 → Success
/// - imported == 0 → Failed
/// - 其他 → PartialFailure
fn determine_status(processed: u64, imported: u64, skipped: u64) -> ImportStatus {
    if processed == 0 {
        return ImportStatus::Failed;
    }
    if skipped == 0 {
        return ImportStatus::Success;
    }
    if imported == 0 {
        return ImportStatus::Failed;
    }
    ImportStatus::PartialFailure
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_status_empty_source_is_failed() {
        assert_eq!(determine_status(0, 0, 0), ImportStatus::Failed);
    }

    #[test]
    fn test_determine_status_no_skips_is_success() {
        assert_eq!(determine_status(5, 5, 0), ImportStatus::Success);
    }

    #[test]
    fn test_determine_status_nothing_imported_is_failed() {
        assert_eq!(determine_status(3, 0, 3), ImportStatus::Failed);
    }

    #[test]
    fn test_determine_status_mixed_is_partial_failure() {
        assert_eq!(determine_status(5, 3, 2), ImportStatus::PartialFailure);
    }
}
