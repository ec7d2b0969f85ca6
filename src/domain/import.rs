// ==========================================
// 商品数据导入系统 - 导入流程数据结构
// ==========================================
// 职责: 定义导入配置、聚合结果与导入运行审计记录
// ==========================================

use crate::domain::types::ImportStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 未类型化的源行（列名 → 原始文本值）
///
/// 生命周期: 由数据源产出,立即被映射层消费
pub type RawRow = HashMap<String, String>;

// ==========================================
// ImportOptions - 导入配置
// ==========================================
// 用途: 由调用方（CLI）构造,核心只读取
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    pub batch_size: usize,           // 批量落库阈值（必须 > 0）
    pub dry_run: bool,               // 试运行: 跳过落库
    pub skip_gtin_validation: bool,  // 宽松模式: GTIN 失败降级为告警
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            dry_run: false,
            skip_gtin_validation: false,
        }
    }
}

// ==========================================
// ImportResult - 导入聚合结果
// ==========================================
// 不变量: processed == imported + skipped
// 不变量: errors 每个被跳过的行恰好一条,导入成功的行不出现
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub status: ImportStatus,              // 最终状态
    pub processed: u64,                    // 读取的行数
    pub imported: u64,                     // 已落库行数（试运行下为将落库行数）
    pub skipped: u64,                      // 被拒绝的行数
    // 行号升序即源行顺序,BTreeMap 迭代顺序与插入顺序一致
    pub errors: BTreeMap<u64, Vec<String>>, // 行号 → 人类可读错误文案列表
}

// ==========================================
// ImportRun - 导入运行审计记录
// ==========================================
// 用途: 每次完成的非试运行导入写入一条,供运维回溯
// 对齐: import_run 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRun {
    pub run_id: String,               // 运行 ID（UUID）
    pub file_name: Option<String>,    // 源文件名
    pub status: ImportStatus,         // 最终状态
    pub processed: i64,               // 读取的行数
    pub imported: i64,                // 已落库行数
    pub skipped: i64,                 // 被拒绝的行数
    pub dry_run: bool,                // 是否试运行
    pub errors_json: Option<String>,  // 错误明细 JSON（行号 → 文案列表）
    pub started_at: DateTime<Utc>,    // 开始时间
    pub elapsed_ms: i64,              // 耗时（毫秒）
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ImportOptions::default();
        assert_eq!(options.batch_size, 100);
        assert!(!options.dry_run);
        assert!(!options.skip_gtin_validation);
    }

    #[test]
    fn test_error_map_iterates_in_line_order() {
        let mut errors: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        errors.insert(4, vec!["a".to_string()]);
        errors.insert(2, vec!["b".to_string()]);
        errors.insert(3, vec!["c".to_string()]);

        let lines: Vec<u64> = errors.keys().copied().collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }
}
