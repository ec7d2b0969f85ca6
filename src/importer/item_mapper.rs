// ==========================================
// 商品数据导入系统 - 行映射器实现
// ==========================================
// 职责: 源列 → Item 字段映射 + 价格规范化 + 库存解析
// 约定: 必需列以"列是否存在"判定,值为空交由校验层处理
// ==========================================

use crate::domain::{Item, RawRow};
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::feed_importer_trait::RowMapper;

/// 必需列清单（缺任意一列即映射失败）
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "gtin",
    "language",
    "title",
    "picture",
    "description",
    "price",
    "stock",
];

/// 库存解析失败时的缺省值
///
/// 源格式约定为宽松数值,解析失败不报错而是落到该常量
pub const DEFAULT_STOCK: i64 = 0;

pub struct ItemMapper;

impl RowMapper for ItemMapper {
    fn map(&self, row: &RawRow, line_number: u64) -> ImporterResult<Item> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !row.contains_key(*column))
            .collect();

        if !missing.is_empty() {
            return Err(ImportError::MissingColumns {
                line: line_number,
                columns: missing.join(", "),
            });
        }

        Ok(Item {
            gtin: row["gtin"].trim().to_string(),
            language: row["language"].trim().to_string(),
            title: row["title"].trim().to_string(),
            picture: row["picture"].trim().to_string(),
            description: row["description"].trim().to_string(),
            price: normalize_price(&row["price"]),
            stock: parse_stock(&row["stock"]),
        })
    }

    fn supports(&self, row: &RawRow) -> bool {
        REQUIRED_COLUMNS
            .iter()
            .all(|column| row.contains_key(*column))
    }
}

/// 价格规范化
///
/// # 规则
/// - 可解析为有限数值 → 定点两位小数文本（小数点 `.`,无千分位）
/// - 不可解析 → 原样透传（由校验层判 invalid_price）
///
/// 规范化是幂等的: "738.7" → "738.70" → "738.70"
fn normalize_price(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => format!("{:.2}", value),
        _ => trimmed.to_string(),
    }
}

/// 库存解析（显式 parse-or-default 策略）
///
/// # 规则
/// - 整数 → 原值
/// - 有限小数 → 向零截断
/// - 其他 → DEFAULT_STOCK
fn parse_stock(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => DEFAULT_STOCK,
    }
}
