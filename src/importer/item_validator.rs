// ==========================================
// 商品数据导入系统 - 记录校验器实现
// ==========================================
// 职责: 商品字段业务规则校验 + GTIN-13 校验位
// 红线: 规则独立评估不短路,每条失败规则恰好报告一个类别
// ==========================================

use crate::domain::{Item, ValidationOutcome};
use crate::domain::types::ValidationError;
use crate::importer::feed_importer_trait::RecordValidator;
use url::Url;

/// 语言代码允许清单（大小写不敏感）
pub const VALID_LANGUAGES: [&str; 7] = ["en", "de", "fr", "it", "es", "nl", "pl"];

/// 价格上限（不含）
const PRICE_MAX_EXCLUSIVE: f64 = 10_000_000_000_000.0;

/// GTIN 合法长度区间
const GTIN_MIN_LEN: usize = 8;
const GTIN_MAX_LEN: usize = 14;

/// 携带校验位的 GTIN 长度（仅该长度做校验位验证）
const GTIN13_LEN: usize = 13;

pub struct ItemValidator;

impl RecordValidator for ItemValidator {
    fn validate(&self, item: &Item) -> ValidationOutcome {
        let mut errors = Vec::new();

        if !is_valid_gtin(&item.gtin) {
            errors.push(ValidationError::InvalidGtin);
        }

        if !is_valid_price(&item.price) {
            errors.push(ValidationError::InvalidPrice);
        }

        if item.stock < 0 {
            errors.push(ValidationError::InvalidStock);
        }

        if !is_valid_language(&item.language) {
            errors.push(ValidationError::InvalidLanguage);
        }

        if !is_valid_url(&item.picture) {
            errors.push(ValidationError::InvalidUrl);
        }

        if item.title.trim().is_empty() {
            errors.push(ValidationError::MissingRequiredField);
        }

        ValidationOutcome::new(errors)
    }
}

/// GTIN 校验: 8-14 位数字,且 13 位时校验位必须成立
///
/// 8/12/14 位仅按长度放行（校验位验证是 GTIN-13 专属的）
fn is_valid_gtin(gtin: &str) -> bool {
    let len = gtin.len();
    if !(GTIN_MIN_LEN..=GTIN_MAX_LEN).contains(&len) {
        return false;
    }
    if !gtin.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if len == GTIN13_LEN {
        return gtin13_checksum_holds(gtin);
    }
    true
}

/// GTIN-13 校验位验证
///
/// # 规则
/// - 前 12 位按位置加权: 偶数下标（0 基）× 1,奇数下标 × 3
/// - 期望校验位 = (10 - sum % 10) % 10,须等于第 13 位
fn gtin13_checksum_holds(gtin: &str) -> bool {
    let digits: Vec<u32> = gtin.bytes().map(|b| u32::from(b - b'0')).collect();

    let sum: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { 3 * d })
        .sum();

    let expected = (10 - sum % 10) % 10;
    expected == digits[12]
}

/// 价格校验: 可解析为数值,严格大于 0 且严格小于上限
fn is_valid_price(price: &str) -> bool {
    match price.parse::<f64>() {
        Ok(value) => value > 0.0 && value < PRICE_MAX_EXCLUSIVE,
        Err(_) => false,
    }
}

/// 语言校验: 允许清单内的成员（大小写不敏感）
fn is_valid_language(language: &str) -> bool {
    let lowered = language.to_lowercase();
    VALID_LANGUAGES.iter().any(|lang| *lang == lowered)
}

/// URL 校验: 结构合法的绝对 URL（scheme + host）
fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}
