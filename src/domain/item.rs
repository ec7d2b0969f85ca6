// ==========================================
// 商品数据导入系统 - 商品领域模型
// ==========================================
// 职责: 定义商品记录与单条校验结论
// 红线: Item 一经映射不可变,价格以十进制文本保存(不用浮点,避免精度损失)
// ==========================================

use crate::domain::types::ValidationError;
use serde::{Deserialize, Serialize};

// ==========================================
// Item - 商品记录
// ==========================================
// 用途: 映射层产出,校验层与仓储层只读
// 身份键: gtin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub gtin: String,        // 商品 GTIN（8-14 位数字串）
    pub language: String,    // 语言代码（两位,如 "de"）
    pub title: String,       // 商品标题
    pub picture: String,     // 图片 URL
    pub description: String, // 商品描述
    pub price: String,       // 价格（两位小数文本,如 "19.99"）
    pub stock: i64,          // 库存数量
}

// ==========================================
// ValidationOutcome - 单条校验结论
// ==========================================
// 用途: 校验层产出,每条规则最多追加一个类别
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,                // 是否全部规则通过
    pub errors: Vec<ValidationError>,  // 失败类别（按规则评估顺序,无重复）
}

impl ValidationOutcome {
    /// 构造结论（is_valid 由类别列表推出）
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// 是否包含指定类别
    pub fn contains(&self, error: ValidationError) -> bool {
        self.errors.contains(&error)
    }

    /// 每个失败类别的人类可读文案
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_valid_when_no_errors() {
        let outcome = ValidationOutcome::new(vec![]);
        assert!(outcome.is_valid);
        assert!(outcome.error_messages().is_empty());
    }

    #[test]
    fn test_outcome_invalid_with_errors() {
        let outcome = ValidationOutcome::new(vec![
            ValidationError::InvalidGtin,
            ValidationError::InvalidPrice,
        ]);
        assert!(!outcome.is_valid);
        assert!(outcome.contains(ValidationError::InvalidGtin));
        assert_eq!(outcome.error_messages().len(), 2);
    }
}
