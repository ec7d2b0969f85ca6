// ==========================================
// 商品数据导入系统 - 领域类型定义
// ==========================================
// 职责: 定义导入结果状态与校验错误类别
// 红线: 错误文案是类别标签的纯函数,不携带状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 导入状态 (Import Status)
// ==========================================
// 序列化格式: snake_case (与退出码映射一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Success,        // 全部行导入成功
    PartialFailure, // 部分行被跳过
    Failed,         // 无任何行导入成功
}

impl ImportStatus {
    /// 进程退出码映射
    ///
    /// # 返回
    /// - Success: 0
    /// - PartialFailure: 1
    /// - Failed: 2
    pub fn exit_code(&self) -> i32 {
        match self {
            ImportStatus::Success => 0,
            ImportStatus::PartialFailure => 1,
            ImportStatus::Failed => 2,
        }
    }

    /// 数据库存储用文本（与 serde 格式一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Success => "success",
            ImportStatus::PartialFailure => "partial_failure",
            ImportStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 校验错误类别 (Validation Error)
// ==========================================
// 封闭枚举: 每条规则恰好对应一个类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    InvalidGtin,          // GTIN 格式或校验位错误
    InvalidPrice,         // 价格非正数或超出上限
    InvalidStock,         // 库存为负
    InvalidLanguage,      // 语言代码不在允许清单
    InvalidUrl,           // 图片 URL 结构非法
    MissingRequiredField, // 必填字段为空
}

impl ValidationError {
    /// 类别标签（与 serde 格式一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationError::InvalidGtin => "invalid_gtin",
            ValidationError::InvalidPrice => "invalid_price",
            ValidationError::InvalidStock => "invalid_stock",
            ValidationError::InvalidLanguage => "invalid_language",
            ValidationError::InvalidUrl => "invalid_url",
            ValidationError::MissingRequiredField => "missing_required_field",
        }
    }

    /// 人类可读文案
    ///
    /// 红线: 文案只依赖类别本身
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::InvalidGtin => "GTIN 格式或校验位不合法",
            ValidationError::InvalidPrice => "价格必须为正数且低于上限",
            ValidationError::InvalidStock => "库存不能为负数",
            ValidationError::InvalidLanguage => "语言代码不合法",
            ValidationError::InvalidUrl => "图片 URL 格式不合法",
            ValidationError::MissingRequiredField => "必填字段为空",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
