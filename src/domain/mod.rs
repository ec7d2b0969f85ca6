// ==========================================
// 商品数据导入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型与导入流程数据结构
// 红线: 不含数据访问逻辑,不含管道逻辑
// ==========================================

pub mod import;
pub mod item;
pub mod types;

// 重导出核心类型
pub use import::{ImportOptions, ImportResult, ImportRun, RawRow};
pub use item::{Item, ValidationOutcome};
pub use types::{ImportStatus, ValidationError};
