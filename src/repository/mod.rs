// ==========================================
// 商品数据导入系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod item_repo;
pub mod item_repo_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use item_repo::ItemRepository;
pub use item_repo_impl::ItemRepositoryImpl;
