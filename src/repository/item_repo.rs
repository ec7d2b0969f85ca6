// ==========================================
// 商品数据导入系统 - 商品仓储 Trait
// ==========================================
// 职责: 定义商品与导入运行的数据访问接口（不包含实现）
// 红线: Repository 不含业务规则,只做数据 CRUD
// ==========================================

use crate::domain::{ImportRun, Item};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ItemRepository Trait
// ==========================================
// 用途: 商品数据访问
// 实现者: ItemRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ItemRepository: Send + Sync {
    // ===== 批量写入（事务化）=====

    /// 批量幂等写入商品（INSERT ... ON CONFLICT(gtin) DO UPDATE 策略）
    ///
    /// # 参数
    /// - items: 商品列表（空列表为 no-op）
    ///
    /// # 返回
    /// - Ok(usize): 成功写入的记录数
    /// - Err: 数据库错误（整个事务回滚,整批丢弃）
    ///
    /// # 说明
    /// - 冲突键为 gtin;冲突时覆盖全部非键字段并刷新 updated_at
    /// - 批内任一条失败即整批回滚,调用方通过批大小控制损失半径
    async fn upsert_batch(&self, items: &[Item]) -> RepositoryResult<usize>;

    /// 单条幂等写入（单元素批的语法糖）
    async fn upsert(&self, item: &Item) -> RepositoryResult<()>;

    // ===== 查询与校验 =====

    /// 按 GTIN 查询商品（导入热路径之外,供外部核验）
    ///
    /// # 返回
    /// - Ok(Some(item)): 找到记录
    /// - Ok(None): 不存在
    async fn find_by_gtin(&self, gtin: &str) -> RepositoryResult<Option<Item>>;

    /// 统计 items 表记录数
    async fn count_items(&self) -> RepositoryResult<usize>;

    // ===== 导入运行审计 =====

    /// 写入一条导入运行记录
    async fn insert_run(&self, run: ImportRun) -> RepositoryResult<()>;

    /// 查询最近的导入运行（按开始时间倒序）
    ///
    /// # 参数
    /// - limit: 返回记录数上限
    async fn recent_runs(&self, limit: usize) -> RepositoryResult<Vec<ImportRun>>;
}
