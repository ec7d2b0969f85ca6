// ==========================================
// 商品数据导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 产品 Feed 批量导入与校验工具
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ImportStatus, ValidationError};

// 领域实体
pub use domain::{ImportOptions, ImportResult, ImportRun, Item, RawRow, ValidationOutcome};

// 导入管道
pub use importer::{
    CsvFeedReader, DataImporterImpl, FeedImporter, FeedReader, ImportError, ItemMapper,
    ItemValidator, RecordValidator, RowMapper, UniversalFeedReader, XlsxFeedReader,
};

// 仓储
pub use repository::{ItemRepository, ItemRepositoryImpl, RepositoryError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商品数据导入系统";

// ==========================================
// 预编译检查
// ==========================================
