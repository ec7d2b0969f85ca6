// ==========================================
// 商品数据导入系统 - 导入层
// ==========================================
// 职责: 外部Feed数据导入,生成内部商品记录
// 支持: CSV, Excel
// ==========================================

// 模块声明
pub mod data_importer;
pub mod error;
pub mod feed_importer_trait;
pub mod feed_reader;
pub mod item_mapper;
pub mod item_validator;

// 重导出核心类型
pub use data_importer::DataImporterImpl;
pub use error::{ImportError, ImporterResult};
pub use feed_reader::{CsvFeedReader, UniversalFeedReader, XlsxFeedReader};
pub use item_mapper::{ItemMapper, DEFAULT_STOCK, REQUIRED_COLUMNS};
pub use item_validator::{ItemValidator, VALID_LANGUAGES};

// 重导出 Trait 接口
pub use feed_importer_trait::{FeedImporter, FeedReader, ProgressFn, RecordValidator, RowMapper};
