// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、Feed 文件生成等功能
// ==========================================

use feed_importer::db::init_schema;
use feed_importer::Item;
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
#[allow(dead_code)]
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 写入临时 CSV Feed 文件（首行为表头）
#[allow(dead_code)]
pub fn write_feed_csv(lines: &[&str]) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("创建临时 CSV 失败");

    for line in lines {
        writeln!(temp_file, "{}", line).expect("写入临时 CSV 失败");
    }

    temp_file
}

/// 标准 Feed 表头（与必需列一致）
#[allow(dead_code)]
pub const FEED_HEADER: &str = "gtin,language,title,picture,description,price,stock";

/// 构造一条合法的 Feed 数据行
#[allow(dead_code)]
pub fn valid_feed_line(gtin: &str, title: &str) -> String {
    format!(
        "{},de,{},http://example.com/img.jpg,Beschreibung,19.99,10",
        gtin, title
    )
}

/// 构造测试用商品记录
#[allow(dead_code)]
pub fn make_item(gtin: &str, title: &str, price: &str, stock: i64) -> Item {
    Item {
        gtin: gtin.to_string(),
        language: "de".to_string(),
        title: title.to_string(),
        picture: "http://example.com/img.jpg".to_string(),
        description: "Beschreibung".to_string(),
        price: price.to_string(),
        stock,
    }
}
