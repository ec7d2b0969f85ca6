// ==========================================
// 商品数据导入系统 - 数据源读取器实现
// ==========================================
// 支持: CSV (.csv) / Excel (.xlsx)
// 约定: 行号从 2 起（第 1 行为表头）,全空行跳过但行号照常消耗
// ==========================================

use crate::domain::RawRow;
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::feed_importer_trait::FeedReader;
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// 表头行占据的行数（数据行号从其后一行开始）
const HEADER_LINES: u64 = 1;

// ==========================================
// CSV 读取器实现
// ==========================================
pub struct CsvFeedReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvFeedReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    /// 指定分隔符（默认逗号）
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl FeedReader for CsvFeedReader {
    fn read(
        &self,
    ) -> ImporterResult<Box<dyn Iterator<Item = ImporterResult<(u64, RawRow)>> + Send>> {
        let path = &self.path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .delimiter(self.delimiter)
            .from_reader(file);

        // 读取表头（无法解析表头视为源级错误）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        Ok(Box::new(CsvRowIter {
            headers,
            records: reader.into_records(),
            next_line: HEADER_LINES + 1,
        }))
    }

    fn estimated_count(&self) -> Option<u64> {
        // 估算值: 按物理行计数,引号内换行会造成偏差
        let file = File::open(&self.path).ok()?;
        let data_lines = BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter(|line| !line.trim().is_empty())
            .count() as u64;
        Some(data_lines.saturating_sub(HEADER_LINES))
    }
}

/// CSV 行迭代器（流式,不整体载入内存）
struct CsvRowIter {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<File>,
    next_line: u64,
}

impl Iterator for CsvRowIter {
    type Item = ImporterResult<(u64, RawRow)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let result = self.records.next()?;
            let line_number = self.next_line;
            self.next_line += 1;

            let record = match result {
                Ok(record) => record,
                // 流中途解析失败: 交给调用方判定（导入流程视为致命）
                Err(e) => return Some(Err(e.into())),
            };

            let mut row: RawRow = RawRow::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = self.headers.get(col_idx) {
                    row.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行（行号已消耗）
            if row.values().all(|v| v.is_empty()) {
                continue;
            }

            return Some(Ok((line_number, row)));
        }
    }
}

// ==========================================
// Excel 读取器实现
// ==========================================
pub struct XlsxFeedReader {
    path: PathBuf,
}

impl XlsxFeedReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 读取第一个工作表为 (行号, 原始行) 列表
    fn load_rows(&self) -> ImporterResult<Vec<(u64, RawRow)>> {
        let path = &self.path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 Excel 文件
        let mut workbook: Xlsx<_> = open_workbook(path)?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        let mut line_number = HEADER_LINES + 1;
        for data_row in rows {
            let current_line = line_number;
            line_number += 1;

            let mut row: RawRow = RawRow::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            // 跳过完全空白的行（行号已消耗）
            if row.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push((current_line, row));
        }

        Ok(records)
    }
}

impl FeedReader for XlsxFeedReader {
    fn read(
        &self,
    ) -> ImporterResult<Box<dyn Iterator<Item = ImporterResult<(u64, RawRow)>> + Send>> {
        let rows = self.load_rows()?;
        Ok(Box::new(rows.into_iter().map(Ok)))
    }

    fn estimated_count(&self) -> Option<u64> {
        Some(self.load_rows().ok()?.len() as u64)
    }
}

// ==========================================
// 通用读取器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFeedReader;

impl UniversalFeedReader {
    pub fn for_path<P: AsRef<Path>>(path: P) -> ImporterResult<Box<dyn FeedReader>> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Box::new(CsvFeedReader::new(path))),
            "xlsx" | "xls" => Ok(Box::new(XlsxFeedReader::new(path))),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
