// ==========================================
// 商品数据导入系统 - 商品仓储实现
// ==========================================
// 职责: items / import_run 表的数据访问（rusqlite）
// 约定: 批量写入单事务覆盖整批,任一条失败整批回滚
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::ImportStatus;
use crate::domain::{ImportRun, Item};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::item_repo::ItemRepository;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex};

/// 导入状态文本 → 枚举（数据库存 snake_case 文本）
fn parse_import_status(raw: &str) -> ImportStatus {
    match raw.trim() {
        "success" => ImportStatus::Success,
        "partial_failure" => ImportStatus::PartialFailure,
        _ => ImportStatus::Failed,
    }
}

// ==========================================
// ItemRepositoryImpl
// ==========================================
pub struct ItemRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ItemRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 复用外部已打开的连接（连接句柄归调用方所有,可跨多次导入顺序复用）
    pub fn with_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 在事务中批量幂等写入商品
    fn upsert_batch_tx(tx: &Transaction, items: &[Item]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO items (
                gtin, language, title, picture, description, price, stock
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7
            )
            ON CONFLICT(gtin) DO UPDATE SET
                language = excluded.language,
                title = excluded.title,
                picture = excluded.picture,
                description = excluded.description,
                price = excluded.price,
                stock = excluded.stock,
                updated_at = datetime('now')
            "#,
        )?;

        let mut count = 0;
        for item in items {
            stmt.execute(params![
                item.gtin,
                item.language,
                item.title,
                item.picture,
                item.description,
                item.price,
                item.stock,
            ])?;
            count += 1;
        }

        Ok(count)
    }

    fn lock_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ItemRepository for ItemRepositoryImpl {
    async fn upsert_batch(&self, items: &[Item]) -> RepositoryResult<usize> {
        // 空批 no-op,不开事务
        if items.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = match Self::upsert_batch_tx(&tx, items) {
            Ok(count) => count,
            Err(e) => {
                // 整批回滚,已提交的历史批次不受影响
                let _ = tx.rollback();
                return Err(e);
            }
        };

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(count)
    }

    async fn upsert(&self, item: &Item) -> RepositoryResult<()> {
        self.upsert_batch(std::slice::from_ref(item)).await?;
        Ok(())
    }

    async fn find_by_gtin(&self, gtin: &str) -> RepositoryResult<Option<Item>> {
        let conn = self.lock_conn()?;

        let item = conn
            .query_row(
                r#"
                SELECT gtin, language, title, picture, description, price, stock
                FROM items
                WHERE gtin = ?1
                "#,
                params![gtin],
                |row| {
                    Ok(Item {
                        gtin: row.get(0)?,
                        language: row.get(1)?,
                        title: row.get(2)?,
                        picture: row.get(3)?,
                        description: row.get(4)?,
                        price: row.get(5)?,
                        stock: row.get(6)?,
                    })
                },
            )
            .optional()?;

        Ok(item)
    }

    async fn count_items(&self) -> RepositoryResult<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn insert_run(&self, run: ImportRun) -> RepositoryResult<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            INSERT INTO import_run (
                run_id, file_name, status, processed, imported, skipped,
                dry_run, errors_json, started_at, elapsed_ms
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
            )
            "#,
            params![
                run.run_id,
                run.file_name,
                run.status.as_str(),
                run.processed,
                run.imported,
                run.skipped,
                run.dry_run as i32,
                run.errors_json,
                run.started_at.to_rfc3339(),
                run.elapsed_ms,
            ],
        )?;

        Ok(())
    }

    async fn recent_runs(&self, limit: usize) -> RepositoryResult<Vec<ImportRun>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, file_name, status, processed, imported, skipped,
                   dry_run, errors_json, started_at, elapsed_ms
            FROM import_run
            ORDER BY started_at DESC
            LIMIT ?1
            "#,
        )?;

        let runs = stmt
            .query_map(params![limit as i64], |row| {
                let status_raw: String = row.get(2)?;
                let started_at_raw: String = row.get(8)?;
                Ok(ImportRun {
                    run_id: row.get(0)?,
                    file_name: row.get(1)?,
                    status: parse_import_status(&status_raw),
                    processed: row.get(3)?,
                    imported: row.get(4)?,
                    skipped: row.get(5)?,
                    dry_run: row.get::<_, i32>(6)? != 0,
                    errors_json: row.get(7)?,
                    started_at: DateTime::parse_from_rfc3339(&started_at_raw)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                    elapsed_ms: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }
}
