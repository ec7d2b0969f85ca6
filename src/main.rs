// ==========================================
// 商品数据导入系统 - CLI 主入口
// ==========================================
// 职责: 参数解析、进度呈现、结果输出与退出码映射
// 红线: 管道逻辑全部在库内,CLI 只做呈现
// ==========================================

use chrono::Utc;
use clap::Parser;
use feed_importer::db::{init_schema, open_sqlite_connection};
use feed_importer::importer::{
    DataImporterImpl, FeedImporter, ItemMapper, ItemValidator, UniversalFeedReader,
};
use feed_importer::repository::{ItemRepository, ItemRepositoryImpl};
use feed_importer::{logging, ImportOptions, ImportRun};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 结果明细中最多打印的错误行数
const ERROR_DISPLAY_LIMIT: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "feed-importer")]
#[command(version, about = "商品数据导入系统 - 将产品Feed文件导入数据库")]
struct Cli {
    /// 待导入的Feed文件（.csv / .xlsx）
    file: PathBuf,

    /// 每批落库的记录数
    #[arg(short = 'b', long, default_value_t = 100)]
    batch_size: usize,

    /// 试运行: 完整执行管道但跳过落库
    #[arg(long)]
    dry_run: bool,

    /// 宽松模式: GTIN 校验失败降级为告警（适用于演示数据）
    #[arg(long)]
    skip_gtin_validation: bool,

    /// SQLite 数据库文件路径
    #[arg(long, default_value = "feed_importer.db")]
    database: String,

    /// 显示进度条与错误明细
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    let cli = Cli::parse();

    info!("==================================================");
    info!("{} v{}", feed_importer::APP_NAME, feed_importer::VERSION);
    info!("==================================================");

    // 前置检查: 文件必须存在且可读
    if !cli.file.is_file() {
        error!(file = %cli.file.display(), "文件不存在");
        anyhow::bail!("文件不存在: {}", cli.file.display());
    }

    let batch_size = cli.batch_size.max(1);
    let options = ImportOptions {
        batch_size,
        dry_run: cli.dry_run,
        skip_gtin_validation: cli.skip_gtin_validation,
    };

    println!("商品数据导入");
    println!("  文件:      {}", cli.file.display());
    println!("  批大小:    {}", batch_size);
    println!("  模式:      {}", if cli.dry_run { "试运行" } else { "正式导入" });
    println!(
        "  GTIN 校验: {}",
        if cli.skip_gtin_validation { "宽松" } else { "严格" }
    );
    println!();

    // 数据源与仓储装配
    let reader = UniversalFeedReader::for_path(&cli.file)?;

    let conn = open_sqlite_connection(&cli.database)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let item_repo = ItemRepositoryImpl::with_connection(conn.clone());
    let importer = DataImporterImpl::new(
        item_repo,
        Box::new(ItemMapper),
        Box::new(ItemValidator),
    );

    // 进度条（仅 verbose 且可估算总行数时）
    let bar = if cli.verbose {
        reader.estimated_count().map(|total| {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} 行")
                    .expect("进度条模板不合法")
                    .progress_chars("#>-"),
            );
            pb
        })
    } else {
        None
    };

    let progress: Option<Box<dyn Fn(u64, Option<u64>) + Send + Sync>> =
        bar.clone().map(|pb| {
            Box::new(move |processed: u64, _total: Option<u64>| {
                pb.set_position(processed);
            }) as Box<dyn Fn(u64, Option<u64>) + Send + Sync>
        });

    // 执行导入
    let started_at = Utc::now();
    let start = Instant::now();
    let result = importer
        .import(reader.as_ref(), &options, progress.as_deref())
        .await;
    let elapsed = start.elapsed();

    if let Some(pb) = &bar {
        pb.finish_and_clear();
    }

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            // 致命错误: 无聚合结果,已提交批次保持已提交
            error!(error = %e, "导入中止");
            return Err(e.into());
        }
    };

    // 结果输出
    println!("导入结果");
    println!("  状态: {}", result.status);
    println!("  读取: {}", result.processed);
    println!("  导入: {}", result.imported);
    println!("  跳过: {}", result.skipped);

    if cli.verbose && !result.errors.is_empty() {
        println!();
        println!("错误明细（前 {} 行）", ERROR_DISPLAY_LIMIT);
        for (line, messages) in result.errors.iter().take(ERROR_DISPLAY_LIMIT) {
            println!("  行 {}: {}", line, messages.join(", "));
        }
        let remaining = result.errors.len().saturating_sub(ERROR_DISPLAY_LIMIT);
        if remaining > 0 {
            println!("  ... 另有 {} 行错误", remaining);
        }
    }

    // 运行审计（试运行不落任何记录）
    if !cli.dry_run {
        let audit_repo = ItemRepositoryImpl::with_connection(conn.clone());
        let run = ImportRun {
            run_id: Uuid::new_v4().to_string(),
            file_name: cli
                .file
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.to_string()),
            status: result.status,
            processed: result.processed as i64,
            imported: result.imported as i64,
            skipped: result.skipped as i64,
            dry_run: false,
            errors_json: serde_json::to_string(&result.errors).ok(),
            started_at,
            elapsed_ms: elapsed.as_millis() as i64,
        };

        if let Err(e) = audit_repo.insert_run(run).await {
            // 审计失败不改变导入结果,只告警
            warn!(error = %e, "导入运行审计写入失败");
        }
    }

    std::process::exit(result.status.exit_code());
}
