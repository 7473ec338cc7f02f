// ==========================================
// 车队台账导入导出系统 - 命令行入口
// ==========================================
// 用法:
//   fleet-records analyze <file>
//   fleet-records import <file> <sheet>... [--clear] [--as <sheet>=<entity>]...
//   fleet-records export <output.xlsx> [table]...
//   fleet-records stats
//   fleet-records clear [table]
// 输出: JSON（stdout）；日志写 stderr
// 配置: FLEET_* 环境变量，见 config::AppConfig
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use fleet_records::config::AppConfig;
use fleet_records::domain::ImportRequest;
use fleet_records::{logging, FleetApi};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

const USAGE: &str = "\
用法:
  fleet-records analyze <file>
  fleet-records import <file> <sheet>... [--clear] [--as <sheet>=<entity>]...
  fleet-records export <output.xlsx> [table]...
  fleet-records stats
  fleet-records clear [table]";

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();
    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", fleet_records::APP_NAME, fleet_records::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    let rest: Vec<String> = args.collect();

    let api = FleetApi::open(config)
        .await
        .context("存储初始化失败")?;

    let result = run(&api, &command, &rest).await;
    api.close().await;
    if !result? {
        std::process::exit(1);
    }
    Ok(())
}

/// 执行子命令
///
/// # 返回
/// - Ok(false): 操作已执行但结果为失败（退出码 1）
async fn run(api: &FleetApi, command: &str, args: &[String]) -> Result<bool> {
    match command {
        "analyze" => {
            let file = args.first().ok_or_else(|| anyhow!("缺少文件路径\n{}", USAGE))?;
            let response = api.analyze(&PathBuf::from(file)).await;
            print_json(&response)?;
            Ok(response.success)
        }
        "import" => {
            let (file, request) = parse_import_args(args)?;
            let outcome = api.import(&file, &request).await;
            print_json(&outcome)?;
            Ok(outcome.success)
        }
        "export" => {
            let output = args.first().ok_or_else(|| anyhow!("缺少输出路径\n{}", USAGE))?;
            let tables = &args[1..];
            let tables = if tables.is_empty() { None } else { Some(tables) };
            let outcome = api.export(&PathBuf::from(output), tables).await;
            print_json(&outcome)?;
            Ok(outcome.success)
        }
        "stats" => {
            print_json(&api.stats().await?)?;
            Ok(true)
        }
        "clear" => {
            match args.first() {
                Some(table) => {
                    api.clear_table(table).await?;
                }
                None => api.clear_all().await?,
            }
            print_json(&api.stats().await?)?;
            Ok(true)
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }
}

/// 解析 import 子命令参数
fn parse_import_args(args: &[String]) -> Result<(PathBuf, ImportRequest)> {
    let mut iter = args.iter();
    let file = iter
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("缺少文件路径\n{}", USAGE))?;

    let mut selected_sheets = Vec::new();
    let mut entity_overrides = HashMap::new();
    let mut clear_existing = false;
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--clear" => clear_existing = true,
            "--as" => {
                let mapping = iter.next().ok_or_else(|| anyhow!("--as 缺少 <sheet>=<entity>"))?;
                let (sheet, entity) = mapping
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--as 参数格式应为 <sheet>=<entity>: {}", mapping))?;
                entity_overrides.insert(sheet.to_string(), entity.to_string());
            }
            sheet => selected_sheets.push(sheet.to_string()),
        }
    }

    Ok((
        file,
        ImportRequest {
            selected_sheets,
            entity_overrides,
            clear_existing,
        },
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
