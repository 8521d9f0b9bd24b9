//! # ruleset-convert
//!
//! CLI 工具，把 Mihomo (Clash Meta) 的 rule-provider YAML 转换为
//! sing-box 的 source 规则集 JSON。
//!
//! ## 功能
//! - 递归扫描源目录下的 `.yaml` / `.yml` 文件
//! - 解析 `payload` 中的规则行，按规则类型分组输出
//! - 支持的规则类型:
//!   - DOMAIN / DOMAIN-SUFFIX / DOMAIN-KEYWORD / DOMAIN-REGEX
//!   - IP-CIDR / IP-CIDR6 / SRC-IP-CIDR
//!   - DST-PORT / SRC-PORT / NETWORK
//!   - PROCESS-NAME / PROCESS-PATH / PROCESS-PATH-REGEX
//! - 不支持或不合法的规则行静默跳过
//!
//! ## 使用
//! ```bash
//! # 转换整个目录，输出目录保持相同的子目录结构
//! ruleset-convert ./mihomo-rules ./sing-box-rules
//!
//! # 只转换 .yaml 文件，使用 4 个线程
//! ruleset-convert ./mihomo-rules ./sing-box-rules --ext yaml -j 4
//!
//! # 显示调试信息（或使用 RUST_LOG=debug）
//! ruleset-convert ./mihomo-rules ./sing-box-rules --debug
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ruleset_convert::batch::{self, BatchOptions, BatchSummary};

// ========================================
// CLI 参数定义
// ========================================

/// Mihomo 规则集 → sing-box 规则集转换工具
#[derive(Parser)]
#[command(name = "ruleset-convert")]
#[command(version)]
#[command(about = "Convert Mihomo rule-provider YAML files into sing-box source rule-sets")]
struct Cli {
    /// 源目录路径（包含 YAML 文件）
    source: PathBuf,

    /// 输出目录路径（保存 JSON 文件）
    output: PathBuf,

    /// 输入文件扩展名，可重复指定
    #[arg(long = "ext", value_name = "EXT", default_values_t = batch::DEFAULT_EXTENSIONS.map(String::from))]
    extensions: Vec<String>,

    /// 并行线程数（默认等于 CPU 核数）
    #[arg(long, short = 'j', value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    jobs: Option<u16>,

    /// 显示调试信息
    #[arg(long, conflicts_with = "quiet")]
    debug: bool,

    /// 只输出警告和错误
    #[arg(long, short = 'q')]
    quiet: bool,
}

// ========================================
// 主函数
// ========================================

fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    init_logging(cli.debug, cli.quiet);

    let options = BatchOptions {
        source: cli.source,
        output: cli.output,
        extensions: cli
            .extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect(),
        jobs: cli.jobs.map(usize::from),
    };

    // 处理错误
    match run(&options, cli.quiet) {
        Ok(summary) if summary.has_failures() => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// 初始化日志，`RUST_LOG` 优先于命令行参数
fn init_logging(debug: bool, quiet: bool) {
    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ========================================
// 转换命令实现
// ========================================

/// 执行批量转换并打印汇总
fn run(options: &BatchOptions, quiet: bool) -> Result<BatchSummary> {
    let summary = batch::run_batch(options)?;

    if summary.found == 0 {
        return Ok(summary);
    }

    for failure in &summary.failed {
        println!("Failed: {}: {}", failure.path.display(), failure.error);
    }

    if !quiet {
        for path in &summary.shadowed {
            println!("Skipped (output overwritten): {}", path.display());
        }
        println!(
            "Converted: {} succeeded, {} failed",
            summary.succeeded,
            summary.failed.len()
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["ruleset-convert", "src", "out"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("src"));
        assert_eq!(cli.output, PathBuf::from("out"));
        assert_eq!(cli.extensions, vec!["yaml".to_string(), "yml".to_string()]);
        assert_eq!(cli.jobs, None);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "ruleset-convert", "src", "out", "--ext", "yaml", "-j", "4", "--debug",
        ])
        .unwrap();
        assert_eq!(cli.extensions, vec!["yaml".to_string()]);
        assert_eq!(cli.jobs, Some(4));
        assert!(cli.debug);

        assert!(Cli::try_parse_from(["ruleset-convert", "src", "out", "-j", "0"]).is_err());
        assert!(Cli::try_parse_from(["ruleset-convert", "src", "out", "--debug", "-q"]).is_err());
        assert!(Cli::try_parse_from(["ruleset-convert", "src"]).is_err());
    }
}
