//! # 批量转换
//!
//! 递归扫描源目录下的 YAML 文件，逐个转换并按相同的相对路径写入输出目录
//! （扩展名改为 `.json`）。
//!
//! ## 流程
//! 1. 检查源目录，创建输出目录
//! 2. 按扩展名收集输入文件
//! 3. 处理输出路径冲突（如 `a.yaml` 与 `a.yml`）
//! 4. 并行转换，单个文件失败不影响其他文件
//! 5. 汇总成功/失败数量

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::convert::{convert_yaml_with_report, to_json};

/// 默认的输入文件扩展名
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// 输出文件扩展名
pub const OUTPUT_EXTENSION: &str = "json";

// ========================================
// 批量转换配置
// ========================================

/// 批量转换配置
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 源目录
    pub source: PathBuf,
    /// 输出目录
    pub output: PathBuf,
    /// 输入文件扩展名（不含点，区分大小写）
    pub extensions: Vec<String>,
    /// 并行线程数，`None` 表示使用 rayon 默认值
    pub jobs: Option<usize>,
}

impl BatchOptions {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            jobs: None,
        }
    }
}

// ========================================
// 转换结果汇总
// ========================================

/// 单个失败的文件
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// 批量转换结果
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// 找到的输入文件数
    pub found: usize,
    /// 转换成功数
    pub succeeded: usize,
    /// 转换失败的文件
    pub failed: Vec<FileFailure>,
    /// 因输出路径冲突被跳过的文件
    pub shadowed: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

// ========================================
// 文件发现
// ========================================

/// 收集源目录下所有匹配扩展名的文件
///
/// 按扩展名在配置中的顺序分组，组内按路径排序，保证结果稳定。
pub fn discover_inputs(source: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(source)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.path().is_file())
        .filter(|entry| extension_rank(entry.path(), extensions).is_some())
        .map(|entry| entry.into_path())
        .collect();

    files.sort_by(|a, b| {
        extension_rank(a, extensions)
            .cmp(&extension_rank(b, extensions))
            .then_with(|| a.cmp(b))
    });
    files
}

fn extension_rank(path: &Path, extensions: &[String]) -> Option<usize> {
    let ext = path.extension()?.to_str()?;
    extensions.iter().position(|e| e == ext)
}

/// 输入文件对应的输出路径：保持相对路径，扩展名改为 `.json`
pub fn output_path_for(source: &Path, output: &Path, input: &Path) -> Result<PathBuf> {
    let relative = input.strip_prefix(source).with_context(|| {
        format!(
            "{} is not inside {}",
            input.display(),
            source.display()
        )
    })?;
    Ok(output.join(relative).with_extension(OUTPUT_EXTENSION))
}

/// 计算每个输入的输出路径，冲突时后出现的文件优先
///
/// 返回 (待转换列表, 被覆盖的输入)
fn plan_outputs(
    source: &Path,
    output: &Path,
    inputs: Vec<PathBuf>,
) -> Result<(Vec<(PathBuf, PathBuf)>, Vec<PathBuf>)> {
    let mut jobs: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(inputs.len());
    let mut shadowed = Vec::new();

    for input in inputs {
        let target = output_path_for(source, output, &input)?;
        if let Some(pos) = jobs.iter().position(|(_, t)| *t == target) {
            let (previous, _) = jobs.remove(pos);
            tracing::warn!(
                "{} and {} both map to {}, keeping the latter",
                previous.display(),
                input.display(),
                target.display()
            );
            shadowed.push(previous);
        }
        jobs.push((input, target));
    }

    Ok((jobs, shadowed))
}

// ========================================
// 批量转换
// ========================================

/// 转换单个文件并写入目标路径
pub fn convert_file(input: &Path, target: &Path) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let report = convert_yaml_with_report(&content)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    tracing::debug!(
        "{}: {} lines, {} accepted, {} skipped",
        input.display(),
        report.total_lines,
        report.accepted,
        report.skipped()
    );

    let json = to_json(&report.document)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(target, json).with_context(|| format!("Failed to write {}", target.display()))?;

    Ok(())
}

/// 执行批量转换
pub fn run_batch(options: &BatchOptions) -> Result<BatchSummary> {
    let source = &options.source;
    if !source.is_dir() {
        anyhow::bail!("Source directory does not exist: {}", source.display());
    }

    fs::create_dir_all(&options.output).with_context(|| {
        format!(
            "Failed to create output directory {}",
            options.output.display()
        )
    })?;

    let inputs = discover_inputs(source, &options.extensions);
    let mut summary = BatchSummary {
        found: inputs.len(),
        ..Default::default()
    };

    if inputs.is_empty() {
        tracing::warn!("No YAML files found in {}", source.display());
        return Ok(summary);
    }

    tracing::info!("Found {} YAML files", inputs.len());

    let (jobs, shadowed) = plan_outputs(source, &options.output, inputs)?;
    summary.shadowed = shadowed;

    let convert_all = || -> Vec<(PathBuf, Result<()>)> {
        jobs.par_iter()
            .map(|(input, target)| (input.clone(), convert_file(input, target)))
            .collect()
    };

    let results = match options.jobs {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("Failed to build thread pool")?
            .install(convert_all),
        None => convert_all(),
    };

    // par_iter().collect() 保持输入顺序
    for (path, result) in results {
        match result {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                tracing::debug!("conversion failed: {:#}", e);
                summary.failed.push(FileFailure {
                    path,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    Ok(summary)
}
