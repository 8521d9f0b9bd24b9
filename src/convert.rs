//! # 单文件转换
//!
//! 读取 Mihomo rule-provider 的 YAML 文本，提取 `payload` 列表，
//! 逐行经过 解析 → 类型映射 → 校验 → 规范化 → 聚合，输出 sing-box 规则集。
//!
//! ## 错误处理
//! - 单行无法解析、类型未知、值校验失败：静默丢弃
//! - YAML 语法错误、缺少 `payload` 或 `payload` 不是列表：整个文件失败

use serde_yaml::Value;
use thiserror::Error;

use crate::rule::{parse_rule_line, MatcherKind, RuleSetBuilder, RuleSetDocument};

/// 文档级错误，单行错误不会出现在这里
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("top-level YAML value is not a mapping")]
    NotMapping,
    #[error("missing `payload` field")]
    MissingPayload,
    #[error("`payload` is not a list")]
    PayloadNotSequence,
}

/// 转换结果及行数统计
#[derive(Debug)]
pub struct ConversionReport {
    pub document: RuleSetDocument,
    /// `payload` 中字符串行的数量
    pub total_lines: usize,
    /// 被接受的行数
    pub accepted: usize,
}

impl ConversionReport {
    /// 被丢弃的行数
    pub fn skipped(&self) -> usize {
        self.total_lines - self.accepted
    }
}

/// 转换一组规则行
pub fn convert_lines<'a, I>(lines: I) -> RuleSetDocument
where
    I: IntoIterator<Item = &'a str>,
{
    convert_lines_with_report(lines).document
}

fn convert_lines_with_report<'a, I>(lines: I) -> ConversionReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = RuleSetBuilder::new();
    let mut total_lines = 0;

    for line in lines {
        total_lines += 1;

        let Some(rule) = parse_rule_line(line) else {
            continue;
        };

        let Some(kind) = MatcherKind::from_token(rule.kind) else {
            tracing::trace!("unsupported rule type: {}", rule.kind);
            continue;
        };

        if !kind.is_admissible(rule.value) {
            tracing::trace!("rejected {} value: {}", kind, rule.value);
            continue;
        }

        builder.add(kind.field(), kind.normalize(rule.value));
    }

    let accepted = builder.len();
    ConversionReport {
        document: builder.build(),
        total_lines,
        accepted,
    }
}

/// 转换 YAML 文本
pub fn convert_yaml(content: &str) -> Result<RuleSetDocument, ConvertError> {
    convert_yaml_with_report(content).map(|report| report.document)
}

/// 转换 YAML 文本，同时返回行数统计
pub fn convert_yaml_with_report(content: &str) -> Result<ConversionReport, ConvertError> {
    let root: Value = serde_yaml::from_str(content)?;

    let Value::Mapping(root) = root else {
        return Err(ConvertError::NotMapping);
    };

    let payload = root.get("payload").ok_or(ConvertError::MissingPayload)?;
    let Value::Sequence(items) = payload else {
        return Err(ConvertError::PayloadNotSequence);
    };

    // 非字符串元素直接跳过
    let lines = items.iter().filter_map(Value::as_str);

    Ok(convert_lines_with_report(lines))
}

/// 序列化为带缩进的 JSON，不转义非 ASCII 字符，末尾无换行
pub fn to_json(document: &RuleSetDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}
