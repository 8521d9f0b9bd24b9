//! # ruleset-convert
//!
//! Mihomo rule-provider → sing-box source 规则集转换库。
//!
//! - [`rule`]: 规则行解析、类型映射、校验、规范化与聚合（纯内存计算）
//! - [`convert`]: 单个 YAML 文档的转换
//! - [`batch`]: 目录级批量转换

pub mod batch;
pub mod convert;
pub mod rule;

pub use convert::{convert_lines, convert_yaml, to_json, ConvertError};
pub use rule::{RuleSetDocument, RuleValue};
