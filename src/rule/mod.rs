//! # 规则转换核心
//!
//! 此模块负责：
//! 1. 解析 Mihomo 规则行（TYPE,VALUE）
//! 2. 把规则类型映射到 sing-box 字段，并校验、规范化规则值
//! 3. 按字段聚合为 sing-box source 规则集
//!
//! 不涉及任何文件读写。

pub mod kind;
pub mod parser;
pub mod ruleset;
pub mod validate;

pub use kind::{MatcherField, MatcherKind};
pub use parser::{parse_rule_line, ParsedRule};
pub use ruleset::{RuleEntry, RuleSetBuilder, RuleSetDocument, RuleValue, RULE_SET_VERSION};
pub use validate::is_admissible;

/// 按类型名规范化规则值，须在校验通过后调用
///
/// 未注册的类型原样返回。
pub fn normalize(kind_token: &str, value: &str) -> RuleValue {
    match MatcherKind::from_token(kind_token) {
        Some(kind) => kind.normalize(value),
        None => RuleValue::Text(value.to_string()),
    }
}
