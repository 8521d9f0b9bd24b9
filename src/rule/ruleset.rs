//! # sing-box 规则集
//!
//! 按输出字段聚合规则值，并生成 `{ "version": 3, "rules": [...] }` 结构。
//! 字段按首次出现的顺序输出，保证多次转换结果逐字节一致。

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::kind::MatcherField;

/// sing-box source 规则集格式版本
pub const RULE_SET_VERSION: u32 = 3;

// ========================================
// 规则值
// ========================================

/// 规范化后的规则值
///
/// 端口输出为 JSON 整数，其余输出为字符串。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RuleValue {
    Port(u16),
    Text(String),
}

impl From<&str> for RuleValue {
    fn from(text: &str) -> Self {
        RuleValue::Text(text.to_string())
    }
}

// ========================================
// 规则集文档
// ========================================

/// 单个字段及其所有值，序列化为只有一个键的对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub field: MatcherField,
    pub values: Vec<RuleValue>,
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field.as_str(), &self.values)?;
        map.end()
    }
}

/// 最终输出的规则集
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSetDocument {
    pub version: u32,
    pub rules: Vec<RuleEntry>,
}

impl RuleSetDocument {
    /// 所有字段中规则值的总数
    pub fn rule_count(&self) -> usize {
        self.rules.iter().map(|e| e.values.len()).sum()
    }
}

impl Default for RuleSetDocument {
    fn default() -> Self {
        Self {
            version: RULE_SET_VERSION,
            rules: Vec::new(),
        }
    }
}

// ========================================
// 聚合器
// ========================================

/// 规则聚合器
///
/// 字段数量最多十几个，线性查找即可保持插入顺序。不做去重。
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    entries: Vec<RuleEntry>,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个值，字段首次出现时创建
    pub fn add(&mut self, field: MatcherField, value: RuleValue) {
        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(entry) => entry.values.push(value),
            None => self.entries.push(RuleEntry {
                field,
                values: vec![value],
            }),
        }
    }

    /// 已收集的值总数
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 生成规则集文档
    pub fn build(self) -> RuleSetDocument {
        RuleSetDocument {
            version: RULE_SET_VERSION,
            rules: self.entries,
        }
    }
}
