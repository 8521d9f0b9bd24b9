//! # 规则类型注册表
//!
//! Mihomo 规则类型 (DOMAIN-SUFFIX, IP-CIDR 等) 到 sing-box 规则字段的固定映射。
//! 每种类型绑定一个校验函数和一个规范化函数，查表分发。

use std::fmt;

use serde::Serialize;

use super::ruleset::RuleValue;
use super::validate;

// ========================================
// 源规则类型
// ========================================

/// Mihomo 规则类型（仅包含可转换的部分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Domain,
    DomainSuffix,
    DomainKeyword,
    DomainRegex,
    IpCidr,
    IpCidr6,
    SrcIpCidr,
    DstPort,
    SrcPort,
    Network,
    ProcessName,
    ProcessPath,
    ProcessPathRegex,
}

impl MatcherKind {
    /// 按规则类型名精确查找（区分大小写）
    ///
    /// 未知类型返回 `None`，调用方直接丢弃该行。
    pub fn from_token(token: &str) -> Option<Self> {
        let kind = match token {
            "DOMAIN" => MatcherKind::Domain,
            "DOMAIN-SUFFIX" => MatcherKind::DomainSuffix,
            "DOMAIN-KEYWORD" => MatcherKind::DomainKeyword,
            "DOMAIN-REGEX" => MatcherKind::DomainRegex,
            "IP-CIDR" => MatcherKind::IpCidr,
            "IP-CIDR6" => MatcherKind::IpCidr6,
            "SRC-IP-CIDR" => MatcherKind::SrcIpCidr,
            "DST-PORT" => MatcherKind::DstPort,
            "SRC-PORT" => MatcherKind::SrcPort,
            "NETWORK" => MatcherKind::Network,
            "PROCESS-NAME" => MatcherKind::ProcessName,
            "PROCESS-PATH" => MatcherKind::ProcessPath,
            "PROCESS-PATH-REGEX" => MatcherKind::ProcessPathRegex,
            _ => return None,
        };
        Some(kind)
    }

    /// Mihomo 中的类型名
    pub fn token(self) -> &'static str {
        match self {
            MatcherKind::Domain => "DOMAIN",
            MatcherKind::DomainSuffix => "DOMAIN-SUFFIX",
            MatcherKind::DomainKeyword => "DOMAIN-KEYWORD",
            MatcherKind::DomainRegex => "DOMAIN-REGEX",
            MatcherKind::IpCidr => "IP-CIDR",
            MatcherKind::IpCidr6 => "IP-CIDR6",
            MatcherKind::SrcIpCidr => "SRC-IP-CIDR",
            MatcherKind::DstPort => "DST-PORT",
            MatcherKind::SrcPort => "SRC-PORT",
            MatcherKind::Network => "NETWORK",
            MatcherKind::ProcessName => "PROCESS-NAME",
            MatcherKind::ProcessPath => "PROCESS-PATH",
            MatcherKind::ProcessPathRegex => "PROCESS-PATH-REGEX",
        }
    }

    /// 该类型对应的分发表项
    pub fn spec(self) -> &'static KindSpec {
        match self {
            MatcherKind::Domain => &DOMAIN,
            MatcherKind::DomainSuffix => &DOMAIN_SUFFIX,
            MatcherKind::DomainKeyword => &DOMAIN_KEYWORD,
            MatcherKind::DomainRegex => &DOMAIN_REGEX,
            // IP-CIDR 与 IP-CIDR6 在 sing-box 中合并为同一个字段
            MatcherKind::IpCidr | MatcherKind::IpCidr6 => &IP_CIDR,
            MatcherKind::SrcIpCidr => &SOURCE_IP_CIDR,
            MatcherKind::DstPort => &PORT,
            MatcherKind::SrcPort => &SOURCE_PORT,
            MatcherKind::Network => &NETWORK,
            MatcherKind::ProcessName => &PROCESS_NAME,
            MatcherKind::ProcessPath => &PROCESS_PATH,
            MatcherKind::ProcessPathRegex => &PROCESS_PATH_REGEX,
        }
    }

    /// 输出字段
    pub fn field(self) -> MatcherField {
        self.spec().field
    }

    /// 校验规则值是否可被 sing-box 接受
    pub fn is_admissible(self, value: &str) -> bool {
        (self.spec().validate)(value)
    }

    /// 规范化规则值，须在校验通过后调用
    pub fn normalize(self, value: &str) -> RuleValue {
        (self.spec().normalize)(value)
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ========================================
// 输出字段
// ========================================

/// sing-box headless rule 的字段名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherField {
    Domain,
    DomainSuffix,
    DomainKeyword,
    DomainRegex,
    IpCidr,
    SourceIpCidr,
    Port,
    SourcePort,
    Network,
    ProcessName,
    ProcessPath,
    ProcessPathRegex,
}

impl MatcherField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatcherField::Domain => "domain",
            MatcherField::DomainSuffix => "domain_suffix",
            MatcherField::DomainKeyword => "domain_keyword",
            MatcherField::DomainRegex => "domain_regex",
            MatcherField::IpCidr => "ip_cidr",
            MatcherField::SourceIpCidr => "source_ip_cidr",
            MatcherField::Port => "port",
            MatcherField::SourcePort => "source_port",
            MatcherField::Network => "network",
            MatcherField::ProcessName => "process_name",
            MatcherField::ProcessPath => "process_path",
            MatcherField::ProcessPathRegex => "process_path_regex",
        }
    }
}

impl fmt::Display for MatcherField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========================================
// 分发表
// ========================================

/// 单个规则类型的处理方式
pub struct KindSpec {
    /// 输出字段
    pub field: MatcherField,
    /// 校验函数
    pub validate: fn(&str) -> bool,
    /// 规范化函数
    pub normalize: fn(&str) -> RuleValue,
}

static DOMAIN: KindSpec = KindSpec {
    field: MatcherField::Domain,
    validate: validate::is_domain,
    normalize: keep,
};

static DOMAIN_SUFFIX: KindSpec = KindSpec {
    field: MatcherField::DomainSuffix,
    validate: validate::is_domain,
    normalize: keep,
};

static DOMAIN_KEYWORD: KindSpec = KindSpec {
    field: MatcherField::DomainKeyword,
    validate: validate::is_domain,
    normalize: keep,
};

static DOMAIN_REGEX: KindSpec = KindSpec {
    field: MatcherField::DomainRegex,
    validate: validate::is_portable_regex,
    normalize: keep,
};

static IP_CIDR: KindSpec = KindSpec {
    field: MatcherField::IpCidr,
    validate: validate::is_ip_network,
    normalize: keep,
};

static SOURCE_IP_CIDR: KindSpec = KindSpec {
    field: MatcherField::SourceIpCidr,
    validate: validate::is_ip_network,
    normalize: keep,
};

static PORT: KindSpec = KindSpec {
    field: MatcherField::Port,
    validate: validate::is_port,
    normalize: port,
};

static SOURCE_PORT: KindSpec = KindSpec {
    field: MatcherField::SourcePort,
    validate: validate::is_port,
    normalize: port,
};

static NETWORK: KindSpec = KindSpec {
    field: MatcherField::Network,
    validate: validate::is_network,
    normalize: lowercase,
};

static PROCESS_NAME: KindSpec = KindSpec {
    field: MatcherField::ProcessName,
    validate: validate::accept_any,
    normalize: keep,
};

static PROCESS_PATH: KindSpec = KindSpec {
    field: MatcherField::ProcessPath,
    validate: validate::accept_any,
    normalize: keep,
};

static PROCESS_PATH_REGEX: KindSpec = KindSpec {
    field: MatcherField::ProcessPathRegex,
    validate: validate::accept_any,
    normalize: keep,
};

// ========================================
// 规范化函数
// ========================================

fn keep(value: &str) -> RuleValue {
    RuleValue::Text(value.to_string())
}

fn lowercase(value: &str) -> RuleValue {
    RuleValue::Text(value.to_lowercase())
}

fn port(value: &str) -> RuleValue {
    // 未经校验的值原样保留
    match validate::parse_port(value) {
        Some(p) => RuleValue::Port(p),
        None => RuleValue::Text(value.to_string()),
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let tokens = [
            "DOMAIN",
            "DOMAIN-SUFFIX",
            "DOMAIN-KEYWORD",
            "DOMAIN-REGEX",
            "IP-CIDR",
            "IP-CIDR6",
            "SRC-IP-CIDR",
            "DST-PORT",
            "SRC-PORT",
            "NETWORK",
            "PROCESS-NAME",
            "PROCESS-PATH",
            "PROCESS-PATH-REGEX",
        ];
        for token in tokens {
            let kind = MatcherKind::from_token(token).unwrap();
            assert_eq!(kind.token(), token);
        }
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(MatcherKind::from_token("FOO-BAR"), None);
        assert_eq!(MatcherKind::from_token("GEOIP"), None);
        // 大小写敏感
        assert_eq!(MatcherKind::from_token("domain"), None);
        assert_eq!(MatcherKind::from_token(""), None);
    }

    #[test]
    fn test_ip_cidr6_shares_field() {
        assert_eq!(MatcherKind::IpCidr.field(), MatcherField::IpCidr);
        assert_eq!(MatcherKind::IpCidr6.field(), MatcherField::IpCidr);
        assert_eq!(MatcherKind::SrcIpCidr.field(), MatcherField::SourceIpCidr);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(MatcherKind::DstPort.field().as_str(), "port");
        assert_eq!(MatcherKind::SrcPort.field().as_str(), "source_port");
        assert_eq!(
            MatcherKind::ProcessPathRegex.field().to_string(),
            "process_path_regex"
        );
        assert_eq!(
            serde_json::to_string(&MatcherField::DomainSuffix).unwrap(),
            "\"domain_suffix\""
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(MatcherKind::DstPort.normalize("443"), RuleValue::Port(443));
        assert_eq!(
            MatcherKind::Network.normalize("TCP"),
            RuleValue::Text("tcp".to_string())
        );
        assert_eq!(
            MatcherKind::DomainSuffix.normalize("Example.COM"),
            RuleValue::Text("Example.COM".to_string())
        );
    }

    #[test]
    fn test_process_kinds_accept_anything() {
        assert!(MatcherKind::ProcessName.is_admissible("Telegram"));
        assert!(MatcherKind::ProcessPath.is_admissible("/Applications/A B.app"));
        assert!(MatcherKind::ProcessPathRegex.is_admissible("(?<=x)"));
    }
}
