//! # 规则值校验
//!
//! 按规则类型检查规则值能否被 sing-box 接受。校验失败的行直接丢弃，不视为错误。
//!
//! ## 校验规则
//! - IP-CIDR / IP-CIDR6 / SRC-IP-CIDR: 合法的 IPv4/IPv6 地址或网段（忽略主机位，IPv6 可带 zone）
//! - DST-PORT / SRC-PORT: 1-65535 的十进制整数
//! - NETWORK: tcp 或 udp（不区分大小写）
//! - DOMAIN-REGEX: 能被回溯引擎编译，且不含 Go RE2 不支持的语法
//! - DOMAIN / DOMAIN-SUFFIX / DOMAIN-KEYWORD: 非空且不超过 253 个字符
//! - 其他类型: 一律接受

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy;
use regex::Regex;

use super::kind::MatcherKind;

/// 域名最大长度
pub const MAX_DOMAIN_LEN: usize = 253;

/// RE2 不支持的分组语法（后行断言、条件分组、命名反向引用）
const UNSUPPORTED_GROUPS: [&str; 5] = ["(?<", "(?<=", "(?<!", "(?(", "(?P="];

/// 数字反向引用 `\1` ~ `\9`，出现在任何位置都拒绝
static BACKREFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[1-9]").expect("backreference pattern is valid"));

/// 按类型名分发校验
///
/// 未注册的类型名没有校验规则，返回 `true`；是否丢弃由注册表决定。
pub fn is_admissible(kind_token: &str, value: &str) -> bool {
    match MatcherKind::from_token(kind_token) {
        Some(kind) => kind.is_admissible(value),
        None => accept_any(value),
    }
}

/// IP 网段：`addr` 或 `addr/prefix`
///
/// IPv4 的前缀也可以写成点分掩码（`255.0.0.0`）或反掩码（`0.255.255.255`）。
pub fn is_ip_network(value: &str) -> bool {
    let (addr, prefix) = match value.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (value, None),
    };

    let Some(addr) = parse_address(addr) else {
        return false;
    };

    let Some(prefix) = prefix else {
        return true;
    };

    let max_prefix = match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };

    if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
        return prefix.parse::<u32>().is_ok_and(|len| len <= max_prefix);
    }

    match addr {
        IpAddr::V4(_) => prefix.parse::<Ipv4Addr>().is_ok_and(is_ipv4_mask),
        IpAddr::V6(_) => false,
    }
}

/// 解析地址，IPv6 允许带 `%zone` 后缀
fn parse_address(addr: &str) -> Option<IpAddr> {
    match addr.split_once('%') {
        Some((ip, zone)) => {
            if zone.is_empty() || zone.contains('%') {
                return None;
            }
            ip.parse::<Ipv6Addr>().ok().map(IpAddr::V6)
        }
        None => addr.parse::<IpAddr>().ok(),
    }
}

/// 连续的网络掩码或反掩码
fn is_ipv4_mask(mask: Ipv4Addr) -> bool {
    let bits = u32::from(mask);
    let contiguous = |m: u32| m.leading_ones() + m.trailing_zeros() == 32;
    contiguous(bits) || contiguous(!bits)
}

/// 端口号（1-65535）
pub fn is_port(value: &str) -> bool {
    parse_port(value).is_some()
}

/// 解析端口号，0 和超出范围的值返回 `None`
pub fn parse_port(value: &str) -> Option<u16> {
    value.parse::<u16>().ok().filter(|&port| port >= 1)
}

/// 网络类型（tcp/udp）
pub fn is_network(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "tcp" | "udp")
}

/// 正则必须能编译，且不含 RE2 不支持的语法
///
/// 这是子串黑名单而不是完整的方言解析：字符类里的 `\1` 同样会被拒绝，
/// 占有量词之类未列出的语法不会被发现。
pub fn is_portable_regex(value: &str) -> bool {
    // 语法检查用回溯引擎，前行断言、原子分组等可以通过
    if fancy_regex::Regex::new(value).is_err() {
        return false;
    }

    if UNSUPPORTED_GROUPS.iter().any(|p| value.contains(p)) {
        return false;
    }

    !BACKREFERENCE.is_match(value)
}

/// 域名基础检查：非空且不超过 253 个字符
pub fn is_domain(value: &str) -> bool {
    !value.is_empty() && value.chars().count() <= MAX_DOMAIN_LEN
}

/// 无校验规则的类型
pub fn accept_any(_value: &str) -> bool {
    true
}
