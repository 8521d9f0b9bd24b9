//! # 规则行解析
//!
//! 把一行 Mihomo 规则（`TYPE,VALUE[,...]`）拆成类型和值两部分。

/// 解析出的规则行，借用原始文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRule<'a> {
    /// 规则类型 (如 DOMAIN-SUFFIX)
    pub kind: &'a str,
    /// 规则值 (如 example.com)
    pub value: &'a str,
}

/// 解析单条规则行
///
/// ## 步骤
/// 1. 去掉第一个 `#` 及其后的注释
/// 2. 按 `,` 分割，不足两段则不是规则
/// 3. 前两段分别去空白、去掉一层引号
/// 4. 任一段为空则不是规则
///
/// 第三段及之后（如策略组名、no-resolve）忽略。
pub fn parse_rule_line(line: &str) -> Option<ParsedRule<'_>> {
    let line = match line.split_once('#') {
        Some((content, _comment)) => content,
        None => line,
    };

    let mut parts = line.split(',');
    let kind = parts.next()?;
    let value = parts.next()?;

    let kind = unquote(kind.trim());
    let value = unquote(value.trim());

    if kind.is_empty() || value.is_empty() {
        return None;
    }

    Some(ParsedRule { kind, value })
}

/// 去掉首尾各一个引号字符（' 或 "）
fn unquote(token: &str) -> &str {
    let token = token
        .strip_prefix(|c: char| c == '\'' || c == '"')
        .unwrap_or(token);
    token
        .strip_suffix(|c: char| c == '\'' || c == '"')
        .unwrap_or(token)
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<(&str, &str)> {
        parse_rule_line(line).map(|r| (r.kind, r.value))
    }

    #[test]
    fn test_parse_basic() {
        assert_eq!(
            parse("DOMAIN-SUFFIX,example.com"),
            Some(("DOMAIN-SUFFIX", "example.com"))
        );
        assert_eq!(
            parse("  IP-CIDR , 10.0.0.0/8 "),
            Some(("IP-CIDR", "10.0.0.0/8"))
        );
    }

    #[test]
    fn test_extra_fields_ignored() {
        assert_eq!(
            parse("IP-CIDR,1.1.1.1/32,no-resolve"),
            Some(("IP-CIDR", "1.1.1.1/32"))
        );
        assert_eq!(
            parse("DOMAIN,a.com,Proxy,extra"),
            Some(("DOMAIN", "a.com"))
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(parse("# DOMAIN,example.com"), None);
        assert_eq!(
            parse("DOMAIN,example.com # trailing note"),
            Some(("DOMAIN", "example.com"))
        );
        // 注释截断后只剩一段
        assert_eq!(parse("DOMAIN#,example.com"), None);
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            parse(r#""DOMAIN","example.com""#),
            Some(("DOMAIN", "example.com"))
        );
        assert_eq!(
            parse("DOMAIN-KEYWORD,'google'"),
            Some(("DOMAIN-KEYWORD", "google"))
        );
        // 只去掉一层
        assert_eq!(
            parse(r#"DOMAIN,"'a.com'""#),
            Some(("DOMAIN", "'a.com'"))
        );
        assert_eq!(parse(r#"DOMAIN,"""#), None);
    }

    #[test]
    fn test_not_a_rule() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("DOMAIN"), None);
        assert_eq!(parse("DOMAIN,"), None);
        assert_eq!(parse(",example.com"), None);
        assert_eq!(parse(" , "), None);
    }
}
