use ruleset_convert::{convert_lines, convert_yaml, to_json};

const PAYLOAD: &str = r#"payload:
  - DOMAIN-SUFFIX,example.com
  - IP-CIDR,10.0.0.0/8
  - DST-PORT,80
  - DST-PORT,443
  - NETWORK,TCP
  - FOO-BAR,baz
  - 'DOMAIN-REGEX,^a\1$'
"#;

const EXPECTED: &str = r#"{
  "version": 3,
  "rules": [
    {
      "domain_suffix": [
        "example.com"
      ]
    },
    {
      "ip_cidr": [
        "10.0.0.0/8"
      ]
    },
    {
      "port": [
        80,
        443
      ]
    },
    {
      "network": [
        "tcp"
      ]
    }
  ]
}"#;

#[test]
fn converts_mixed_payload() {
    let doc = convert_yaml(PAYLOAD).unwrap();
    assert_eq!(to_json(&doc).unwrap(), EXPECTED);
}

#[test]
fn rule_provider_with_comments_and_policies() {
    let yaml = r#"
# generated rule-provider
payload:
  # streaming
  - DOMAIN-SUFFIX,netflix.com
  - DOMAIN-KEYWORD,"nflx"
  - IP-CIDR,23.246.0.0/18,no-resolve
  - IP-CIDR6,2a00:86c0::/32,no-resolve
  - SRC-IP-CIDR,192.168.1.7/32
  - SRC-PORT,0
  - GEOIP,US
  - PROCESS-NAME,Netflix.exe # desktop client
  - DOMAIN-REGEX,(?<=a)nflx
"#;
    let doc = convert_yaml(yaml).unwrap();
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "version": 3,
            "rules": [
                { "domain_suffix": ["netflix.com"] },
                { "domain_keyword": ["nflx"] },
                { "ip_cidr": ["23.246.0.0/18", "2a00:86c0::/32"] },
                { "source_ip_cidr": ["192.168.1.7/32"] },
                { "process_name": ["Netflix.exe"] }
            ]
        })
    );
}

#[test]
fn all_invalid_lines_yield_empty_rules() {
    let doc = convert_lines(["", "# comment", "DST-PORT,70000", "NETWORK,icmp"]);
    assert_eq!(
        to_json(&doc).unwrap(),
        "{\n  \"version\": 3,\n  \"rules\": []\n}"
    );
}
