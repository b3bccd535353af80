//! Proxy model definitions
//!
//! Contains the normalized proxy record shared by every stage of the merge
//! pipeline.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

/// Protocol tag produced by the vless decoder.
pub const VLESS_TYPE: &str = "vless";
/// Protocol tag produced by the hysteria2 decoder.
pub const HYSTERIA2_TYPE: &str = "hysteria2";
/// Protocol tag produced by the trojan decoder.
pub const TROJAN_TYPE: &str = "trojan";

/// One configured egress node.
///
/// The fields every stage relies on are lifted out; everything else a
/// protocol needs (credentials, TLS and transport options) stays in `extra`
/// in its original key order and is written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyRecord {
    #[serde(deserialize_with = "deserialize_name")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub proxy_type: String,
    #[serde(default)]
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl ProxyRecord {
    pub fn new(name: impl Into<String>, proxy_type: &str, server: &str, port: u16) -> Self {
        Self {
            name: name.into(),
            proxy_type: proxy_type.to_string(),
            server: server.to_string(),
            port,
            extra: Mapping::new(),
        }
    }

    /// Append a protocol-specific attribute, keeping insertion order.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.extra.insert(Value::String(key.to_string()), value.into());
        self
    }

    /// Look up a protocol-specific attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Lift an entry of a structured document's `proxies` list.
    ///
    /// Returns `None` when the entry is not a mapping, has no usable port, or
    /// its name is blank.
    pub fn from_yaml(value: &Value) -> Option<Self> {
        let mut record: ProxyRecord = serde_yaml::from_value(value.clone()).ok()?;
        record.name = record.name.trim().to_string();
        if record.name.is_empty() {
            return None;
        }
        Some(record)
    }
}

/// Names such as `2024` or `true` arrive as YAML scalars of other types.
fn deserialize_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NameRepr {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Flag(bool),
    }

    Ok(match NameRepr::deserialize(deserializer)? {
        NameRepr::Text(s) => s,
        NameRepr::Signed(n) => n.to_string(),
        NameRepr::Unsigned(n) => n.to_string(),
        NameRepr::Float(f) => f.to_string(),
        NameRepr::Flag(b) => b.to_string(),
    })
}

/// Clash documents write ports both as integers and as quoted strings.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortRepr {
        Number(u64),
        Text(String),
    }

    let port = match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(n) => u16::try_from(n).ok(),
        PortRepr::Text(s) => s.trim().parse::<u16>().ok(),
    };
    match port {
        Some(p) if p != 0 => Ok(p),
        _ => Err(serde::de::Error::custom("port must be within 1-65535")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_keeps_extra_fields_in_order() {
        let value: Value = serde_yaml::from_str(
            r#"
name: " HK-1 "
type: vless
server: 103.10.1.1
port: "443"
uuid: abc
tls: true
network: ws
"#,
        )
        .unwrap();

        let record = ProxyRecord::from_yaml(&value).unwrap();
        assert_eq!(record.name, "HK-1");
        assert_eq!(record.proxy_type, "vless");
        assert_eq!(record.port, 443);
        let keys: Vec<_> = record.extra.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["uuid", "tls", "network"]);
    }

    #[test]
    fn test_from_yaml_rejects_blank_name_and_bad_port() {
        let blank: Value = serde_yaml::from_str("{name: '  ', type: ss, server: a, port: 1}").unwrap();
        assert!(ProxyRecord::from_yaml(&blank).is_none());

        let bad_port: Value =
            serde_yaml::from_str("{name: a, type: ss, server: a, port: 70000}").unwrap();
        assert!(ProxyRecord::from_yaml(&bad_port).is_none());

        assert!(ProxyRecord::from_yaml(&Value::String("vless://x".into())).is_none());
    }

    #[test]
    fn test_from_yaml_accepts_scalar_names() {
        let numeric: Value =
            serde_yaml::from_str("{name: 2024, type: ss, server: a, port: 1, cipher: none}").unwrap();
        let record = ProxyRecord::from_yaml(&numeric).unwrap();
        assert_eq!(record.name, "2024");
        assert_eq!(record.get("cipher").and_then(|v| v.as_str()), Some("none"));

        let flag: Value = serde_yaml::from_str("{name: true, type: ss, server: a, port: 1}").unwrap();
        assert_eq!(ProxyRecord::from_yaml(&flag).unwrap().name, "true");
    }

    #[test]
    fn test_serialize_writes_common_fields_first() {
        let mut record = ProxyRecord::new("A", VLESS_TYPE, "example.com", 443);
        record.set("uuid", "id").set("udp", true);
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert_eq!(
            yaml,
            "name: A\ntype: vless\nserver: example.com\nport: 443\nuuid: id\nudp: true\n"
        );
    }
}
