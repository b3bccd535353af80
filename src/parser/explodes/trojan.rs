use serde_yaml::{Mapping, Value};

use super::common::{credential_of, host_of, name_of, parse_url, query_param, ExplodeError};
use crate::models::{ProxyRecord, TROJAN_TYPE};

/// Parse a Trojan link into a proxy record
pub fn explode_trojan(trojan: &str) -> Result<ProxyRecord, ExplodeError> {
    let url = parse_url(trojan)?;

    let server = host_of(&url)?;
    let port = url.port().unwrap_or(443);
    let password = credential_of(&url, "password")?;
    let name = name_of(&url, &server, port);

    // "peer" is the older spelling of "sni"
    let sni = query_param(&url, "sni")
        .or_else(|| query_param(&url, "peer"))
        .unwrap_or_else(|| server.clone());
    let skip_cert_verify = query_param(&url, "allowInsecure")
        .or_else(|| query_param(&url, "insecure"))
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let mut node = ProxyRecord::new(name, TROJAN_TYPE, &server, port);
    node.set("password", password)
        .set("sni", sni)
        .set("skip-cert-verify", skip_cert_verify)
        .set("udp", true);

    if query_param(&url, "type").as_deref() == Some("ws") {
        let mut headers = Mapping::new();
        headers.insert(
            Value::from("Host"),
            Value::from(query_param(&url, "host").unwrap_or_else(|| server.clone())),
        );
        let mut ws_opts = Mapping::new();
        ws_opts.insert(
            Value::from("path"),
            Value::from(query_param(&url, "path").unwrap_or_else(|| "/".to_string())),
        );
        ws_opts.insert(Value::from("headers"), Value::Mapping(headers));
        node.set("network", "ws").set("ws-opts", Value::Mapping(ws_opts));
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trojan_link() {
        let node = explode_trojan("trojan://pass@t.example:443?peer=p.example&allowInsecure=1#SG").unwrap();
        assert_eq!(node.name, "SG");
        assert_eq!(node.proxy_type, "trojan");
        assert_eq!(node.get("password").and_then(|v| v.as_str()), Some("pass"));
        assert_eq!(node.get("sni").and_then(|v| v.as_str()), Some("p.example"));
        assert_eq!(
            node.get("skip-cert-verify").and_then(|v| v.as_bool()),
            Some(true)
        );
        assert!(node.get("network").is_none());
    }

    #[test]
    fn test_trojan_ws() {
        let node = explode_trojan("trojan://pass@t.example?type=ws&path=%2Fws#x").unwrap();
        assert_eq!(node.port, 443);
        assert_eq!(node.get("network").and_then(|v| v.as_str()), Some("ws"));
        let ws_opts = node.get("ws-opts").unwrap();
        assert_eq!(ws_opts["path"].as_str(), Some("/ws"));
        assert_eq!(ws_opts["headers"]["Host"].as_str(), Some("t.example"));
    }
}
