use serde_yaml::{Mapping, Value};

use super::common::{credential_of, host_of, name_of, parse_url, query_param, ExplodeError};
use crate::models::{ProxyRecord, VLESS_TYPE};

/// TLS fingerprint used when the link does not name one
pub const DEFAULT_CLIENT_FINGERPRINT: &str = "chrome";

/// Parse a VLESS link into a proxy record
///
/// `vless://<uuid>@<host>:<port>?type=ws&security=tls&sni=..&fp=..&flow=..&path=..&host=..#<name>`
pub fn explode_vless(vless: &str) -> Result<ProxyRecord, ExplodeError> {
    let url = parse_url(vless)?;

    let server = host_of(&url)?;
    let port = url.port().ok_or(ExplodeError::MissingField("port"))?;
    let uuid = credential_of(&url, "uuid")?;
    let name = name_of(&url, &server, port);

    let network = query_param(&url, "type").unwrap_or_else(|| "tcp".to_string());
    let tls = query_param(&url, "security").as_deref() == Some("tls");
    let host_param = query_param(&url, "host");

    let mut node = ProxyRecord::new(name, VLESS_TYPE, &server, port);
    node.set("uuid", uuid)
        .set("network", network.as_str())
        .set("tls", tls)
        .set("udp", true);

    if tls {
        let servername = query_param(&url, "sni")
            .or_else(|| host_param.clone())
            .unwrap_or_else(|| server.clone());
        let fingerprint =
            query_param(&url, "fp").unwrap_or_else(|| DEFAULT_CLIENT_FINGERPRINT.to_string());
        node.set("servername", servername)
            .set("client-fingerprint", fingerprint);
        if let Some(flow) = query_param(&url, "flow") {
            node.set("flow", flow);
        }
    }

    if network == "ws" {
        let mut headers = Mapping::new();
        headers.insert(
            Value::from("Host"),
            Value::from(host_param.unwrap_or_else(|| server.clone())),
        );
        let mut ws_opts = Mapping::new();
        ws_opts.insert(
            Value::from("path"),
            Value::from(query_param(&url, "path").unwrap_or_else(|| "/".to_string())),
        );
        ws_opts.insert(Value::from("headers"), Value::Mapping(headers));
        node.set("ws-opts", Value::Mapping(ws_opts));
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_field<'a>(node: &'a ProxyRecord, key: &str) -> Option<&'a str> {
        node.get(key).and_then(|v| v.as_str())
    }

    #[test]
    fn test_ws_tls_defaults() {
        let node = explode_vless("vless://uuid@host:443?type=ws&security=tls#Name").unwrap();
        assert_eq!(node.name, "Name");
        assert_eq!(node.proxy_type, "vless");
        assert_eq!(node.server, "host");
        assert_eq!(node.port, 443);
        assert_eq!(str_field(&node, "uuid"), Some("uuid"));
        assert_eq!(str_field(&node, "network"), Some("ws"));
        assert_eq!(node.get("tls").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(str_field(&node, "servername"), Some("host"));
        assert_eq!(str_field(&node, "client-fingerprint"), Some("chrome"));
        assert!(node.get("flow").is_none());

        let ws_opts = node.get("ws-opts").unwrap();
        assert_eq!(ws_opts["path"].as_str(), Some("/"));
        assert_eq!(ws_opts["headers"]["Host"].as_str(), Some("host"));
    }

    #[test]
    fn test_tcp_without_tls() {
        let node = explode_vless("vless://id@1.2.3.4:8443?encryption=none#%E9%A6%99%E6%B8%AF%2001%20").unwrap();
        assert_eq!(node.name, "香港 01");
        assert_eq!(str_field(&node, "network"), Some("tcp"));
        assert_eq!(node.get("tls").and_then(|v| v.as_bool()), Some(false));
        assert!(node.get("servername").is_none());
        assert!(node.get("client-fingerprint").is_none());
        assert!(node.get("ws-opts").is_none());
    }

    #[test]
    fn test_tls_params() {
        let node = explode_vless(
            "vless://id@a.example:443?security=tls&host=cdn.example&fp=safari&flow=xtls-rprx-vision&type=ws&path=%2Fray#n",
        )
        .unwrap();
        assert_eq!(str_field(&node, "servername"), Some("cdn.example"));
        assert_eq!(str_field(&node, "client-fingerprint"), Some("safari"));
        assert_eq!(str_field(&node, "flow"), Some("xtls-rprx-vision"));
        let ws_opts = node.get("ws-opts").unwrap();
        assert_eq!(ws_opts["path"].as_str(), Some("/ray"));
        assert_eq!(ws_opts["headers"]["Host"].as_str(), Some("cdn.example"));

        let with_sni =
            explode_vless("vless://id@a.example:443?security=tls&sni=s.example&host=h.example#n")
                .unwrap();
        assert_eq!(str_field(&with_sni, "servername"), Some("s.example"));
    }

    #[test]
    fn test_empty_fragment_uses_address() {
        let node = explode_vless("vless://id@a.example:443").unwrap();
        assert_eq!(node.name, "a.example:443");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            explode_vless("vless://id@a.example?type=ws#n"),
            Err(ExplodeError::MissingField("port"))
        );
        assert_eq!(
            explode_vless("vless://a.example:443#n"),
            Err(ExplodeError::MissingField("uuid"))
        );
        assert!(matches!(
            explode_vless("vless://id@a.example:99999#n"),
            Err(ExplodeError::MalformedUri(_))
        ));
    }
}
