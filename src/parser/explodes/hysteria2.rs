use super::common::{credential_of, host_of, name_of, parse_url, query_param, ExplodeError};
use crate::models::{ProxyRecord, HYSTERIA2_TYPE};

/// Parse a Hysteria2 link (`hysteria2://` or `hy2://`) into a proxy record
pub fn explode_hysteria2(hysteria2: &str) -> Result<ProxyRecord, ExplodeError> {
    let url = parse_url(hysteria2)?;

    let server = host_of(&url)?;
    let port = url.port().unwrap_or(443);
    let password = credential_of(&url, "password")?;
    let name = name_of(&url, &server, port);

    let sni = query_param(&url, "sni").unwrap_or_else(|| server.clone());
    let skip_cert_verify = query_param(&url, "insecure").as_deref() == Some("1")
        || query_param(&url, "skip-cert-verify").as_deref() == Some("true");

    let mut node = ProxyRecord::new(name, HYSTERIA2_TYPE, &server, port);
    node.set("password", password)
        .set("sni", sni)
        .set("skip-cert-verify", skip_cert_verify);

    // bandwidth hints are passed through as written
    if let Some(up) = query_param(&url, "up") {
        node.set("up", up);
    }
    if let Some(down) = query_param(&url, "down") {
        node.set("down", down);
    }

    Ok(node)
}
