//! Rule providers and routing rules attached to every merged document

use super::groups::{
    AD_BLOCK_GROUP, CHATGPT_GROUP, CLAUDE_GROUP, DIRECT, FINAL_GROUP, PROXY_MODE_GROUP,
    SPOTIFY_GROUP, TELEGRAM_GROUP,
};

/// Refresh interval of the Loyalsoldier rule sets, in seconds
pub const RULESET_INTERVAL: u32 = 86400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleBehavior {
    Domain,
    IpCidr,
    Classical,
}

impl RuleBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleBehavior::Domain => "domain",
            RuleBehavior::IpCidr => "ipcidr",
            RuleBehavior::Classical => "classical",
        }
    }
}

#[derive(Debug)]
pub struct RuleProviderDef {
    pub name: &'static str,
    pub behavior: RuleBehavior,
    pub url: &'static str,
    pub path: &'static str,
    pub interval: Option<u32>,
}

const fn loyalsoldier(
    name: &'static str,
    behavior: RuleBehavior,
    url: &'static str,
    path: &'static str,
) -> RuleProviderDef {
    RuleProviderDef {
        name,
        behavior,
        url,
        path,
        interval: Some(RULESET_INTERVAL),
    }
}

pub static RULE_PROVIDERS: &[RuleProviderDef] = &[
    loyalsoldier(
        "reject",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/reject.txt",
        "./ruleset/reject.yaml",
    ),
    loyalsoldier(
        "icloud",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/icloud.txt",
        "./ruleset/icloud.yaml",
    ),
    loyalsoldier(
        "apple",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/apple.txt",
        "./ruleset/apple.yaml",
    ),
    loyalsoldier(
        "google",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/google.txt",
        "./ruleset/google.yaml",
    ),
    loyalsoldier(
        "proxy",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/proxy.txt",
        "./ruleset/proxy.yaml",
    ),
    RuleProviderDef {
        name: "openai",
        behavior: RuleBehavior::Classical,
        url: "https://fastly.jsdelivr.net/gh/blackmatrix7/ios_rule_script@master/rule/Clash/OpenAI/OpenAI.yaml",
        path: "./ruleset/custom/openai.yaml",
        interval: None,
    },
    RuleProviderDef {
        name: "claude",
        behavior: RuleBehavior::Classical,
        url: "https://raw.githubusercontent.com/blackmatrix7/ios_rule_script/master/rule/Clash/Claude/Claude.yaml",
        path: "./ruleset/custom/Claude.yaml",
        interval: None,
    },
    RuleProviderDef {
        name: "spotify",
        behavior: RuleBehavior::Classical,
        url: "https://raw.githubusercontent.com/blackmatrix7/ios_rule_script/master/rule/Clash/Spotify/Spotify.yaml",
        path: "./ruleset/custom/Spotify.yaml",
        interval: None,
    },
    RuleProviderDef {
        name: "telegramcidr",
        behavior: RuleBehavior::IpCidr,
        url: "https://fastly.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/telegramcidr.txt",
        path: "./ruleset/custom/telegramcidr.yaml",
        interval: None,
    },
    loyalsoldier(
        "direct",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/direct.txt",
        "./ruleset/direct.yaml",
    ),
    loyalsoldier(
        "private",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/private.txt",
        "./ruleset/private.yaml",
    ),
    loyalsoldier(
        "gfw",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/gfw.txt",
        "./ruleset/gfw.yaml",
    ),
    loyalsoldier(
        "greatfire",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/greatfire.txt",
        "./ruleset/greatfire.yaml",
    ),
    loyalsoldier(
        "tld-not-cn",
        RuleBehavior::Domain,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/tld-not-cn.txt",
        "./ruleset/tld-not-cn.yaml",
    ),
    loyalsoldier(
        "cncidr",
        RuleBehavior::IpCidr,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/cncidr.txt",
        "./ruleset/cncidr.yaml",
    ),
    loyalsoldier(
        "lancidr",
        RuleBehavior::IpCidr,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/lancidr.txt",
        "./ruleset/lancidr.yaml",
    ),
    loyalsoldier(
        "applications",
        RuleBehavior::Classical,
        "https://cdn.jsdelivr.net/gh/Loyalsoldier/clash-rules@release/applications.txt",
        "./ruleset/applications.yaml",
    ),
];

/// Routing rules in match order. The last one is the catch-all.
pub fn default_rules() -> Vec<String> {
    vec![
        format!("RULE-SET,reject,{}", AD_BLOCK_GROUP),
        format!("RULE-SET,direct,{}", DIRECT),
        format!("RULE-SET,cncidr,{}", DIRECT),
        format!("RULE-SET,private,{}", DIRECT),
        format!("RULE-SET,lancidr,{}", DIRECT),
        format!("GEOIP,LAN,{},no-resolve", DIRECT),
        format!("GEOIP,CN,{},no-resolve", DIRECT),
        format!("RULE-SET,applications,{}", DIRECT),
        format!("RULE-SET,openai,{}", CHATGPT_GROUP),
        format!("RULE-SET,claude,{}", CLAUDE_GROUP),
        format!("RULE-SET,spotify,{}", SPOTIFY_GROUP),
        format!("RULE-SET,telegramcidr,{},no-resolve", TELEGRAM_GROUP),
        format!("RULE-SET,tld-not-cn,{}", PROXY_MODE_GROUP),
        format!("RULE-SET,google,{}", PROXY_MODE_GROUP),
        format!("RULE-SET,icloud,{}", PROXY_MODE_GROUP),
        format!("RULE-SET,apple,{}", PROXY_MODE_GROUP),
        format!("RULE-SET,gfw,{}", PROXY_MODE_GROUP),
        format!("RULE-SET,greatfire,{}", PROXY_MODE_GROUP),
        format!("RULE-SET,proxy,{}", PROXY_MODE_GROUP),
        format!("MATCH,{}", FINAL_GROUP),
    ]
}
