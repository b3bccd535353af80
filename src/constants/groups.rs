//! Names and icons of the fixed proxy groups

/// Master selector every proxied rule points at
pub const PROXY_MODE_GROUP: &str = "代理模式";
pub const MANUAL_SELECT_GROUP: &str = "手动选择";
pub const AUTO_SELECT_GROUP: &str = "自动选择";
pub const LOAD_BALANCE_HASH_GROUP: &str = "负载均衡 (散列)";
pub const LOAD_BALANCE_ROUND_ROBIN_GROUP: &str = "负载均衡 (轮询)";
/// Aggregate url-test over every proxy; always last in the automatic menu
pub const ALL_AUTO_GROUP: &str = "ALL - 自动选择";
pub const TELEGRAM_GROUP: &str = "电报消息";
pub const CHATGPT_GROUP: &str = "ChatGPT";
pub const CLAUDE_GROUP: &str = "Claude";
pub const SPOTIFY_GROUP: &str = "Spotify";
/// Catch-all for unmatched traffic
pub const FINAL_GROUP: &str = "漏网之鱼";
pub const AD_BLOCK_GROUP: &str = "广告拦截";

/// Every group emitted ahead of the generated ones
pub const FIXED_GROUPS: [&str; 12] = [
    PROXY_MODE_GROUP,
    MANUAL_SELECT_GROUP,
    AUTO_SELECT_GROUP,
    LOAD_BALANCE_HASH_GROUP,
    LOAD_BALANCE_ROUND_ROBIN_GROUP,
    ALL_AUTO_GROUP,
    TELEGRAM_GROUP,
    CHATGPT_GROUP,
    CLAUDE_GROUP,
    SPOTIFY_GROUP,
    FINAL_GROUP,
    AD_BLOCK_GROUP,
];

/// Suffixes of the generated per-subscription and per-region groups
pub const SUBSCRIPTION_AUTO_SUFFIX: &str = "自动选择";
pub const SUBSCRIPTION_MANUAL_SUFFIX: &str = "手工选择";
pub const GLOBAL_REGION_SUFFIX: &str = "全局选择";

/// Built-in policies that need no group definition
pub const DIRECT: &str = "DIRECT";
pub const REJECT: &str = "REJECT";

const ICON_BASE: &str =
    "https://fastly.jsdelivr.net/gh/clash-verge-rev/clash-verge-rev.github.io@main/docs/assets/icons";

pub fn icon_url(file: &str) -> String {
    format!("{}/{}", ICON_BASE, file)
}

pub const SPOTIFY_ICON: &str =
    "https://storage.googleapis.com/spotifynewsroom-jp.appspot.com/1/2020/12/Spotify_Icon_CMYK_Green.png";
