//! Region detection tables
//!
//! Table order is significant: the first region whose keyword (or IP prefix)
//! matches wins.

/// One curated region.
#[derive(Debug)]
pub struct RegionRule {
    pub name: &'static str,
    pub code: &'static str,
    /// Upper-case name fragments.
    pub keywords: &'static [&'static str],
    /// Dotted IPv4 prefixes, each ending with a dot.
    pub ip_prefixes: &'static [&'static str],
}

/// Name fragments marking subscription metadata rather than a proxy.
pub const INFORMATIONAL_PATTERN: &str =
    "剩余|到期|主页|官网|游戏|关注|流量|期限|时间|有效|套餐|苹果用户|下载";

pub static REGION_RULES: &[RegionRule] = &[
    RegionRule {
        name: "香港",
        code: "HK",
        keywords: &["香港", "HK", "HONG KONG", "HKG"],
        ip_prefixes: &[
            "103.10.", "103.21.", "103.31.", "103.243.", "103.16.", "113.28.", "113.30.",
            "119.28.", "119.29.", "202.64.", "202.67.", "202.72.", "202.125.", "210.3.",
            "210.4.", "210.176.", "210.177.", "218.102.", "218.213.", "203.80.", "203.198.",
        ],
    },
    RegionRule {
        name: "台湾",
        code: "TW",
        keywords: &["台湾", "TW", "TAIWAN", "TWN"],
        ip_prefixes: &[
            "1.34.", "1.160.", "1.163.", "1.168.", "60.248.", "60.249.", "60.250.", "60.251.",
            "111.240.", "111.241.", "111.242.", "111.243.", "114.32.", "114.33.", "114.34.",
            "114.35.", "140.109.", "140.110.", "140.111.", "140.112.", "163.13.", "163.14.",
            "163.15.", "163.16.",
        ],
    },
    RegionRule {
        name: "新加坡",
        code: "SG",
        keywords: &["新加坡", "SG", "SINGAPORE", "SGP"],
        ip_prefixes: &[
            "103.28.", "103.225.", "103.233.", "103.47.", "155.133.", "165.21.", "175.103.",
            "180.87.", "202.94.", "202.156.", "202.162.", "203.116.", "210.4.", "210.185.",
            "218.100.", "220.255.",
        ],
    },
    RegionRule {
        name: "日本",
        code: "JP",
        keywords: &["日本", "JP", "JAPAN", "JPN", "东京", "TOKYO"],
        ip_prefixes: &[
            "138.2.", "203.10.", "212.192.", "27.0.", "49.212.", "49.213.", "49.214.",
            "49.215.", "118.27.", "118.238.", "118.239.", "118.240.", "153.120.", "153.121.",
            "153.122.", "153.123.", "202.13.", "202.32.", "202.208.", "210.130.", "210.131.",
            "210.132.", "210.133.", "220.100.",
        ],
    },
    RegionRule {
        name: "美国",
        code: "US",
        keywords: &[
            "美国",
            "US",
            "USA",
            "UNITED STATES",
            "洛杉矶",
            "LOS ANGELES",
            "纽约",
            "NEW YORK",
        ],
        ip_prefixes: &[
            "108.181.", "208.87.", "63.141.", "199.168.", "107.150.", "192.151.", "173.208.",
            "142.54.", "166.88.", "38.134.", "207.174.", "64.233.", "173.252.", "31.13.",
            "157.240.", "199.16.", "23.227.", "23.235.", "23.78.", "23.79.", "104.16.",
            "104.17.", "104.18.", "104.19.", "8.8.", "8.34.", "172.217.", "142.250.",
            "168.138.", "64.181.", "165.1.", "38.55.", "172.245.", "198.199.", "159.65.",
            "174.138.", "68.183.", "157.245.", "134.122.", "167.99.", "188.166.", "143.198.",
            "165.22.", "178.128.",
        ],
    },
    RegionRule {
        name: "英国",
        code: "GB",
        keywords: &["英国", "GB", "UK", "UNITED KINGDOM", "伦敦", "LONDON"],
        ip_prefixes: &[
            "85.159.", "140.238.", "193.123.", "212.58.", "80.68.", "80.87.", "81.2.",
            "81.103.", "195.59.", "195.66.", "195.137.", "195.149.", "212.140.", "212.159.",
            "213.205.", "217.163.", "91.149.", "193.108.", "192.124.",
        ],
    },
    RegionRule {
        name: "加拿大",
        code: "CA",
        keywords: &["加拿大", "CA", "CANADA", "CAN"],
        ip_prefixes: &[
            "24.222.", "24.225.", "65.92.", "65.95.", "69.196.", "70.29.", "99.232.", "99.233.",
            "142.59.", "198.53.", "198.84.", "206.248.",
        ],
    },
    RegionRule {
        name: "德国",
        code: "DE",
        keywords: &["德国", "DE", "GERMANY", "法兰克福", "FRANKFURT"],
        ip_prefixes: &[
            "141.147.", "202.71.", "88.198.", "144.76.", "138.201.", "168.119.", "195.201.",
            "213.239.", "85.10.", "85.25.", "195.71.", "212.227.",
        ],
    },
    RegionRule {
        name: "法国",
        code: "FR",
        keywords: &["法国", "FR", "FRANCE", "巴黎", "PARIS"],
        ip_prefixes: &[
            "141.253.", "144.24.", "193.252.", "212.27.", "80.12.", "81.2.", "82.64.",
            "83.206.", "195.154.", "212.83.", "213.186.", "217.70.",
        ],
    },
    RegionRule {
        name: "澳大利亚",
        code: "AU",
        keywords: &["澳大利亚", "AU", "AUSTRALIA", "悉尼", "SYDNEY"],
        ip_prefixes: &[
            "192.9.", "203.0.", "203.2.", "203.32.", "101.189.", "110.174.", "150.101.",
            "175.45.", "202.6.", "202.144.", "202.158.", "210.23.",
        ],
    },
    RegionRule {
        name: "韩国",
        code: "KR",
        keywords: &["韩国", "KR", "KOREA", "首尔", "SEOUL"],
        ip_prefixes: &[
            "132.226.", "152.70.", "193.122.", "158.179.", "1.11.", "1.201.", "1.224.",
            "1.225.", "114.207.", "175.126.", "211.33.", "211.34.", "218.144.", "218.145.",
            "218.234.", "220.68.",
        ],
    },
    RegionRule {
        name: "荷兰",
        code: "NL",
        keywords: &["荷兰", "NL", "NETHERLANDS", "阿姆斯特丹", "AMSTERDAM"],
        ip_prefixes: &[
            "204.10.", "158.101.", "31.220.", "46.19.", "77.72.", "80.69.", "82.94.", "85.17.",
            "194.109.", "195.69.", "213.154.", "217.21.",
        ],
    },
    RegionRule {
        name: "巴西",
        code: "BR",
        keywords: &["巴西", "BR", "BRAZIL"],
        ip_prefixes: &[
            "129.148.", "177.37.", "189.1.", "189.2.", "201.48.", "201.49.", "200.142.",
            "200.147.", "186.192.", "186.193.", "191.36.", "191.37.",
        ],
    },
    RegionRule {
        name: "俄罗斯",
        code: "RU",
        keywords: &["俄罗斯", "RU", "RUSSIA", "莫斯科", "MOSCOW"],
        ip_prefixes: &[
            "77.88.", "87.240.", "93.158.", "95.213.", "178.154.", "185.32.", "188.162.",
            "194.87.", "213.180.", "217.69.", "46.29.", "5.45.",
        ],
    },
    RegionRule {
        name: "印度",
        code: "IN",
        keywords: &["印度", "IN", "INDIA"],
        ip_prefixes: &[
            "103.21.", "103.22.", "157.119.", "157.230.", "165.22.", "167.71.", "203.109.",
            "203.110.", "122.160.", "122.161.", "180.179.", "49.204.",
        ],
    },
];

/// Curated region for an ISO country code.
pub fn region_by_code(code: &str) -> Option<&'static RegionRule> {
    REGION_RULES
        .iter()
        .find(|rule| rule.code.eq_ignore_ascii_case(code))
}
