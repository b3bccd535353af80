//! Region classification results

/// Base URL of the flag icon set used for region groups.
const FLAG_ICON_BASE: &str =
    "https://fastly.jsdelivr.net/gh/clash-verge-rev/clash-verge-rev.github.io@main/docs/assets/icons/flags";
/// Icon used when a region has no code.
pub const LINK_ICON: &str =
    "https://fastly.jsdelivr.net/gh/clash-verge-rev/clash-verge-rev.github.io@main/docs/assets/icons/link.svg";

/// Display label of the catch-all region.
pub const OTHER_REGION_NAME: &str = "其它";
/// Code of the catch-all region.
pub const OTHER_REGION_CODE: &str = "OTHER";

/// Geographic region assigned to a proxy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionInfo {
    pub name: String,
    pub code: String,
    pub icon: String,
}

impl RegionInfo {
    /// Build a region; the icon is derived from `code`.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        let code = code.into();
        let icon = if code.is_empty() {
            LINK_ICON.to_string()
        } else {
            format!("{}/{}.svg", FLAG_ICON_BASE, code.to_lowercase())
        };
        Self {
            name: name.into(),
            code,
            icon,
        }
    }

    /// The catch-all region for proxies nothing could place.
    pub fn other() -> Self {
        Self::new(OTHER_REGION_NAME, OTHER_REGION_CODE)
    }
}

/// Outcome of classifying one proxy.
///
/// `Excluded` entries are not proxies at all. `Unknown` is a real proxy whose
/// location could not be determined; it is still grouped under
/// [`RegionInfo::other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Informational entry (traffic notice, expiry date, ...)
    Excluded,
    /// Matched by name keyword, IP range or live lookup
    Detected(RegionInfo),
    /// Every tier failed
    Unknown(RegionInfo),
}

impl Classification {
    pub fn unknown() -> Self {
        Classification::Unknown(RegionInfo::other())
    }

    /// Region to bucket the proxy under, `None` for excluded entries.
    pub fn region(&self) -> Option<&RegionInfo> {
        match self {
            Classification::Excluded => None,
            Classification::Detected(info) | Classification::Unknown(info) => Some(info),
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, Classification::Excluded)
    }
}
