//! URL encoding/decoding utilities

/// Decodes a URL-encoded string
///
/// # Arguments
/// * `input` - The URL-encoded string to decode
///
/// # Returns
/// * String containing the decoded input
/// * Returns the original string if decoding fails
///
/// # Examples
/// ```
/// use clash_merge::utils::url::url_decode;
///
/// let decoded = url_decode("%E9%A6%99%E6%B8%AF%2001");
/// assert_eq!(decoded, "香港 01");
/// ```
pub fn url_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Split a list of subscription URLs separated by commas and/or newlines.
///
/// Entries are trimmed and empty ones dropped.
pub fn split_url_list(input: &str) -> Vec<String> {
    input
        .split(|c| c == ',' || c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_url_list() {
        let urls = split_url_list(" https://a/sub ,\r\nhttps://b/sub\n\n,https://c/sub,");
        assert_eq!(urls, vec!["https://a/sub", "https://b/sub", "https://c/sub"]);
        assert!(split_url_list(" , \n").is_empty());
    }

    #[test]
    fn test_url_decode_invalid_utf8_passthrough() {
        assert_eq!(url_decode("%FF"), "%FF");
    }
}
