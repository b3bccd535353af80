use base64::{
    engine::general_purpose::{self, GeneralPurpose},
    Engine as _,
};

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Decodes a Base64 string to its original form.
///
/// ASCII whitespace is ignored and missing padding is tolerated. Both the
/// standard and the URL-safe alphabets are accepted.
///
/// # Returns
/// The decoded text, or `None` if the input is not Base64 or does not decode
/// to UTF-8.
pub fn base64_decode(input: &str) -> Option<String> {
    let cleaned: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    let unpadded = cleaned.trim_end_matches('=');

    const ENGINES: [&GeneralPurpose; 2] =
        [&general_purpose::STANDARD_NO_PAD, &general_purpose::URL_SAFE_NO_PAD];
    ENGINES
        .iter()
        .find_map(|engine| engine.decode(unpadded).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
}
