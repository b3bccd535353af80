pub mod base64;
pub mod fallback;
pub mod http;
pub mod url;

// Re-export common utilities
pub use fallback::first_success;
pub use url::{split_url_list, url_decode};
