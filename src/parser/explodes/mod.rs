pub mod common;
pub mod hysteria2;
pub mod trojan;
pub mod vless;

pub use common::{ExplodeError, ExplodeRegistry};
