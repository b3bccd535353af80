pub mod dns;
pub mod groups;
pub mod regions;
pub mod rules;
