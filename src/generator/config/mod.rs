pub mod group;
pub mod overwrite;
