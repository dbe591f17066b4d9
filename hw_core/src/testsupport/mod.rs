pub mod dirs;
pub mod stub;
