pub mod prelude;
pub mod api;

pub mod backend;
pub mod command;
pub mod config;
pub mod error;
pub mod loader;
pub mod logs;
pub mod native;
pub mod util;

#[cfg(any(test, feature = "testsupport"))]
pub mod testsupport;
