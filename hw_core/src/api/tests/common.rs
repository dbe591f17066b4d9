// hw_core/src/api/tests/common.rs
use super::super::*;
use std::sync::Arc;

pub use crate::testsupport::dirs::TestDirs;
pub use crate::testsupport::stub::{StubBackend, StubCall};

pub fn unique_dirs(sub: &str) -> TestDirs {
	TestDirs::new("hw_core", sub)
}

/// 默认桩：两个测试都返回 0，版本 "n7.0.0-stub"
pub fn mk_bridge() -> (Bridge, Arc<StubBackend>) {
	mk_bridge_with(StubBackend::new())
}

pub fn mk_bridge_with(stub: StubBackend) -> (Bridge, Arc<StubBackend>) {
	let stub = Arc::new(stub);
	let backend: Arc<dyn NativeBackend> = stub.clone();
	let bridge = Bridge::with_backend(backend, &BridgeConfig::default());
	(bridge, stub)
}
