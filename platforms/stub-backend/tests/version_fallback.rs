mod common;

use std::sync::Arc;

use common::stub_config;
use hw_core::api::Bridge;
use hw_core::config::{BridgeConfig, DEFAULT_FALLBACK_VERSION};
use hw_core::native::DynamicBackend;
use hw_stub_backend::ENV_NO_VERSION;

// 独立的测试进程：这里设置的环境变量只影响本文件
fn without_version_info() {
    std::env::set_var(ENV_NO_VERSION, "1");
}

#[test]
fn null_version_info_uses_fallback() {
    without_version_info();
    let cfg = stub_config();
    let backend = DynamicBackend::open(&cfg).unwrap_or_else(|e| panic!("open stub: {e}"));
    let bridge = Bridge::with_backend(Arc::new(backend), &cfg);

    assert_eq!(bridge.ffmpeg_version(), DEFAULT_FALLBACK_VERSION);
}

#[test]
fn configured_fallback_is_used() {
    without_version_info();
    let cfg = BridgeConfig { fallback_version: "FFmpeg n6.1 (bundled)".into(), ..stub_config() };
    let backend = DynamicBackend::open(&cfg).unwrap_or_else(|e| panic!("open stub: {e}"));
    let bridge = Bridge::with_backend(Arc::new(backend), &cfg);

    assert_eq!(bridge.ffmpeg_version(), "FFmpeg n6.1 (bundled)");
}
