#![allow(dead_code)]

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::PathBuf;

use hw_core::config::BridgeConfig;

/// 找到 cargo 为本 crate 产出的 cdylib（target/<profile>/ 或 target/<profile>/deps/）
pub fn stub_library() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap().to_path_buf();
    let profile = deps.parent().unwrap().to_path_buf();
    let exact = format!("{DLL_PREFIX}hw_stub_backend{DLL_SUFFIX}");

    for dir in [&profile, &deps] {
        let p = dir.join(&exact);
        if p.exists() {
            return p;
        }
    }
    // 兜底：带 hash 后缀的产物
    let prefix = format!("{DLL_PREFIX}hw_stub_backend");
    for entry in std::fs::read_dir(&deps).unwrap().flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(&prefix) && name.ends_with(DLL_SUFFIX) {
            return entry.path();
        }
    }
    panic!("stub cdylib not found next to {}", exe.display());
}

pub fn stub_config() -> BridgeConfig {
    BridgeConfig {
        library_path: Some(stub_library()),
        ..Default::default()
    }
}
