use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use hw_core::config::ENV_LIBRARY;
use hw_core::testsupport::dirs::TestDirs;
use hwffmpeg_ffi::*;

unsafe fn take_json(p: *const c_char) -> serde_json::Value {
    assert!(!p.is_null());
    let s = CStr::from_ptr(p).to_string_lossy().into_owned();
    hwf_free_string(p);
    serde_json::from_str(&s).unwrap()
}

// 独立进程：后端指向一个不存在的库，每个入口每次都要拿到同一个加载错误
#[test]
fn every_call_reports_library_load_failed() {
    let dirs = TestDirs::new("core_ffi", "load_failure");
    std::env::set_var(ENV_LIBRARY, dirs.file("libhelloworld_av_missing.so"));

    let out = CString::new(dirs.file_str("out.mp4")).unwrap();
    let cmd = CString::new("-version").unwrap();

    let mut messages = Vec::new();
    for _ in 0..2 {
        let results = unsafe {
            [
                take_json(hwf_native_api_test(out.as_ptr())),
                take_json(hwf_embedded_cli_test(out.as_ptr())),
                take_json(hwf_execute(cmd.as_ptr())),
                take_json(hwf_ffmpeg_version()),
            ]
        };
        for v in results {
            assert!(!v["ok"].as_bool().unwrap());
            assert_eq!(v["error"]["code"].as_str().unwrap(), "LIBRARY_LOAD_FAILED");
            messages.push(v["error"]["message"].as_str().unwrap().to_string());
        }
    }
    assert!(messages.iter().all(|m| m == &messages[0]));
    assert!(messages[0].contains("libhelloworld_av_missing.so"));
}
