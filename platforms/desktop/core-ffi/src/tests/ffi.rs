use super::super::*;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::Arc;

use hw_core::testsupport::dirs::TestDirs;
use hw_core::testsupport::stub::{StubBackend, STUB_VERSION};

// 进程级后端只能装一次；所有用例装的是同一种桩，先到先得
fn ensure_stub() {
    let _ = hw_core::loader::install_backend(Arc::new(StubBackend::new().writing_artifacts()));
}

unsafe fn take_json(p: *const c_char) -> serde_json::Value {
    assert!(!p.is_null());
    let s = CStr::from_ptr(p).to_string_lossy().into_owned();
    hwf_free_string(p);
    serde_json::from_str(&s).unwrap()
}

#[test]
fn ffi_native_api_ok() {
    ensure_stub();
    let dirs = TestDirs::new("core_ffi", "native_api");
    let out = CString::new(dirs.file_str("helloworld.mp4")).unwrap();

    let v = unsafe { take_json(hwf_native_api_test(out.as_ptr())) };
    assert!(v["ok"].as_bool().unwrap());
    assert_eq!(v["data"]["status"].as_i64().unwrap(), 0);
    assert!(v["data"]["success"].as_bool().unwrap());
    assert!(hw_core::util::artifact_size(dirs.file("helloworld.mp4")).is_some());
}

#[test]
fn ffi_embedded_cli_ok_repeatedly() {
    ensure_stub();
    let dirs = TestDirs::new("core_ffi", "embedded_cli");
    let out = CString::new(dirs.file_str("helloworld_cli.mp4")).unwrap();

    for _ in 0..3 {
        let v = unsafe { take_json(hwf_embedded_cli_test(out.as_ptr())) };
        assert!(v["ok"].as_bool().unwrap());
        assert_eq!(v["data"]["status"].as_i64().unwrap(), 0);
    }
}

#[test]
fn ffi_version_is_stub_string() {
    ensure_stub();
    let v = unsafe { take_json(hwf_ffmpeg_version()) };
    assert!(v["ok"].as_bool().unwrap());
    assert_eq!(v["data"]["version"].as_str().unwrap(), STUB_VERSION);
}

#[test]
fn ffi_execute_ok_and_blank_rejected() {
    ensure_stub();
    let dirs = TestDirs::new("core_ffi", "execute");
    let cmd = CString::new(format!("-f lavfi -i testsrc -t 1 -y {}", dirs.file_str("out.mp4"))).unwrap();
    let v = unsafe { take_json(hwf_execute(cmd.as_ptr())) };
    assert!(v["ok"].as_bool().unwrap());

    let blank = CString::new("   ").unwrap();
    let v = unsafe { take_json(hwf_execute(blank.as_ptr())) };
    assert!(!v["ok"].as_bool().unwrap());
    assert_eq!(v["error"]["code"].as_str().unwrap(), "INVALID_COMMAND");
}

#[test]
fn ffi_null_path_is_error_not_crash() {
    ensure_stub();
    let v = unsafe { take_json(hwf_native_api_test(std::ptr::null())) };
    assert!(!v["ok"].as_bool().unwrap());
    assert_eq!(v["error"]["code"].as_str().unwrap(), "NATIVE_API_FAILED");
    assert!(v["error"]["message"].as_str().unwrap().contains("null c string"));

}

#[test]
fn ffi_empty_path_reaches_backend() {
    ensure_stub();
    // 空路径不是桥接层错误：交给后端，状态码原样返回（桩返回 0）
    let empty = CString::new("").unwrap();
    let v = unsafe { take_json(hwf_embedded_cli_test(empty.as_ptr())) };
    assert!(v["ok"].as_bool().unwrap());
    assert_eq!(v["data"]["status"].as_i64().unwrap(), 0);

    let v = unsafe { take_json(hwf_native_api_test(empty.as_ptr())) };
    assert!(v["ok"].as_bool().unwrap());
    assert_eq!(v["data"]["status"].as_i64().unwrap(), 0);
}

#[test]
fn ffi_configure_after_load_refused() {
    ensure_stub();
    // 先触发一次加载
    let _ = unsafe { take_json(hwf_ffmpeg_version()) };

    let cfg = CString::new(r#"{"library_dir":"/opt/ffmpeg/lib"}"#).unwrap();
    let v = unsafe { take_json(hwf_configure(cfg.as_ptr())) };
    assert!(!v["ok"].as_bool().unwrap());
    assert_eq!(v["error"]["code"].as_str().unwrap(), "ALREADY_LOADED");

    let bad = CString::new("{oops").unwrap();
    let v = unsafe { take_json(hwf_configure(bad.as_ptr())) };
    assert_eq!(v["error"]["code"].as_str().unwrap(), "CONFIG_INVALID");
}

#[test]
fn ffi_version_numbers() {
    let (mut major, mut minor) = (0u32, 0u32);
    hwf_get_ffi_version(&mut major, &mut minor);
    assert_eq!((major, minor), (1, 0));
    hwf_get_ffi_version(std::ptr::null_mut(), std::ptr::null_mut());
}
