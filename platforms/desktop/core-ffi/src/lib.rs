mod error;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};

use anyhow::Context;
use hw_core::api::{Bridge, NativeStatus};
use hw_core::config::BridgeConfig;

use crate::error::{err_from, err_json, ok_json};

// --- 辅助宏：捕获 Panic 和 Result ---
// 每个导出函数都返回一个 JSON 字符串，调用方用 hwf_free_string 释放
macro_rules! ffi_safe {
    ($code:expr, $body:block) => {{
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let run = (|| -> anyhow::Result<String> { $body })();
            match run {
                Ok(s) => crate::ret(s),
                Err(e) => crate::ret(err_from($code, &e)),
            }
        }));

        match result {
            Ok(ptr) => ptr,
            Err(_) => {
                tracing::error!(target: "HelloWorldFFmpeg", "CRITICAL: Rust panic caught at FFI boundary");
                crate::ret(err_json("PANIC", "Rust panicked internally"))
            }
        }
    }};
}

fn cstr_to_str<'a>(p: *const c_char) -> anyhow::Result<&'a str> {
    if p.is_null() {
        anyhow::bail!("null c string");
    }
    let s = unsafe { CStr::from_ptr(p) }.to_str()?;
    Ok(s)
}

fn ret(s: String) -> *const c_char {
    // serde_json 输出里不会有裸 NUL
    CString::new(s).unwrap_or_default().into_raw()
}

fn status_json(status: NativeStatus) -> String {
    ok_json(serde_json::json!({
        "status": status,
        "success": status.is_success(),
    }))
}

/// 释放本库返回的字符串。传空指针是安全的；同一个指针不能释放两次。
#[no_mangle]
pub extern "C" fn hwf_free_string(s: *const c_char) {
    if s.is_null() { return; }
    unsafe { drop(CString::from_raw(s as *mut c_char)); }
}

/// 在第一次调用任何操作之前设置配置（JSON，字段都可选）。
///
/// 返回 `{"ok":true,"data":{"library":"<resolved path>"}}`；后端已经加载过时返回 `ALREADY_LOADED`。
#[no_mangle]
pub extern "C" fn hwf_configure(cfg_json: *const c_char) -> *const c_char {
    ffi_safe!("CONFIGURE_FAILED", {
        let cfg_s = cstr_to_str(cfg_json)?;
        let cfg = BridgeConfig::from_json(cfg_s)?;
        let library = cfg.resolved_library_path().display().to_string();
        hw_core::loader::configure(cfg)?;
        Ok(ok_json(serde_json::json!({ "library": library })))
    })
}

#[no_mangle]
pub extern "C" fn hwf_native_api_test(output_path: *const c_char) -> *const c_char {
    ffi_safe!("NATIVE_API_FAILED", {
        let path = cstr_to_str(output_path).context("output_path")?;
        let status = Bridge::shared()?.native_api_test(path)?;
        Ok(status_json(status))
    })
}

#[no_mangle]
pub extern "C" fn hwf_embedded_cli_test(output_path: *const c_char) -> *const c_char {
    ffi_safe!("EMBEDDED_CLI_FAILED", {
        let path = cstr_to_str(output_path).context("output_path")?;
        let status = Bridge::shared()?.embedded_cli_test(path)?;
        Ok(status_json(status))
    })
}

/// 执行任意 ffmpeg 参数行（不带 "ffmpeg" 前缀）
#[no_mangle]
pub extern "C" fn hwf_execute(command_line: *const c_char) -> *const c_char {
    ffi_safe!("EXECUTE_FAILED", {
        let line = cstr_to_str(command_line).context("command_line")?;
        let status = Bridge::shared()?.execute_cli(line)?;
        Ok(status_json(status))
    })
}

/// 返回格式：{"ok": true, "data": {"version": "..."}}
#[no_mangle]
pub extern "C" fn hwf_ffmpeg_version() -> *const c_char {
    ffi_safe!("VERSION_FAILED", {
        let version = Bridge::shared()?.ffmpeg_version();
        Ok(ok_json(serde_json::json!({ "version": version })))
    })
}

#[no_mangle]
pub extern "C" fn hwf_get_ffi_version(major: *mut u32, minor: *mut u32) {
	unsafe {
		if !major.is_null() { *major = 1; }
		if !minor.is_null() { *minor = 0; }
	}
}

#[cfg(test)]
mod tests;
