//! 假的 FFmpeg 后端库：导出和真实后端同名的 C 符号，供 `DynamicBackend` 做 dlopen 测试。
//!
//! - `helloworld_av_write`：往输出路径写几个字节，返回 0；路径以 `.fail` 结尾返回 42，空路径返回 22
//! - `ffmpeg_main`：把收到的 argv 按行写进最后一个参数指向的文件；最后一个参数以 `.fail` 结尾返回 187
//! - `av_version_info`：返回 "n7.0.0-stub"；设置了 `HWSTUB_NO_VERSION` 时返回 NULL

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

pub const STUB_VERSION: &str = "n7.0.0-stub";
pub const API_FAIL_STATUS: c_int = 42;
pub const API_EMPTY_PATH_STATUS: c_int = 22;
pub const CLI_FAIL_STATUS: c_int = 187;
// argv[argc] 不是 NULL
pub const CLI_BAD_ARGV_STATUS: c_int = 99;
pub const ENV_NO_VERSION: &str = "HWSTUB_NO_VERSION";

const FAIL_SUFFIX: &str = ".fail";
const FAKE_MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom";
static VERSION_C: &[u8] = b"n7.0.0-stub\0";

/// # Safety
/// `output_filename` 为 NULL 或指向以 NUL 结尾的字符串。
#[no_mangle]
pub unsafe extern "C" fn helloworld_av_write(output_filename: *const c_char) -> c_int {
    if output_filename.is_null() {
        return -1;
    }
    let path = CStr::from_ptr(output_filename).to_string_lossy().into_owned();
    if path.is_empty() {
        return API_EMPTY_PATH_STATUS;
    }
    if path.ends_with(FAIL_SUFFIX) {
        return API_FAIL_STATUS;
    }
    match std::fs::write(&path, FAKE_MP4) {
        Ok(()) => 0,
        Err(_) => -2,
    }
}

/// # Safety
/// `argv` 指向 `argc + 1` 个指针，前 `argc` 个是可写的 NUL 结尾字符串。
#[no_mangle]
pub unsafe extern "C" fn ffmpeg_main(argc: c_int, argv: *mut *mut c_char) -> c_int {
    if argv.is_null() || argc < 1 {
        return -1;
    }
    if !(*argv.add(argc as usize)).is_null() {
        return CLI_BAD_ARGV_STATUS;
    }

    let args: Vec<String> = (0..argc as usize)
        .map(|i| CStr::from_ptr(*argv.add(i)).to_string_lossy().into_owned())
        .collect();

    // 像 getopt 一样就地改写参数，调用方必须扛得住
    for i in 0..argc as usize {
        **argv.add(i) = 0;
    }

    let out = match args.last() {
        Some(o) if args.len() > 1 => o,
        _ => return -1,
    };
    if out.ends_with(FAIL_SUFFIX) {
        return CLI_FAIL_STATUS;
    }
    if out.is_empty() {
        return API_EMPTY_PATH_STATUS;
    }
    match std::fs::write(out, args.join("\n")) {
        Ok(()) => 0,
        Err(_) => -2,
    }
}

#[no_mangle]
pub extern "C" fn av_version_info() -> *const c_char {
    if std::env::var_os(ENV_NO_VERSION).is_some() {
        return std::ptr::null();
    }
    VERSION_C.as_ptr() as *const c_char
}
