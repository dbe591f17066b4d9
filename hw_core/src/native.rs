use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use libloading::Library;

use crate::backend::NativeBackend;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};

pub const SYM_AV_WRITE: &str = "helloworld_av_write";
pub const SYM_FFMPEG_MAIN: &str = "ffmpeg_main";
pub const SYM_VERSION_INFO: &str = "av_version_info";

type AvWriteFn = unsafe extern "C" fn(output_filename: *const c_char) -> c_int;
type FfmpegMainFn = unsafe extern "C" fn(argc: c_int, argv: *mut *mut c_char) -> c_int;
type VersionInfoFn = unsafe extern "C" fn() -> *const c_char;

/// 通过 dlopen 加载的 FFmpeg 后端。
///
/// 函数指针从 `_lib` 里解析出来，`_lib` 和它们同生命周期，所以指针始终有效。
pub struct DynamicBackend {
    path: PathBuf,
    av_write: AvWriteFn,
    ffmpeg_main: FfmpegMainFn,
    version_info: Option<VersionInfoFn>,
    // ffmpeg_main 有全局状态，默认串行
    call_lock: Option<Mutex<()>>,
    _lib: Library,
}

impl DynamicBackend {
    pub fn open(cfg: &BridgeConfig) -> Result<Self> {
        let path = cfg.resolved_library_path();
        tracing::debug!(target: "HelloWorldFFmpeg", path = %path.display(), "loading native library");

        // 加载任意共享库会执行它的初始化代码，这里只能信任配置给出的路径
        let lib = unsafe { Library::new(&path) }.map_err(|e| BridgeError::load(&path, e))?;

        let av_write: AvWriteFn = required(&lib, &path, SYM_AV_WRITE)?;
        let ffmpeg_main: FfmpegMainFn = required(&lib, &path, SYM_FFMPEG_MAIN)?;
        let version_info: Option<VersionInfoFn> = optional(&lib, SYM_VERSION_INFO);

        tracing::info!(
            target: "HelloWorldFFmpeg",
            path = %path.display(),
            has_version_info = version_info.is_some(),
            "native library loaded"
        );

        Ok(Self {
            path,
            av_write,
            ffmpeg_main,
            version_info,
            call_lock: cfg.serialize_calls.then(|| Mutex::new(())),
            _lib: lib,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guarded<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.call_lock {
            Some(m) => {
                // native 调用里 panic 不会发生，poison 只可能来自别处，直接接着用
                let _g = m.lock().unwrap_or_else(|e| e.into_inner());
                f()
            }
            None => f(),
        }
    }
}

fn symbol_name(name: &str) -> Vec<u8> {
    let mut v = name.as_bytes().to_vec();
    v.push(0);
    v
}

fn required<T: Copy>(lib: &Library, path: &Path, name: &str) -> Result<T> {
    let sym = unsafe { lib.get::<T>(&symbol_name(name)) }
        .map_err(|_| BridgeError::missing_symbol(name, path))?;
    tracing::debug!(target: "HelloWorldFFmpeg", symbol = name, "resolved");
    Ok(*sym)
}

fn optional<T: Copy>(lib: &Library, name: &str) -> Option<T> {
    unsafe { lib.get::<T>(&symbol_name(name)) }.ok().map(|s| *s)
}

impl NativeBackend for DynamicBackend {
    fn write_test_video(&self, output_path: &CStr) -> i32 {
        self.guarded(|| unsafe { (self.av_write)(output_path.as_ptr()) })
    }

    fn run_cli(&self, argv: &[CString]) -> i32 {
        // ffmpeg_main 拿的是 char**：给它一份自己持有的可写缓冲区，
        // 释放时按 Vec 的长度走，不依赖 native 之后字符串里还剩什么
        let mut bufs: Vec<Vec<u8>> = argv.iter().map(|a| a.as_bytes_with_nul().to_vec()).collect();
        let mut ptrs: Vec<*mut c_char> = bufs.iter_mut().map(|b| b.as_mut_ptr() as *mut c_char).collect();
        let argc = ptrs.len() as c_int;
        ptrs.push(std::ptr::null_mut());

        self.guarded(|| unsafe { (self.ffmpeg_main)(argc, ptrs.as_mut_ptr()) })
    }

    fn version(&self) -> Option<String> {
        let f = self.version_info?;
        let p = unsafe { f() };
        if p.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned())
    }

    fn describe(&self) -> String {
        format!("dynamic library {}", self.path.display())
    }
}
