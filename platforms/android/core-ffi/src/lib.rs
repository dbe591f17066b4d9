//! `libhelloworldffmpeg.so`：`com.example.helloworldffmpeg.HelloWorldFFmpeg` 的 native 实现。
//!
//! Java 侧 `System.loadLibrary("helloworldffmpeg")` 之后，三个 native 方法直接落到这里，
//! 再转发给 `hw_core::api::Bridge`。

use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};

use anyhow::Context;
use hw_core::api::Bridge;
use hw_core::error::BridgeError;
use jni::objects::{JObject, JString};
use jni::sys::{jint, jstring, JNI_VERSION_1_6};
use jni::JNIEnv;

// 桥接层出错时（不是 native 返回非零）int 方法返回的值，同时挂一个 Java 异常
const BRIDGE_FAILURE: jint = -1;

// --- 辅助宏：捕获 Panic 和 Result，转成 Java 异常 ---
macro_rules! jni_safe {
    ($env:ident, $fallback:expr, $body:block) => {{
        let result = panic::catch_unwind(AssertUnwindSafe(|| -> anyhow::Result<_> { $body }));

        match result {
            Ok(Ok(v)) => v,
            Ok(Err(e)) => {
                crate::throw(&mut $env, &e);
                $fallback
            }
            Err(_) => {
                tracing::error!(target: "HelloWorldFFmpeg", "CRITICAL: Rust panic caught at JNI boundary");
                crate::throw_class(&mut $env, "java/lang/RuntimeException", "Rust panicked internally");
                $fallback
            }
        }
    }};
}

/// 错误 → (Java 异常类, 消息)
fn exception_for(err: &anyhow::Error) -> (&'static str, String) {
    let class = match err.downcast_ref::<BridgeError>() {
        Some(e) if e.is_load_failure() => "java/lang/UnsatisfiedLinkError",
        Some(BridgeError::InvalidPath { .. }) | Some(BridgeError::InvalidCommand { .. }) => {
            "java/lang/IllegalArgumentException"
        }
        Some(_) => "java/lang/IllegalStateException",
        None => "java/lang/RuntimeException",
    };
    (class, format!("{err:#}"))
}

fn throw(env: &mut JNIEnv, err: &anyhow::Error) {
    // jni 调用本身失败时 JVM 里可能已经有异常了，不要覆盖
    if env.exception_check().unwrap_or(false) {
        return;
    }
    let (class, msg) = exception_for(err);
    throw_class(env, class, &msg);
}

fn throw_class(env: &mut JNIEnv, class: &str, msg: &str) {
    if let Err(e) = env.throw_new(class, msg) {
        tracing::error!(target: "HelloWorldFFmpeg", "failed to throw {class}: {e}");
    }
}

fn read_path(env: &mut JNIEnv, s: &JString) -> anyhow::Result<String> {
    if s.is_null() {
        return Err(BridgeError::InvalidPath { reason: "outputPath is null".into() }.into());
    }
    let path: String = env.get_string(s).context("read outputPath")?.into();
    Ok(path)
}

/// 库被加载时执行一次：初始化日志并尝试加载 FFmpeg 后端。
///
/// 后端加载失败不会让 `System.loadLibrary` 失败；错误被缓存，之后每次调用都抛同一个 `UnsatisfiedLinkError`。
#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    let _ = panic::catch_unwind(|| {
        hw_core::logs::init_logging(None);
        match Bridge::shared() {
            Ok(b) => tracing::info!(target: "HelloWorldFFmpeg", backend = %b.backend().describe(), "bridge ready"),
            Err(e) => tracing::warn!(target: "HelloWorldFFmpeg", "bridge not ready: {e}"),
        }
    });
    JNI_VERSION_1_6
}

#[no_mangle]
pub extern "system" fn Java_com_example_helloworldffmpeg_HelloWorldFFmpeg_nativeAPITest<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    output_path: JString<'local>,
) -> jint {
    jni_safe!(env, BRIDGE_FAILURE, {
        let path = read_path(&mut env, &output_path)?;
        let status = Bridge::shared()?.native_api_test(&path)?;
        Ok(status.code())
    })
}

#[no_mangle]
pub extern "system" fn Java_com_example_helloworldffmpeg_HelloWorldFFmpeg_embeddedCLITest<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    output_path: JString<'local>,
) -> jint {
    jni_safe!(env, BRIDGE_FAILURE, {
        let path = read_path(&mut env, &output_path)?;
        let status = Bridge::shared()?.embedded_cli_test(&path)?;
        Ok(status.code())
    })
}

#[no_mangle]
pub extern "system" fn Java_com_example_helloworldffmpeg_HelloWorldFFmpeg_getFFmpegVersion<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    jni_safe!(env, std::ptr::null_mut(), {
        let version = Bridge::shared()?.ffmpeg_version();
        let s = env.new_string(version).context("new_string")?;
        Ok(s.into_raw())
    })
}
