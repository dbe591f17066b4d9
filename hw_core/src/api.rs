// hw_core/src/api.rs

use std::ffi::CString;
use std::sync::Arc;
use std::time::Instant;

use crate::backend::NativeBackend;
use crate::command::CliCommand;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::loader;

/// native 返回的原始状态码。0 表示成功，其它值原样透传。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct NativeStatus(pub i32);

impl NativeStatus {
    pub const SUCCESS: NativeStatus = NativeStatus(0);

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for NativeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_success() {
            write!(f, "success")
        } else {
            write!(f, "failed with code {}", self.0)
        }
    }
}

/**
 * 三个 native 操作的入口。
 *
 * 只做转发：把路径转成 C 字符串、打日志、调用后端，然后把结果原样交回。
 * `Bridge` 很轻（一个 Arc + 一份配置），可以随意 clone。
 */
#[derive(Clone)]
pub struct Bridge {
    backend: Arc<dyn NativeBackend>,
    fallback_version: String,
}

impl Bridge {
    pub fn with_backend(backend: Arc<dyn NativeBackend>, cfg: &BridgeConfig) -> Self {
        Self {
            backend,
            fallback_version: cfg.fallback_version.clone(),
        }
    }

    /// 进程级 Bridge：首次调用触发一次性加载，之后复用同一个后端（或同一个加载错误）
    pub fn shared() -> Result<Self> {
        let backend = loader::native()?;
        Ok(Self::with_backend(backend, loader::config()))
    }

    pub fn backend(&self) -> &Arc<dyn NativeBackend> {
        &self.backend
    }

    /// nativeAPITest：走 FFmpeg 编程 API 在 `output_path` 生成视频
    pub fn native_api_test(&self, output_path: &str) -> Result<NativeStatus> {
        let c_path = to_c_path(output_path)?;
        tracing::info!(target: "HelloWorldFFmpeg", output = output_path, "Starting native API test");

        let started = Instant::now();
        let status = NativeStatus(self.backend.write_test_video(&c_path));
        report("Native API test", status, started);
        Ok(status)
    }

    /// embeddedCLITest：走内嵌 ffmpeg 命令行生成同样的视频
    pub fn embedded_cli_test(&self, output_path: &str) -> Result<NativeStatus> {
        to_c_path(output_path)?;
        tracing::info!(target: "HelloWorldFFmpeg", output = output_path, "Starting embedded CLI test");
        self.run_command("Embedded CLI test", &CliCommand::test_video(output_path))
    }

    /// 跑任意一条 ffmpeg 参数行（不含开头的 "ffmpeg"）
    pub fn execute_cli(&self, command_line: &str) -> Result<NativeStatus> {
        let cmd = CliCommand::parse(command_line)?;
        self.run_command("FFmpeg command", &cmd)
    }

    fn run_command(&self, what: &str, cmd: &CliCommand) -> Result<NativeStatus> {
        let argv = cmd.to_argv()?;
        tracing::info!(target: "HelloWorldFFmpeg", argc = argv.len(), "FFmpeg command: {cmd}");

        let started = Instant::now();
        let status = NativeStatus(self.backend.run_cli(&argv));
        report(what, status, started);
        Ok(status)
    }

    /// getFFmpegVersion：后端的版本串，后端不提供时用配置里的兜底值
    pub fn ffmpeg_version(&self) -> String {
        self.backend
            .version()
            .unwrap_or_else(|| self.fallback_version.clone())
    }
}

// 空路径也原样交给 native，由后端决定返回什么状态码
fn to_c_path(output_path: &str) -> Result<CString> {
    CString::new(output_path).map_err(|_| BridgeError::InvalidPath {
        reason: "output path contains a NUL byte".into(),
    })
}

fn report(what: &str, status: NativeStatus, started: Instant) {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_success() {
        tracing::info!(target: "HelloWorldFFmpeg", elapsed_ms, "{what} succeeded");
    } else {
        tracing::error!(target: "HelloWorldFFmpeg", code = status.code(), elapsed_ms, "{what} failed");
    }
}

#[cfg(test)]
mod tests;
