use std::ffi::{CStr, CString};
use std::sync::Mutex;

use crate::backend::NativeBackend;

pub const STUB_VERSION: &str = "n7.0.0-stub";

// 写给“产物”的假内容：一个最小的 ftyp box 头
const FAKE_MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StubCall {
    WriteTestVideo(String),
    RunCli(Vec<String>),
    Version,
}

/// 可配置的假后端：返回固定状态码/版本，并记录每次调用。
pub struct StubBackend {
    api_status: i32,
    cli_status: i32,
    version: Option<String>,
    write_artifacts: bool,
    calls: Mutex<Vec<StubCall>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            api_status: 0,
            cli_status: 0,
            version: Some(STUB_VERSION.to_string()),
            write_artifacts: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_api_status(mut self, code: i32) -> Self {
        self.api_status = code;
        self
    }

    pub fn with_cli_status(mut self, code: i32) -> Self {
        self.cli_status = code;
        self
    }

    pub fn with_version(mut self, v: Option<&str>) -> Self {
        self.version = v.map(str::to_string);
        self
    }

    /// 成功时真的往输出路径写一个小文件
    pub fn writing_artifacts(mut self) -> Self {
        self.write_artifacts = true;
        self
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StubCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn maybe_write(&self, status: i32, path: &str) {
        if self.write_artifacts && status == 0 {
            let _ = std::fs::write(path, FAKE_MP4);
        }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeBackend for StubBackend {
    fn write_test_video(&self, output_path: &CStr) -> i32 {
        let path = output_path.to_string_lossy().into_owned();
        self.record(StubCall::WriteTestVideo(path.clone()));
        self.maybe_write(self.api_status, &path);
        self.api_status
    }

    fn run_cli(&self, argv: &[CString]) -> i32 {
        let args: Vec<String> = argv.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        if let Some(out) = args.last() {
            self.maybe_write(self.cli_status, out);
        }
        self.record(StubCall::RunCli(args));
        self.cli_status
    }

    fn version(&self) -> Option<String> {
        self.record(StubCall::Version);
        self.version.clone()
    }

    fn describe(&self) -> String {
        "stub backend".to_string()
    }
}
