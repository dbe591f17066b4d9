use std::ffi::{CStr, CString};

/**
 * FFmpeg 后端接口（Bridge → native）。
 *
 * 返回值就是 native 的原始状态码：0 成功，其它值的含义由后端定义，桥接层不做任何翻译。
 * 真实实现见 `native::DynamicBackend`，测试里用 `testsupport::stub::StubBackend`。
 */
pub trait NativeBackend: Send + Sync + 'static {
    /// 走 FFmpeg 编程 API 生成测试视频（`helloworld_av_write`）
    fn write_test_video(&self, output_path: &CStr) -> i32;

    /// 走内嵌 CLI 入口（`ffmpeg_main`），argv[0] 已经包含在内
    fn run_cli(&self, argv: &[CString]) -> i32;

    /// 后端自带的版本串；None 表示后端不提供
    fn version(&self) -> Option<String>;

    /// 日志里用的描述
    fn describe(&self) -> String {
        "native backend".to_string()
    }
}
