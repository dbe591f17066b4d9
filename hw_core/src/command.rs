use std::ffi::CString;

use crate::error::{BridgeError, Result};

/// 内嵌 CLI 入口的 argv[0]
pub const PROGRAM_NAME: &str = "ffmpeg";

// lavfi 合成源：testsrc 视频 + 静音单声道音频，时长 2 秒
const TEST_SOURCES: &[&str] = &[
    "-hide_banner",
    "-f", "lavfi", "-i", "testsrc=size=320x240:rate=30",
    "-f", "lavfi", "-i", "anullsrc=channel_layout=mono:sample_rate=48000",
    "-t", "2", "-shortest",
];

#[cfg(target_vendor = "apple")]
const VIDEO_CODEC: &[&str] = &["-c:v", "h264_videotoolbox"];
#[cfg(not(target_vendor = "apple"))]
const VIDEO_CODEC: &[&str] = &["-c:v", "mpeg4", "-q:v", "5"];

/// 交给 `ffmpeg_main` 的参数列表（不含 argv[0]）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliCommand {
    args: Vec<String>,
}

impl CliCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { args: args.into_iter().map(Into::into).collect() }
    }

    /// 生成测试视频的命令。输出路径始终是单独一个参数，带空格也不会被拆开。
    pub fn test_video(output_path: &str) -> Self {
        let mut args: Vec<String> = TEST_SOURCES.iter().map(|s| s.to_string()).collect();
        args.extend(VIDEO_CODEC.iter().map(|s| s.to_string()));
        args.extend(["-c:a", "aac", "-y"].iter().map(|s| s.to_string()));
        args.push(output_path.to_string());
        Self { args }
    }

    /// 按空白切分任意命令行（连续空格视为一个分隔符）
    pub fn parse(line: &str) -> Result<Self> {
        let args: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if args.is_empty() {
            return Err(BridgeError::InvalidCommand { reason: "empty command line".into() });
        }
        Ok(Self { args })
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// 带 argv[0] 的 C 字符串数组
    pub fn to_argv(&self) -> Result<Vec<CString>> {
        std::iter::once(PROGRAM_NAME)
            .chain(self.args.iter().map(String::as_str))
            .map(|a| {
                CString::new(a).map_err(|_| BridgeError::InvalidCommand {
                    reason: format!("argument contains NUL byte: {a:?}"),
                })
            })
            .collect()
    }
}

impl std::fmt::Display for CliCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_targets_output_last() {
        let cmd = CliCommand::test_video("/sdcard/cache/helloworld_cli.android.mp4");
        let args = cmd.args();
        assert_eq!(args.first().map(String::as_str), Some("-hide_banner"));
        assert_eq!(args.last().map(String::as_str), Some("/sdcard/cache/helloworld_cli.android.mp4"));
        assert_eq!(args[args.len() - 2], "-y");
        assert!(args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "aac"));
        assert!(args.iter().any(|a| a == "testsrc=size=320x240:rate=30"));
    }

    #[cfg(not(target_vendor = "apple"))]
    #[test]
    fn software_encoder_off_apple() {
        let cmd = CliCommand::test_video("out.mp4");
        assert!(cmd.to_string().contains("-c:v mpeg4 -q:v 5"));
    }

    #[test]
    fn output_path_with_spaces_stays_one_arg() {
        let cmd = CliCommand::test_video("/tmp/my videos/out.mp4");
        assert_eq!(cmd.args().last().unwrap(), "/tmp/my videos/out.mp4");
    }

    #[test]
    fn parse_collapses_spaces() {
        let cmd = CliCommand::parse("  -i  in.mp4 -c copy   out.mkv ").unwrap();
        assert_eq!(cmd.args(), &["-i", "in.mp4", "-c", "copy", "out.mkv"]);

        let argv = cmd.to_argv().unwrap();
        assert_eq!(argv.len(), 6);
        assert_eq!(argv[0].to_str().unwrap(), PROGRAM_NAME);
        assert_eq!(argv[5].to_str().unwrap(), "out.mkv");
    }

    #[test]
    fn parse_rejects_blank() {
        let err = CliCommand::parse("   ").unwrap_err();
        assert_eq!(err.code(), "INVALID_COMMAND");
    }

    #[test]
    fn nul_in_argument_is_rejected() {
        let cmd = CliCommand::new(["-i", "bad\0name"]);
        assert!(matches!(cmd.to_argv(), Err(BridgeError::InvalidCommand { .. })));
    }
}
