use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hw_core::loader;
use hw_core::prelude::*;
use hw_core::util::artifact_size;

#[derive(Parser)]
#[command(name = "hw-demo", about = "FFmpeg Hello World Test", version)]
struct Args {
    /// FFmpeg 后端库的完整路径（默认按 HWFFMPEG_LIBRARY / HWFFMPEG_LIBRARY_DIR 查找）
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// 打开 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// 用 FFmpeg native API 生成测试视频
    Native { output: String },
    /// 用内嵌 FFmpeg CLI 生成测试视频
    Cli { output: String },
    /// 执行任意 ffmpeg 参数行（不含 "ffmpeg" 本身）
    Exec { command: String },
    /// 打印 FFmpeg 版本
    Version,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(Some(if args.verbose { "debug" } else { "info" }));

    if let Some(lib) = args.library {
        let cfg = BridgeConfig { library_path: Some(lib), ..BridgeConfig::from_env() };
        loader::configure(cfg).context("configure bridge")?;
    }

    let bridge = Bridge::shared().context("load FFmpeg backend")?;

    let (label, output, status) = match &args.mode {
        Mode::Version => {
            println!("{}", bridge.ffmpeg_version());
            return Ok(ExitCode::SUCCESS);
        }
        Mode::Native { output } => {
            print_header("native", output);
            println!("Using FFmpeg native API...");
            ("native", Some(output.as_str()), bridge.native_api_test(output)?)
        }
        Mode::Cli { output } => {
            print_header("cli", output);
            println!("Using embedded FFmpeg CLI...");
            ("cli", Some(output.as_str()), bridge.embedded_cli_test(output)?)
        }
        Mode::Exec { command } => {
            println!("Executing: ffmpeg {command}");
            ("exec", None, bridge.execute_cli(command)?)
        }
    };

    match (status.is_success(), output) {
        (true, Some(out)) => {
            println!("✅ Success: Created {out} using {label} method");
            if let Some(size) = artifact_size(out) {
                println!("File size: {size} bytes");
            }
        }
        (true, None) => println!("✅ Success"),
        (false, Some(out)) => println!("❌ Failed: Error {} creating {out}", status.code()),
        (false, None) => println!("❌ Failed: Error {}", status.code()),
    }

    Ok(ExitCode::from(exit_byte(status)))
}

// 退出码就是 native 状态码；截到一个字节后不能把失败变成 0
fn exit_byte(status: NativeStatus) -> u8 {
    match status.code() {
        0 => 0,
        c if c & 0xff == 0 => 1,
        c => (c & 0xff) as u8,
    }
}

fn print_header(mode: &str, output: &str) {
    println!("FFmpeg Hello World Test");
    println!("Mode: {mode}");
    println!("Output: {output}");
    println!("=====================================");
}
