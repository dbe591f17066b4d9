use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
#[cfg(target_os = "android")]
use tracing_subscriber::Layer;

use crate::config::ENV_LOG;

pub const DEFAULT_FILTER: &str = "hw_core=info,HelloWorldFFmpeg=info";

/// logcat 里用的 tag
pub const LOG_TAG: &str = "HelloWorldFFmpeg";

// Android 上 app 进程的 stderr 被丢弃，事件要走 logcat
#[cfg(target_os = "android")]
fn logcat_layer<S>() -> Option<Box<dyn tracing_subscriber::Layer<S> + Send + Sync>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    tracing_android::layer(LOG_TAG).ok().map(|l| l.boxed())
}

#[cfg(not(target_os = "android"))]
fn logcat_layer<S>() -> Option<Box<dyn tracing_subscriber::Layer<S> + Send + Sync>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    None
}

/// 安装 tracing 订阅者：stderr 一份，Android 上另加 logcat（tag `HelloWorldFFmpeg`）。
///
/// 过滤规则优先级：`HWFFMPEG_LOG` > 参数 `filter` > `DEFAULT_FILTER`。
/// 可以重复调用：宿主已经装过订阅者时静默跳过，返回 false。
pub fn init_logging(filter: Option<&str>) -> bool {
    let filter = std::env::var(ENV_LOG)
        .ok()
        .and_then(|s| EnvFilter::try_new(s).ok())
        .or_else(|| filter.and_then(|f| EnvFilter::try_new(f).ok()))
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(logcat_layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}
