use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::backend::NativeBackend;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::native::DynamicBackend;

type LoadResult = std::result::Result<Arc<dyn NativeBackend>, BridgeError>;

/// “加载一次、调用多次”的守卫。
///
/// 成功和失败都会被缓存：库没加载起来时，之后每次调用拿到的都是同一个错误。
pub struct NativeLoader {
    cell: OnceCell<LoadResult>,
}

impl NativeLoader {
    pub const fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    /// 并发首次调用时只有一个线程执行 `load`，其余线程阻塞等结果
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<dyn NativeBackend>>
    where
        F: FnOnce() -> LoadResult,
    {
        self.cell
            .get_or_init(|| {
                let r = load();
                if let Err(e) = &r {
                    tracing::warn!(target: "HelloWorldFFmpeg", code = e.code(), "native load failed: {e}");
                }
                r
            })
            .clone()
    }

    /// 直接放入一个已经准备好的后端（静态链接 / 测试桩）。已经加载过则拒绝。
    pub fn install(&self, backend: Arc<dyn NativeBackend>) -> Result<()> {
        self.cell.set(Ok(backend)).map_err(|_| BridgeError::AlreadyLoaded)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// 已加载的结果（未加载返回 None，不会触发加载）
    pub fn peek(&self) -> Option<Result<Arc<dyn NativeBackend>>> {
        self.cell.get().cloned()
    }
}

impl Default for NativeLoader {
    fn default() -> Self {
        Self::new()
    }
}

static NATIVE: NativeLoader = NativeLoader::new();
static CONFIG: OnceCell<BridgeConfig> = OnceCell::new();
// 加载（或 install）一旦开始就置位；在读取 CONFIG 之前写入
static LOAD_STARTED: AtomicBool = AtomicBool::new(false);

/// 进程级配置：第一次读取时定型，没配置过就用环境变量
pub fn config() -> &'static BridgeConfig {
    CONFIG.get_or_init(BridgeConfig::from_env)
}

/// 在首次加载之前设置进程级配置。
///
/// 和首次加载并发时，`CONFIG.set` 失败的原因按 `LOAD_STARTED` 判定，
/// 所以加载已经开始的一方总是得到 `AlreadyLoaded`。
pub fn configure(cfg: BridgeConfig) -> Result<()> {
    if LOAD_STARTED.load(Ordering::SeqCst) {
        return Err(BridgeError::AlreadyLoaded);
    }
    CONFIG
        .set(cfg)
        .map_err(|_| refused_config(LOAD_STARTED.load(Ordering::SeqCst)))
}

fn refused_config(load_started: bool) -> BridgeError {
    if load_started {
        BridgeError::AlreadyLoaded
    } else {
        BridgeError::Config { message: "bridge is already configured".into() }
    }
}

/// 进程级后端；第一次调用时按 `config()` 去 dlopen
pub fn native() -> Result<Arc<dyn NativeBackend>> {
    LOAD_STARTED.store(true, Ordering::SeqCst);
    NATIVE.get_or_load(|| {
        let backend = DynamicBackend::open(config())?;
        Ok(Arc::new(backend) as Arc<dyn NativeBackend>)
    })
}

/// 把进程级后端换成给定实现（必须在首次加载之前）
pub fn install_backend(backend: Arc<dyn NativeBackend>) -> Result<()> {
    LOAD_STARTED.store(true, Ordering::SeqCst);
    NATIVE.install(backend)
}
