use std::path::Path;

use thiserror::Error;

/// 桥接层自身的错误（与 native 返回的非零状态码是两回事）。
///
/// 必须是 `Clone`：加载失败的结果会被缓存在 OnceCell 里，之后每次调用都原样返回同一个错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("failed to load native library '{path}': {reason}")]
    LibraryLoad { path: String, reason: String },

    #[error("native library '{path}' does not export '{symbol}'")]
    MissingSymbol { symbol: String, path: String },

    #[error("invalid output path: {reason}")]
    InvalidPath { reason: String },

    #[error("invalid ffmpeg command: {reason}")]
    InvalidCommand { reason: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("native library is already loaded")]
    AlreadyLoaded,
}

impl BridgeError {
    /// 给壳侧用的稳定错误码（JSON envelope 里的 `error.code`）
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::LibraryLoad { .. } => "LIBRARY_LOAD_FAILED",
            BridgeError::MissingSymbol { .. } => "SYMBOL_MISSING",
            BridgeError::InvalidPath { .. } => "INVALID_PATH",
            BridgeError::InvalidCommand { .. } => "INVALID_COMMAND",
            BridgeError::Config { .. } => "CONFIG_INVALID",
            BridgeError::AlreadyLoaded => "ALREADY_LOADED",
        }
    }

    /// 是否属于“库没加载起来”这一类
    pub fn is_load_failure(&self) -> bool {
        matches!(self, BridgeError::LibraryLoad { .. } | BridgeError::MissingSymbol { .. })
    }

    pub(crate) fn load(path: &Path, reason: impl ToString) -> Self {
        BridgeError::LibraryLoad {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn missing_symbol(symbol: &str, path: &Path) -> Self {
        BridgeError::MissingSymbol {
            symbol: symbol.to_string(),
            path: path.display().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
