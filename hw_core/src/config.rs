use std::ffi::OsString;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{BridgeError, Result};

pub const ENV_LIBRARY: &str = "HWFFMPEG_LIBRARY";
pub const ENV_LIBRARY_DIR: &str = "HWFFMPEG_LIBRARY_DIR";
pub const ENV_LOG: &str = "HWFFMPEG_LOG";

pub const DEFAULT_LIBRARY_NAME: &str = "helloworld_av";
pub const DEFAULT_FALLBACK_VERSION: &str = "FFmpeg 4.3.x with custom build";

/**
 * Bridge 的配置项。
 *
 * 决定去哪里找 FFmpeg 后端库、版本兜底字符串，以及是否串行化 native 调用。
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    pub library_name: String,          // 逻辑库名，平台文件名由 libloading 拼出
    pub library_dir: Option<PathBuf>,  // None = 交给动态链接器去找
    pub library_path: Option<PathBuf>, // 显式全路径，优先级最高
    pub fallback_version: String,      // 后端没导出 av_version_info 时返回
    pub serialize_calls: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
            library_dir: None,
            library_path: None,
            fallback_version: DEFAULT_FALLBACK_VERSION.to_string(),
            serialize_calls: true,
        }
    }
}

// 所有字段都是 Option，支持只传一部分
#[derive(Deserialize)]
struct BridgeConfigDto {
    #[serde(default)]
    library_name: Option<String>,
    #[serde(default)]
    library_dir: Option<String>,
    #[serde(default)]
    library_path: Option<String>,
    #[serde(default)]
    fallback_version: Option<String>,
    #[serde(default)]
    serialize_calls: Option<bool>,
}

impl From<BridgeConfigDto> for BridgeConfig {
    fn from(dto: BridgeConfigDto) -> Self {
        let def = BridgeConfig::default();
        BridgeConfig {
            library_name: dto
                .library_name
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(def.library_name),
            library_dir: dto.library_dir.filter(|s| !s.is_empty()).map(PathBuf::from),
            library_path: dto.library_path.filter(|s| !s.is_empty()).map(PathBuf::from),
            fallback_version: dto.fallback_version.unwrap_or(def.fallback_version),
            serialize_calls: dto.serialize_calls.unwrap_or(def.serialize_calls),
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let dto: BridgeConfigDto = serde_json::from_str(json).map_err(|e| BridgeError::Config {
            message: format!("invalid config json: {e}"),
        })?;
        Ok(dto.into())
    }

    /// 默认值 + 环境变量覆盖
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var_os(key))
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(p) = lookup(ENV_LIBRARY).filter(|v| !v.is_empty()) {
            self.library_path = Some(PathBuf::from(p));
        }
        if let Some(d) = lookup(ENV_LIBRARY_DIR).filter(|v| !v.is_empty()) {
            self.library_dir = Some(PathBuf::from(d));
        }
        self
    }

    /// 实际交给 dlopen 的路径
    pub fn resolved_library_path(&self) -> PathBuf {
        if let Some(p) = &self.library_path {
            return p.clone();
        }
        let file = libloading::library_filename(&self.library_name);
        match &self.library_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}
