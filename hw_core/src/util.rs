use std::path::Path;

/// native 产物的大小；文件不存在或为空时返回 None
pub fn artifact_size(path: impl AsRef<Path>) -> Option<u64> {
    let meta = std::fs::metadata(path).ok()?;
    if !meta.is_file() || meta.len() == 0 {
        return None;
    }
    Some(meta.len())
}
