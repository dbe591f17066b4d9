use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct TestDirs {
    pub root: PathBuf,
}

impl TestDirs {
    /// crate_tag 建议用 "hw_core" / "core_ffi"；test_tag 用具体用例名
    pub fn new(crate_tag: &str, test_tag: &str) -> Self {
        let uid = uuid::Uuid::new_v4().to_string();
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        // 1) 优先尊重 CARGO_TARGET_DIR
        // 2) 否则从 manifest 往上找第一个存在的 target/
        let target = std::env::var_os("CARGO_TARGET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| find_target_dir(&manifest));

        // target/hwffmpeg_tests/<crate_tag>/<test_tag>_<uuid>/
        let root = target
            .join("hwffmpeg_tests")
            .join(crate_tag)
            .join(format!("{test_tag}_{uid}"));

        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn file_str(&self, name: &str) -> String {
        self.file(name).to_string_lossy().to_string()
    }
}

impl Drop for TestDirs {
    fn drop(&mut self) {
        // 如需保留现场排查：运行测试时加 HW_TEST_KEEP=1
        if std::env::var_os("HW_TEST_KEEP").is_some() {
            eprintln!("[test] keeping test dirs: {:?}", self.root);
            return;
        }
        let _ = remove_dir_all_retry(&self.root, Duration::from_millis(500));
    }
}

fn find_target_dir(from: &Path) -> PathBuf {
    // 最多向上找 8 层：适配 platforms/*/core-ffi 那种深目录
    let mut cur = from.to_path_buf();
    for _ in 0..8 {
        let cand = cur.join("target");
        if cand.exists() {
            return cand;
        }
        if let Some(p) = cur.parent() {
            cur = p.to_path_buf();
        } else {
            break;
        }
    }
    from.join("target")
}

fn remove_dir_all_retry(path: &Path, max_wait: Duration) -> std::io::Result<()> {
    let start = Instant::now();
    loop {
        match std::fs::remove_dir_all(path) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(_) if start.elapsed() < max_wait => {
                std::thread::sleep(Duration::from_millis(30));
            }
            Err(e) => return Err(e),
        }
    }
}
