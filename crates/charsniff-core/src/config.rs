//! 配置文件加载（TOML）
//!
//! ```toml
//! [detect]
//! confidence = 0.8
//! method = "chardetng"
//!
//! [scan]
//! max_file_size = 5242880
//! threads = 4
//! recursive = true
//! ```
use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::options::{DetectOptions, ScanOptions};

/// 顶层配置文件结构；缺省的表与字段都回落到默认值
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub detect: DetectOptions,
    pub scan: ScanOptions,
}

impl Config {
    /// 合并为扫描选项（`[detect]` 表放入 `ScanOptions::detect`）
    pub fn into_scan_options(self) -> ScanOptions {
        ScanOptions { detect: self.detect, ..self.scan }
    }
}

/// 从 TOML 文件加载配置
pub fn load_config(path: &Path) -> Result<Config> {
    let txt = std::fs::read_to_string(path)?;
    toml::from_str(&txt).map_err(|source| Error::Config { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn full_config_is_loaded() {
        let f = write_config(
            r#"
[detect]
confidence = 0.8
method = "chardetng"

[scan]
max_file_size = 1024
threads = 2
recursive = true
"#,
        );
        let opts = load_config(f.path()).unwrap().into_scan_options();
        assert_eq!(opts.detect, DetectOptions::default().with_confidence(0.8).with_method("chardetng"));
        assert_eq!(opts.max_file_size, Some(1024));
        assert_eq!(opts.threads, Some(2));
        assert!(opts.recursive);
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let f = write_config("");
        assert_eq!(load_config(f.path()).unwrap(), Config::default());
    }

    #[test]
    fn bad_types_and_unknown_keys_are_config_errors() {
        let f = write_config("[detect]\nconfidence = \"high\"\n");
        assert!(matches!(load_config(f.path()), Err(Error::Config { .. })));

        let f = write_config("[detect]\nthreshold = 0.5\n");
        assert!(matches!(load_config(f.path()), Err(Error::Config { .. })));

        let f = write_config("[output]\nformat = \"json\"\n");
        assert!(matches!(load_config(f.path()), Err(Error::Config { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_config(&dir.path().join("absent.toml"));
        assert!(matches!(res, Err(Error::Io(_))));
    }
}
