//! 字符编码检测核心库
//!
//! 设计要点：
//! - 编排多个相互独立的启发式检测后端，按固定优先级依次尝试，第一个达到置信度的结果胜出。
//! - 后端实现统一的 `EncodingBackend` 契约；可用性在注册表构建时探测一次并缓存。
//! - 流式输入只读取开头 `PREVIEW_BYTES` 字节，读完恢复原位置；内存数据原样使用。
//! - 检测不出结果返回 `None`，不视为错误；只有 I/O 与配置问题才返回 `Error`。

mod options;
mod types;
mod error;
mod backend;
mod detectors;
mod preview;
mod detect;
mod config;
mod scan;

pub use options::{DetectOptions, ScanOptions, ScanStats, CONFIDENCE, PREVIEW_BYTES};
pub use types::{Detection, OutputItem};
pub use error::{Error, Result};
pub use backend::EncodingBackend;
pub use detectors::{BomBackend, ChardetngBackend, Utf8Backend};
pub use detect::{all_methods, available_methods, detect_encoding, detect_encoding_reader, Detector};
pub use config::{load_config, Config};
pub use scan::scan_and_write;
