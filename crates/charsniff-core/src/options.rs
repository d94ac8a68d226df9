//! 检测选项、扫描选项与统计信息（模块）
use serde::Deserialize;

/// 默认置信度阈值：后端给出的置信度需 >= 该值才会被采纳
pub const CONFIDENCE: f32 = 0.6;
/// 预读窗口大小（字节）：流式输入只读取开头这么多字节用于检测
pub const PREVIEW_BYTES: usize = 8 * 4096;

/// 单次检测的选项
///
/// 调用方只需给出关心的字段，其余走默认值：
/// `DetectOptions { method: Some("utf8".into()), ..Default::default() }`。
/// 从 TOML 反序列化时缺省字段同样回落到默认值，未知字段报错。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectOptions {
    /// 最低可接受置信度（0~1，不做裁剪，越界值原样传给后端）
    pub confidence: f32,
    /// 仅尝试指定名称的后端（需与 `name()` 完全一致，大小写敏感）
    pub method: Option<String>,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self { confidence: CONFIDENCE, method: None }
    }
}

impl DetectOptions {
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// 批量扫描选项
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanOptions {
    /// 最大文件大小（字节）；超过则跳过
    pub max_file_size: Option<u64>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
    /// 是否递归进入子目录（默认只扫一层）
    pub recursive: bool,
    /// 传给检测器的选项
    #[serde(skip)]
    pub detect: DetectOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_file_size: None,
            threads: None,
            recursive: false,
            detect: DetectOptions::default(),
        }
    }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_detected: usize,
    pub files_skipped: usize,
}
