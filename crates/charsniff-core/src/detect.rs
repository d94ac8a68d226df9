//! 检测编排：按固定优先级依次尝试可用后端，第一个给出结果的后端胜出
//!
//! - 后端列表在构建时固定，顺序即优先级，运行期不重排
//! - 可用子集在构建时探测一次并缓存，之后只读
//! - 指定 `method` 时只尝试同名的可用后端；找不到则直接返回 `None`
use std::io::{Read, Seek};
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::backend::EncodingBackend;
use crate::detectors::builtin_backends;
use crate::error::Result;
use crate::options::DetectOptions;
use crate::preview::read_preview;
use crate::types::Detection;

/// 编码检测器（后端注册表 + 调度策略）
pub struct Detector {
    /// 全部后端（声明顺序 = 优先级）
    all: Vec<Box<dyn EncodingBackend>>,
    /// 可用后端在 `all` 中的下标（保持声明顺序）
    available: Vec<usize>,
}

impl Detector {
    /// 使用内置后端（bom → utf8 → chardetng）构建
    pub fn new() -> Self {
        Self::with_backends(builtin_backends())
    }

    /// 使用自定义后端列表构建；列表顺序即优先级
    /// 名称重复的后端只保留第一个
    pub fn with_backends(backends: Vec<Box<dyn EncodingBackend>>) -> Self {
        let mut all: Vec<Box<dyn EncodingBackend>> = Vec::with_capacity(backends.len());
        for b in backends {
            if all.iter().any(|seen| seen.name() == b.name()) {
                warn!(method = b.name(), "duplicate backend name, ignored");
                continue;
            }
            all.push(b);
        }
        // 可用性只探测一次
        let available = all
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_available())
            .map(|(i, _)| i)
            .collect();
        Self { all, available }
    }

    /// 进程级默认检测器（首次使用时初始化，线程安全）
    pub fn global() -> &'static Detector {
        static GLOBAL: OnceLock<Detector> = OnceLock::new();
        GLOBAL.get_or_init(Detector::new)
    }

    /// 所有已声明后端的名称（不论是否可用），按声明顺序
    pub fn all_methods(&self) -> Vec<&str> {
        self.all.iter().map(|b| b.name()).collect()
    }

    /// 可用后端的名称，按优先级顺序
    pub fn available_methods(&self) -> Vec<&str> {
        self.available_backends().map(|b| b.name()).collect()
    }

    /// 检测内存中的字节序列（直接使用，不截断）
    pub fn detect(&self, data: &[u8], options: &DetectOptions) -> Option<String> {
        self.detect_with_method(data, options).map(|d| d.encoding)
    }

    /// 同 `detect`，额外返回给出结果的后端名称
    pub fn detect_with_method(&self, data: &[u8], options: &DetectOptions) -> Option<Detection> {
        for backend in self.trial_list(options) {
            let name = backend.name();
            match backend.detect(data, options) {
                Some(encoding) => {
                    debug!(method = name, %encoding, "encoding detected");
                    return Some(Detection { encoding, method: name.to_string() });
                }
                None => debug!(method = name, "backend declined"),
            }
        }
        debug!(bytes = data.len(), confidence = options.confidence, "encoding undetermined");
        None
    }

    /// 检测可 seek 的流：只读预读窗口，返回前恢复流位置
    /// 仅 I/O 失败返回 Err；检测不出结果是 `Ok(None)`
    pub fn detect_reader<R: Read + Seek>(&self, reader: &mut R, options: &DetectOptions) -> Result<Option<String>> {
        Ok(self.detect_reader_with_method(reader, options)?.map(|d| d.encoding))
    }

    /// 同 `detect_reader`，额外返回给出结果的后端名称
    pub fn detect_reader_with_method<R: Read + Seek>(
        &self,
        reader: &mut R,
        options: &DetectOptions,
    ) -> Result<Option<Detection>> {
        let preview = read_preview(reader)?;
        Ok(self.detect_with_method(&preview, options))
    }

    fn available_backends(&self) -> impl Iterator<Item = &dyn EncodingBackend> + '_ {
        self.available.iter().map(move |&i| self.all[i].as_ref())
    }

    /// 本次调用的尝试列表：指定 method 时至多一个后端，否则为全部可用后端
    fn trial_list<'a>(&'a self, options: &'a DetectOptions) -> impl Iterator<Item = &'a dyn EncodingBackend> + 'a {
        let method = options.method.as_deref();
        if let Some(m) = method {
            if !self.available_backends().any(|b| b.name() == m) {
                debug!(method = m, "requested method is not available");
            }
        }
        self.available_backends()
            .filter(move |b| method.map_or(true, |m| b.name() == m))
            .take(if method.is_some() { 1 } else { usize::MAX })
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("all", &self.all_methods())
            .field("available", &self.available_methods())
            .finish()
    }
}

/// 使用默认检测器检测内存数据
pub fn detect_encoding(data: &[u8], options: &DetectOptions) -> Option<String> {
    Detector::global().detect(data, options)
}

/// 使用默认检测器检测可 seek 的流（流位置保持不变）
pub fn detect_encoding_reader<R: Read + Seek>(reader: &mut R, options: &DetectOptions) -> Result<Option<String>> {
    Detector::global().detect_reader(reader, options)
}

/// 默认检测器中可用的方法名
pub fn available_methods() -> Vec<&'static str> {
    Detector::global().available_methods()
}

/// 默认检测器中声明的全部方法名（即使依赖未编译进来）
pub fn all_methods() -> Vec<&'static str> {
    Detector::global().all_methods()
}
