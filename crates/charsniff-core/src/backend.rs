//! 后端能力契约
use crate::options::DetectOptions;

/// 编码检测后端需要实现的最小接口
///
/// - `is_available`：底层依赖是否可用；无副作用、幂等。不可用的后端不会被调用。
/// - `name`：稳定且在后端集合内唯一的名称，供 `method` 选项与方法列表使用。
/// - `detect`：置信度 >= `options.confidence` 时返回编码名，否则返回 `None`。
///   空输入、畸形输入或内部失败一律返回 `None`，不得 panic 或向上传播。
pub trait EncodingBackend: Send + Sync {
    fn is_available(&self) -> bool;

    fn name(&self) -> &str;

    fn detect(&self, data: &[u8], options: &DetectOptions) -> Option<String>;
}

/// 后端内部的一次猜测结果（编码名 + 置信度）
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Guess {
    pub(crate) encoding: &'static str,
    pub(crate) confidence: f32,
}

impl Guess {
    pub(crate) fn new(encoding: &'static str, confidence: f32) -> Self {
        Self { encoding, confidence }
    }

    /// 按阈值过滤：达到阈值才采纳
    pub(crate) fn accept(self, options: &DetectOptions) -> Option<String> {
        if self.confidence >= options.confidence {
            Some(self.encoding.to_string())
        } else {
            None
        }
    }
}
