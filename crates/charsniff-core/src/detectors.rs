//! 内置检测后端（BOM / UTF-8 校验 / chardetng 统计猜测）
//!
//! 每个后端都会被声明，是否可用取决于对应的 cargo feature 是否编译进来。
//! 未启用 feature 的后端 `is_available()` 返回 false，编排器不会调用它。
use crate::backend::{EncodingBackend, Guess};
use crate::options::DetectOptions;
#[cfg(feature = "utf8")]
use crate::options::PREVIEW_BYTES;

/// BOM 判定：带 BOM 即视为确定结果
pub const BOM: &str = "bom";
/// UTF-8 合法性校验
pub const UTF8: &str = "utf8";
/// chardetng 统计猜测
pub const CHARDETNG: &str = "chardetng";

/// 基于 `encoding_rs::Encoding::for_bom` 的 BOM 检测器（始终可用）
#[derive(Debug, Default, Clone, Copy)]
pub struct BomBackend;

impl EncodingBackend for BomBackend {
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        BOM
    }

    fn detect(&self, data: &[u8], options: &DetectOptions) -> Option<String> {
        let (encoding, _bom_len) = encoding_rs::Encoding::for_bom(data)?;
        Guess::new(encoding.name(), 1.0).accept(options)
    }
}

/// 基于 `simdutf8` 的 UTF-8 校验器
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Backend;

/// 多字节序列计数上限（超过后置信度不再提升）
#[cfg(feature = "utf8")]
const UTF8_MULTIBYTE_CAP: i32 = 6;

/// 校验 UTF-8 并按多字节序列数量给出置信度
/// - 纯 ASCII：1.0（任何 ASCII 兼容编码都能正确解码）
/// - 含 n 个多字节字符：1 - 0.99 * 0.5^n（n 封顶 6）
/// - 只有满窗口（可能被预读截断）时，末尾不完整的多字节字符才不算错误；
///   更短的数据是完整内容，结尾残缺即为非法
#[cfg(feature = "utf8")]
fn utf8_guess(data: &[u8]) -> Option<Guess> {
    if data.is_empty() {
        return None;
    }
    let valid = match simdutf8::compat::from_utf8(data) {
        Ok(_) => data,
        // error_len 为 None 表示结尾处序列不完整
        Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 && data.len() >= PREVIEW_BYTES => {
            &data[..e.valid_up_to()]
        }
        Err(_) => return None,
    };
    let multibyte = valid.iter().filter(|&&b| b >= 0xC0).count();
    if multibyte == 0 {
        return Some(Guess::new(encoding_rs::UTF_8.name(), 1.0));
    }
    let n = (multibyte as i32).min(UTF8_MULTIBYTE_CAP);
    Some(Guess::new(encoding_rs::UTF_8.name(), 1.0 - 0.99 * 0.5f32.powi(n)))
}

impl EncodingBackend for Utf8Backend {
    fn is_available(&self) -> bool {
        cfg!(feature = "utf8")
    }

    fn name(&self) -> &str {
        UTF8
    }

    #[cfg(feature = "utf8")]
    fn detect(&self, data: &[u8], options: &DetectOptions) -> Option<String> {
        utf8_guess(data)?.accept(options)
    }

    #[cfg(not(feature = "utf8"))]
    fn detect(&self, _data: &[u8], _options: &DetectOptions) -> Option<String> {
        None
    }
}

/// chardetng 高置信度评估时给出的置信度
#[cfg(feature = "chardetng")]
const CHARDETNG_HIGH: f32 = 0.9;
/// chardetng 低置信度评估时给出的置信度
#[cfg(feature = "chardetng")]
const CHARDETNG_LOW: f32 = 0.5;

/// 基于 `chardetng` 的统计检测器（面向传统单/多字节编码）
#[derive(Debug, Default, Clone, Copy)]
pub struct ChardetngBackend;

impl EncodingBackend for ChardetngBackend {
    fn is_available(&self) -> bool {
        cfg!(feature = "chardetng")
    }

    fn name(&self) -> &str {
        CHARDETNG
    }

    #[cfg(feature = "chardetng")]
    fn detect(&self, data: &[u8], options: &DetectOptions) -> Option<String> {
        if data.is_empty() {
            return None;
        }
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(data, true);
        // 不提供 TLD 提示，允许猜测为 UTF-8
        let (encoding, high) = detector.guess_assess(None, true);
        let confidence = if high { CHARDETNG_HIGH } else { CHARDETNG_LOW };
        Guess::new(encoding.name(), confidence).accept(options)
    }

    #[cfg(not(feature = "chardetng"))]
    fn detect(&self, _data: &[u8], _options: &DetectOptions) -> Option<String> {
        None
    }
}

/// 内置后端，按优先级排列：确定性判断在前，统计猜测在后
pub(crate) fn builtin_backends() -> Vec<Box<dyn EncodingBackend>> {
    vec![Box::new(BomBackend), Box::new(Utf8Backend), Box::new(ChardetngBackend)]
}
