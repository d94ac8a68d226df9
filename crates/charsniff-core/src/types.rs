//! 公共类型（对外暴露）
use serde::Serialize;

/// 一次成功检测：编码名 + 给出该结果的后端名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub encoding: String,
    pub method: String,
}

/// 输出项结构（扫描结果 JSON 数组的单个元素）
/// 未能确定编码时 `encoding`/`method` 为 null
#[derive(Debug, Clone, Serialize)]
pub struct OutputItem<'a> {
    pub path: &'a str,
    pub encoding: Option<&'a str>,
    pub method: Option<&'a str>,
}

impl<'a> OutputItem<'a> {
    pub fn new(path: &'a str, detection: Option<&'a Detection>) -> Self {
        Self {
            path,
            encoding: detection.map(|d| d.encoding.as_str()),
            method: detection.map(|d| d.method.as_str()),
        }
    }
}
