//! 预读窗口：从流中读取至多 `PREVIEW_BYTES` 字节，读完后恢复原位置
use std::io::{Read, Seek, SeekFrom};

use crate::error::Result;
use crate::options::PREVIEW_BYTES;

/// 读取预读窗口（位置保持）
/// - 记录当前位置 → 读至多 `PREVIEW_BYTES` 字节 → seek 回记录的位置
/// - 读取失败时同样尝试恢复位置，再把读错误返回给调用方
/// - 流必须可 seek，不可 seek 的流属于调用方违反前置条件
pub(crate) fn read_preview<R: Read + Seek>(reader: &mut R) -> Result<Vec<u8>> {
    let position = reader.stream_position()?;
    let read = read_at_most(reader, PREVIEW_BYTES);
    let restored = reader.seek(SeekFrom::Start(position));
    let buf = read?;
    restored?;
    tracing::trace!(position, bytes = buf.len(), "preview read");
    Ok(buf)
}

/// 读到 `limit` 字节或 EOF 为止（`Read::read` 可能返回短读）
fn read_at_most<R: Read>(reader: &mut R, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(limit.min(8 * 1024));
    reader.by_ref().take(limit as u64).read_to_end(&mut buf)?;
    Ok(buf)
}
