//! 公共类型（对外暴露）
use serde::Serialize;
use std::borrow::Cow;

/// 一次输出：借用扫描器缓冲区中的片段字节
/// - `offset` 为片段首个可打印字节在整个流中的偏移（与分块方式无关）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    bytes: &'a [u8],
    offset: u64,
}

impl<'a> Run<'a> {
    pub(crate) fn new(bytes: &'a [u8], offset: u64) -> Self {
        Self { bytes, offset }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 片段只含 0x20..=0x7E，转换总是借用且无损
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

/// JSON 输出项结构（对应输出数组的单个元素）
#[derive(Debug, Clone, Serialize)]
pub struct OutputItem<'a> {
    pub file: &'a str,
    pub offset: u64,
    pub value: &'a str,
}
