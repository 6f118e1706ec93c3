//! 定长累积缓冲区
//!
//! 容量在创建时固定，长度显式维护；`push` 在写入前检查边界，
//! 因此缓冲区永远不会超过配置的最大长度。

/// 当前候选片段的字节缓冲
#[derive(Debug, Clone)]
pub(crate) struct RunBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl RunBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self { bytes: Vec::with_capacity(capacity), capacity }
    }

    /// 追加一个字节；返回追加后缓冲区是否已满
    /// - 已满时调用属于逻辑错误：字节被丢弃并返回 true
    pub(crate) fn push(&mut self, b: u8) -> bool {
        if self.bytes.len() < self.capacity {
            self.bytes.push(b);
        }
        self.is_full()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.bytes.len() >= self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 逻辑清空（保留已分配的内存）
    pub(crate) fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_reports_full_at_capacity() {
        let mut buf = RunBuffer::with_capacity(3);
        assert!(!buf.push(b'a'));
        assert!(!buf.push(b'b'));
        assert!(buf.push(b'c'));
        assert_eq!(buf.as_bytes(), b"abc");
    }

    #[test]
    fn push_past_capacity_is_bounded() {
        let mut buf = RunBuffer::with_capacity(2);
        buf.push(b'a');
        buf.push(b'b');
        assert!(buf.push(b'c'));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_bytes(), b"ab");
    }

    #[test]
    fn clear_resets_length() {
        let mut buf = RunBuffer::with_capacity(4);
        buf.push(b'x');
        buf.clear();
        assert!(buf.is_empty());
        assert!(!buf.is_full());
    }
}
