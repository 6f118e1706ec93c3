//! 片段扫描器（单遍、逐字节、无回看的状态机）
//!
//! 字节分类规则：
//! - 0x20..=0x7E：可打印，追加到当前片段；长度达到上限时强制输出并重新开始。
//! - 0x00：若上一个字节不是“待定的 NUL”，则容忍（不追加、不结束片段）。
//!   这样可以同时覆盖 UTF-16 LE/BE 中的拉丁字符部分。
//! - 其他字节，或连续第二个 NUL：结束当前片段。
//!
//! 状态（缓冲区、`pending_null`、流偏移）全部保存在会话对象中，
//! 因此输出结果与调用方如何切分输入块无关。
use crate::buffer::RunBuffer;
use crate::options::{DEFAULT_MAX_LEN, DEFAULT_MIN_LEN};
use crate::sink::Sink;
use crate::types::Run;

/// 单字节分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteClass {
    Printable,
    Null,
    Other,
}

#[inline]
fn classify(b: u8) -> ByteClass {
    match b {
        0x20..=0x7E => ByteClass::Printable,
        0x00 => ByteClass::Null,
        _ => ByteClass::Other,
    }
}

/// 扫描会话
/// - 一个会话对应一个逻辑输入流；多个流需要各自独立的实例
#[derive(Debug, Clone)]
pub struct RunScanner {
    buf: RunBuffer,
    min_len: usize,
    pending_null: bool,
    /// 下一个待处理字节在流中的偏移
    offset: u64,
    /// 当前片段首字节的偏移（缓冲区为空时无意义）
    run_start: u64,
}

impl Default for RunScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LEN, DEFAULT_MAX_LEN)
    }
}

impl RunScanner {
    /// 创建扫描器；`min_len` 与 `max_len` 会被钳制为至少 1
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self {
            buf: RunBuffer::with_capacity(max_len.max(1)),
            min_len: min_len.max(1),
            pending_null: false,
            offset: 0,
            run_start: 0,
        }
    }

    /// 开始新的会话：丢弃任何未输出的片段，偏移归零
    pub fn begin_session(&mut self) {
        self.buf.clear();
        self.pending_null = false;
        self.offset = 0;
        self.run_start = 0;
    }

    /// 处理一个输入块（可为空），过程中可能产生零或多次输出
    pub fn feed<S: Sink + ?Sized>(&mut self, chunk: &[u8], sink: &mut S) {
        for &b in chunk {
            match classify(b) {
                ByteClass::Printable => {
                    if self.buf.is_empty() {
                        self.run_start = self.offset;
                    }
                    self.pending_null = false;
                    if self.buf.push(b) {
                        // 达到容量上限：强制输出，后续字节开始新片段
                        self.flush(sink);
                    }
                }
                ByteClass::Null if !self.pending_null => {
                    self.pending_null = true;
                }
                ByteClass::Null | ByteClass::Other => {
                    self.flush(sink);
                }
            }
            self.offset += 1;
        }
    }

    /// 结束会话：输出尾部片段（若达到阈值）并清空状态
    pub fn end_session<S: Sink + ?Sized>(&mut self, sink: &mut S) {
        self.flush(sink);
    }

    /// 本会话已处理的字节数
    pub fn bytes_seen(&self) -> u64 {
        self.offset
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    fn flush<S: Sink + ?Sized>(&mut self, sink: &mut S) {
        if self.buf.len() >= self.min_len {
            sink.emit(Run::new(self.buf.as_bytes(), self.run_start));
        }
        self.buf.clear();
        self.pending_null = false;
    }
}

/// 便捷函数：对一段完整内存执行一次会话并收集结果
pub fn scan_bytes(data: &[u8], min_len: usize, max_len: usize) -> Vec<crate::findings::Finding> {
    let mut scanner = RunScanner::new(min_len, max_len);
    let mut out = Vec::new();
    scanner.begin_session();
    scanner.feed(data, &mut out);
    scanner.end_session(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Finding;

    fn values(found: &[Finding]) -> Vec<&str> {
        found.iter().map(|f| f.value.as_str()).collect()
    }

    fn scan_chunked(data: &[u8], chunk: usize, min_len: usize, max_len: usize) -> Vec<Finding> {
        let mut scanner = RunScanner::new(min_len, max_len);
        let mut out = Vec::new();
        scanner.begin_session();
        for part in data.chunks(chunk) {
            scanner.feed(part, &mut out);
        }
        scanner.end_session(&mut out);
        out
    }

    /// 经典 strings 测试数据：每 16 字节一块，覆盖跨块边界的各种情况
    fn boundary_fixture() -> Vec<u8> {
        let rows: [&[u8]; 16] = [
            // 常规
            b"\xa5\xa5\xa5\xa5test01\xa5\xa5\xa5\xa5\xa5\xa5",
            b"\xa5\xa5t\0e\0s\0t\0\x30\0\x32\0\xa5\xa5",
            b"\xa5\xa5\0t\0e\0s\0t\0\x30\0\x33\xa5\xa5",
            // 跨块
            b"\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5test",
            b"04\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5",
            b"\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5t\0e\0s\0t\0",
            b"0\0\x35\0\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5",
            b"\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\0t\0e\0s\0t",
            b"\0\x30\0\x36\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5",
            // 恰好在块边界结束
            b"\xa5\xa5\xa5\xa5\xa5t\0e\0s\0t\0\x30\0\x37",
            b"\0\xa5\xa5\xa5\xa5\0t\0e\0s\0t\0\x30\0",
            // 在块边界附近结束
            b"\x38\xa5\xa5\xa5\xa5\xa5t\0e\0s\0t\0\x30\0",
            b"9\xa5\xa5\xa5\xa5\0t\0e\0s\0t\0\x31\0",
            b"0\xa5\xa5\xa5\xa5\xa5t\0e\0s\0t\0\x31\0",
            b"1\0\xa5\xa5\xa5\0t\0e\0s\0t\0\x31\0",
            b"2\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5\xa5",
        ];
        rows.concat()
    }

    /// 确定性伪随机数据（xorshift），偏向可打印字节与 NUL
    fn noisy_stream(len: usize, mut seed: u64) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let r = (seed % 100) as u8;
            out.push(match r {
                0..=59 => b'a' + (seed >> 8) as u8 % 26,
                60..=79 => 0,
                _ => (seed >> 16) as u8,
            });
        }
        out
    }

    #[test]
    fn emits_exact_threshold_run() {
        assert_eq!(values(&scan_bytes(b"test01", 6, 4096)), ["test01"]);
    }

    #[test]
    fn trailing_nonprintable_does_not_change_output() {
        assert_eq!(values(&scan_bytes(b"test01\x01", 6, 4096)), ["test01"]);
    }

    #[test]
    fn short_run_is_discarded() {
        assert!(scan_bytes(b"tes01", 6, 4096).is_empty());
        assert!(scan_bytes(b"\x01abcde\x02", 6, 4096).is_empty());
    }

    #[test]
    fn empty_input_and_empty_chunks() {
        assert!(scan_bytes(b"", 6, 4096).is_empty());

        let mut scanner = RunScanner::default();
        let mut out: Vec<Finding> = Vec::new();
        scanner.begin_session();
        scanner.feed(b"", &mut out);
        scanner.feed(b"abc", &mut out);
        scanner.feed(b"", &mut out);
        scanner.feed(b"def", &mut out);
        scanner.end_session(&mut out);
        assert_eq!(values(&out), ["abcdef"]);
    }

    #[test]
    fn wide_characters_strip_single_nulls() {
        let data = b"t\0e\0s\0t\x003\x000\0";
        assert_eq!(values(&scan_bytes(data, 6, 4096)), ["test30"]);
    }

    #[test]
    fn single_null_tolerated_double_null_terminates() {
        assert_eq!(values(&scan_bytes(b"abc\0def", 6, 4096)), ["abcdef"]);
        assert!(scan_bytes(b"abc\0\0def", 6, 4096).is_empty());
        assert_eq!(values(&scan_bytes(b"abcdef\0\0ghijkl", 6, 4096)), ["abcdef", "ghijkl"]);
    }

    #[test]
    fn null_after_flush_opens_new_window() {
        // 第二个 NUL 结束片段并清除待定状态，第三个 NUL 重新被容忍
        assert_eq!(values(&scan_bytes(b"abcdef\0\0\0ghijkl", 6, 4096)), ["abcdef", "ghijkl"]);
    }

    #[test]
    fn null_tolerance_survives_chunk_boundary() {
        let mut scanner = RunScanner::default();
        let mut out: Vec<Finding> = Vec::new();
        scanner.begin_session();
        scanner.feed(b"abc\0", &mut out);
        scanner.feed(b"\0def", &mut out);
        scanner.end_session(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn run_of_max_len_is_one_emission() {
        let data = vec![b'x'; 16];
        let found = scan_bytes(&data, 6, 16);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value.len(), 16);
    }

    #[test]
    fn long_run_is_split_at_max_len() {
        // 16 + 7：第二段达到阈值
        let found = scan_bytes(&vec![b'x'; 23], 6, 16);
        assert_eq!(found.iter().map(|f| f.value.len()).collect::<Vec<_>>(), [16, 7]);
        assert_eq!(found[1].offset, 16);

        // 16 + 5：第二段低于阈值被丢弃
        let found = scan_bytes(&vec![b'x'; 21], 6, 16);
        assert_eq!(found.iter().map(|f| f.value.len()).collect::<Vec<_>>(), [16]);
    }

    #[test]
    fn end_of_stream_flushes_once() {
        let mut scanner = RunScanner::default();
        let mut out: Vec<Finding> = Vec::new();
        scanner.begin_session();
        scanner.feed(b"\x01\x02trailing", &mut out);
        scanner.end_session(&mut out);
        scanner.end_session(&mut out);
        assert_eq!(values(&out), ["trailing"]);
    }

    #[test]
    fn offsets_point_at_first_printable_byte() {
        let found = scan_bytes(b"\xff\xffhello world\x01\0a\0b\0c\0d\0e\0f", 6, 4096);
        assert_eq!(found[0], Finding { value: "hello world".into(), offset: 2 });
        assert_eq!(found[1], Finding { value: "abcdef".into(), offset: 15 });
    }

    #[test]
    fn begin_session_discards_previous_state() {
        let mut scanner = RunScanner::default();
        let mut out: Vec<Finding> = Vec::new();
        scanner.begin_session();
        scanner.feed(b"abandoned", &mut out);
        scanner.begin_session();
        scanner.feed(b"fresh!", &mut out);
        scanner.end_session(&mut out);
        assert_eq!(out, [Finding { value: "fresh!".into(), offset: 0 }]);
        assert_eq!(scanner.bytes_seen(), 6);
    }

    #[test]
    fn boundary_fixture_in_16_byte_chunks() {
        let data = boundary_fixture();
        let expected: Vec<String> = (1..=12).map(|i| format!("test{i:02}")).collect();
        assert_eq!(values(&scan_chunked(&data, 16, 6, 4096)), expected);
    }

    #[test]
    fn output_is_independent_of_chunking() {
        for data in [boundary_fixture(), noisy_stream(3000, 0x9e37_79b9_7f4a_7c15)] {
            let whole = scan_chunked(&data, data.len().max(1), 4, 32);
            assert!(!whole.is_empty());
            for chunk in 1..=64 {
                assert_eq!(scan_chunked(&data, chunk, 4, 32), whole, "chunk size {chunk}");
            }
        }
    }

    #[test]
    fn closure_sink_receives_borrowed_runs() {
        let mut lens = Vec::new();
        let mut scanner = RunScanner::new(3, 8);
        scanner.begin_session();
        scanner.feed(b"abc\x01abcdefghij", &mut |run: Run<'_>| lens.push(run.len()));
        scanner.end_session(&mut |run: Run<'_>| lens.push(run.len()));
        assert_eq!(lens, [3, 8]);
    }
}
