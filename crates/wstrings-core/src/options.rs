//! 扫描选项与统计信息（模块）
use serde::Deserialize;

use crate::error::ConfigError;

/// 最小输出长度（可打印字节数）
pub const DEFAULT_MIN_LEN: usize = 6;
/// 单条输出的最大长度；超过即强制切分输出
pub const DEFAULT_MAX_LEN: usize = 4096;
/// 单次 read 的块大小（与 DEFAULT_MAX_LEN 无关）
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// 输出格式
/// - Text：每个文件先输出文件名一行，其后每条字符串一行
/// - Json：整体输出为 JSON 数组，元素为 `{file, offset, value}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 最小输出长度；短于该值的片段直接丢弃
    pub min_len: usize,
    /// 累积缓冲区容量；达到即强制输出并重新开始
    pub max_len: usize,
    /// 读取块大小（不影响输出结果）
    pub chunk_size: usize,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
    /// 文本格式下是否在每条字符串前输出十进制偏移
    pub offsets: bool,
    /// 输出格式
    pub format: OutputFormat,
    /// 是否递归展开目录参数
    pub recursive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: Some(1),
            offsets: false,
            format: OutputFormat::Text,
            recursive: false,
        }
    }
}

impl ScanOptions {
    /// 校验选项组合是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_len == 0 {
            return Err(invalid("min_len", "must be at least 1"));
        }
        if self.max_len == 0 {
            return Err(invalid("max_len", "must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size", "must be at least 1"));
        }
        // min_len > max_len 时任何片段都不可能达到阈值
        if self.min_len > self.max_len {
            return Err(invalid(
                "min_len",
                format!("{} exceeds max_len {}", self.min_len, self.max_len),
            ));
        }
        if self.threads == Some(0) {
            return Err(invalid("threads", "must be at least 1"));
        }
        Ok(())
    }

    /// 实际使用的线程数
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidOption { name, reason: reason.into() }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_failed: usize,
    pub strings_emitted: usize,
    pub bytes_read: u64,
}
