//! 可打印字符串提取库
//!
//! 设计要点：
//! - 单遍扫描：逐字节分类，无回看，按块喂入，结果与分块方式无关。
//! - 可打印 ASCII（0x20..=0x7E）之间允许夹一个 NUL，从而提取 UTF-16 LE/BE 的拉丁字符部分。
//! - 片段长度达到上限时强制切分输出，内存占用始终有界。
//! - 每个输入流一个独立会话（`RunScanner`），会话之间不共享可变状态。

mod buffer;
mod config;
mod error;
mod findings;
mod options;
mod scan;
mod scanner;
mod sink;
mod source;
mod types;

pub use config::{load_config, AutoKeyword, ConfigFile, ScanSection, Threads};
pub use error::{ConfigError, ScanError};
pub use findings::Finding;
pub use options::{OutputFormat, ScanOptions, ScanStats, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LEN, DEFAULT_MIN_LEN};
pub use scan::scan_and_write;
pub use scanner::{scan_bytes, RunScanner};
pub use sink::{OutputWriter, Sink, WriteSink};
pub use source::{collect_inputs, scan_file, scan_reader};
pub use types::{OutputItem, Run};
