//! 错误类型（仅覆盖 I/O 与配置层；扫描算法本身没有错误状态）
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 单个输入文件的读取错误
/// - 两类错误均不致命：上层报告到诊断流后继续处理下一个文件
/// - Display 文本与经典 `strings` 的诊断格式保持一致
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub fn path(&self) -> &Path {
        match self {
            ScanError::Open { path, .. } | ScanError::Read { path, .. } => path,
        }
    }
}

/// 选项/配置文件错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
