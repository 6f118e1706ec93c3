//! 配置文件加载（TOML）
use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::options::{OutputFormat, ScanOptions};

/// `[scan]` 表；所有字段可选，缺省时保留已有取值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    #[serde(default)]
    pub min_len: Option<usize>,
    #[serde(default)]
    pub max_len: Option<usize>,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    /// "auto" 或正整数
    #[serde(default)]
    pub threads: Option<Threads>,
    #[serde(default)]
    pub offsets: Option<bool>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub recursive: Option<bool>,
}

/// 线程配置：字符串 "auto" 或具体数值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Threads {
    Count(usize),
    Named(AutoKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoKeyword {
    Auto,
}

impl Threads {
    pub fn as_option(self) -> Option<usize> {
        match self {
            Threads::Count(n) => Some(n),
            Threads::Named(AutoKeyword::Auto) => None,
        }
    }
}

/// 顶层配置文件结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub scan: ScanSection,
}

impl ConfigFile {
    pub fn parse(txt: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(txt).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// 将文件中出现的字段覆盖到 `opts`
    pub fn apply_to(&self, opts: &mut ScanOptions) {
        let s = &self.scan;
        if let Some(v) = s.min_len { opts.min_len = v; }
        if let Some(v) = s.max_len { opts.max_len = v; }
        if let Some(v) = s.chunk_size { opts.chunk_size = v; }
        if let Some(v) = s.threads { opts.threads = v.as_option(); }
        if let Some(v) = s.offsets { opts.offsets = v; }
        if let Some(v) = s.format { opts.format = v; }
        if let Some(v) = s.recursive { opts.recursive = v; }
    }
}

/// 从 TOML 文件加载配置
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let txt = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    ConfigFile::parse(&txt, path)
}
