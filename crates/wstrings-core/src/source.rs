//! 输入源：按块读取文件/流并驱动扫描会话
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::options::ScanOptions;
use crate::scanner::RunScanner;
use crate::sink::Sink;

/// 以固定块大小读取 `reader`，完成一次完整的扫描会话
/// - 返回读取的总字节数
/// - 读取失败时仍会结束会话（输出已累积的尾部片段），再把错误返回给调用方
pub fn scan_reader<R, S>(reader: &mut R, chunk_size: usize, scanner: &mut RunScanner, sink: &mut S) -> io::Result<u64>
where
    R: Read + ?Sized,
    S: Sink + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    scanner.begin_session();
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                scanner.end_session(sink);
                return Err(e);
            }
        };
        scanner.feed(&buf[..n], sink);
    }
    scanner.end_session(sink);
    Ok(scanner.bytes_seen())
}

/// 扫描单个文件（一个文件 = 一个会话）
pub fn scan_file<S: Sink + ?Sized>(path: &Path, opts: &ScanOptions, sink: &mut S) -> Result<u64, ScanError> {
    let mut file = File::open(path).map_err(|source| ScanError::Open { path: path.to_path_buf(), source })?;
    let mut scanner = RunScanner::new(opts.min_len, opts.max_len);
    let n = scan_reader(&mut file, opts.chunk_size, &mut scanner, sink)
        .map_err(|source| ScanError::Read { path: path.to_path_buf(), source })?;
    debug!(path = %path.display(), bytes = n, "file scanned");
    Ok(n)
}

/// 展开输入参数
/// - 非递归：原样保留（目录会在读取时报错，与经典行为一致）
/// - 递归：目录按文件名排序遍历，只收集普通文件；遍历错误记录日志后跳过
pub fn collect_inputs(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    if !recursive {
        return paths.to_vec();
    }
    let mut files = Vec::new();
    for p in paths {
        if !p.is_dir() {
            files.push(p.clone());
            continue;
        }
        for entry in WalkDir::new(p).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(root = %p.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    files
}
