//! 多文件扫描主流程与并行调度
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ScanError;
use crate::findings::Finding;
use crate::options::{ScanOptions, ScanStats};
use crate::sink::{OutputWriter, WriteSink};
use crate::source::{collect_inputs, scan_file};

/// 扫描 `inputs` 中的每个文件并把结果流式写入 `out`
/// - 文本格式：每个文件先输出文件名一行，其后每条字符串一行
/// - JSON 格式：整体为一个数组
/// - 打开/读取失败写入 `diag` 后继续下一个文件；只有写 `out` 失败才返回错误
/// 稳定性保证：无论串行还是并行，输出顺序都与输入参数顺序一致
pub fn scan_and_write(inputs: &[PathBuf], out: &mut dyn Write, diag: &mut dyn Write, opts: &ScanOptions) -> Result<ScanStats> {
    opts.validate()?;
    let files = collect_inputs(inputs, opts.recursive);
    let threads = opts.effective_threads();
    info!(files = files.len(), threads, "starting scan");

    let mut stats = ScanStats::default();
    let mut writer = OutputWriter::new(out, opts.format, opts.offsets);
    writer.begin().context("write output")?;

    // 单个文件没有并行的必要
    if threads > 1 && files.len() > 1 {
        scan_parallel(&files, &mut writer, diag, opts, &mut stats, threads)?;
    } else {
        scan_serial(&files, &mut writer, diag, opts, &mut stats)?;
    }

    stats.strings_emitted = writer.written();
    writer.end().context("write output")?;
    info!(
        files_scanned = stats.files_scanned,
        files_failed = stats.files_failed,
        strings = stats.strings_emitted,
        bytes = stats.bytes_read,
        "scan finished"
    );
    Ok(stats)
}

/// 串行路径：边读边写，不在内存中保留结果
fn scan_serial(
    files: &[PathBuf],
    writer: &mut OutputWriter<'_>,
    diag: &mut dyn Write,
    opts: &ScanOptions,
    stats: &mut ScanStats,
) -> Result<()> {
    for path in files {
        let name = path.display().to_string();
        writer.file_header(&name).context("write output")?;
        let mut sink = WriteSink::new(writer, &name);
        let res = scan_file(path, opts, &mut sink);
        sink.finish().context("write output")?;
        match res {
            Ok(n) => {
                stats.files_scanned += 1;
                stats.bytes_read += n;
            }
            Err(e) => report_error(writer, diag, &e, stats)?,
        }
    }
    Ok(())
}

/// 单个文件的扫描结果（worker → writer）
type FileReport = Result<(Vec<Finding>, u64), ScanError>;

/// 并行调度：
/// - 使用 Rayon 线程池按文件并行扫描，每个 worker 拥有独立的扫描会话
/// - 单线程 Writer 按 idx 重排并流式写出，保证与串行路径输出一致
fn scan_parallel(
    files: &[PathBuf],
    writer: &mut OutputWriter<'_>,
    diag: &mut dyn Write,
    opts: &ScanOptions,
    stats: &mut ScanStats,
    threads: usize,
) -> Result<()> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;
    use std::collections::BTreeMap;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("build rayon pool")?;

    // 通道用于 worker → writer 传递结果
    let (tx, rx) = channel::bounded::<(usize, FileReport)>(256);

    // Writer 保持在当前线程，扫描在后台线程的线程池内执行
    let files_vec: Vec<(usize, PathBuf)> = files.iter().cloned().enumerate().collect();
    let worker_opts = opts.clone();
    let scan_thread = std::thread::spawn(move || {
        pool.install(|| {
            files_vec.par_iter().for_each(|(idx, path)| {
                let mut found: Vec<Finding> = Vec::new();
                let report = scan_file(path, &worker_opts, &mut found).map(|n| (found, n));
                let _ = tx.send((*idx, report));
            });
        });
        // 结束后 Sender 被丢弃，Receiver 将收到关闭信号
    });

    let mut next_idx: usize = 0;
    let mut pending: BTreeMap<usize, FileReport> = BTreeMap::new();
    let mut result = Ok(());

    while let Ok((idx, report)) = rx.recv() {
        pending.insert(idx, report);
        while let Some(report) = pending.remove(&next_idx) {
            if let Err(e) = write_report(&files[next_idx], report, writer, diag, stats) {
                result = Err(e);
                break;
            }
            next_idx += 1;
        }
        if result.is_err() {
            break;
        }
    }
    // 提前退出时丢弃 Receiver，worker 的 send 失败后各自结束
    drop(rx);
    let _ = scan_thread.join();
    result?;

    debug!(files = next_idx, "parallel writer drained");
    Ok(())
}

/// 按串行路径的格式写出一个文件的结果
fn write_report(
    path: &Path,
    report: FileReport,
    writer: &mut OutputWriter<'_>,
    diag: &mut dyn Write,
    stats: &mut ScanStats,
) -> Result<()> {
    let name = path.display().to_string();
    writer.file_header(&name).context("write output")?;
    match report {
        Ok((found, n)) => {
            for f in &found {
                writer.write_item(&name, &f.value, f.offset).context("write output")?;
            }
            stats.files_scanned += 1;
            stats.bytes_read += n;
            Ok(())
        }
        Err(e) => report_error(writer, diag, &e, stats),
    }
}

/// 报告单个文件的错误（非致命）
/// - 先冲刷标准输出，避免诊断信息与结果交错错位
fn report_error(writer: &mut OutputWriter<'_>, diag: &mut dyn Write, e: &ScanError, stats: &mut ScanStats) -> Result<()> {
    writer.flush().context("write output")?;
    debug!(path = %e.path().display(), error = %e, "file skipped");
    writeln!(diag, "{e}").ok();
    stats.files_failed += 1;
    Ok(())
}
