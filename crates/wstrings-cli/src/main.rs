use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use wstrings_core::{load_config, scan_and_write, OutputFormat, ScanOptions};

/// 命令行入口（基于 clap）
/// - 兼容经典用法：`wstrings [file...]`，每个文件先输出文件名，再逐行输出字符串
#[derive(Parser, Debug)]
#[command(
    name = "wstrings",
    version,
    about = "Find printable ASCII strings (and the Latin part of UTF-16 LE/BE strings) in binary files"
)]
struct Cli {
    /// 待扫描的文件（按顺序处理）
    files: Vec<PathBuf>,

    /// 最小输出长度（默认 6）
    #[arg(short = 'n', long)]
    min_len: Option<usize>,

    /// 单条输出最大长度，超过则切分为多行（默认 4096）
    #[arg(long)]
    max_len: Option<usize>,

    /// 读取块大小（字节，默认 4096）
    #[arg(long)]
    chunk_size: Option<usize>,

    /// 在每条字符串前输出其在文件中的十进制偏移
    #[arg(short = 't', long)]
    offsets: bool,

    /// 输出格式：text 或 json
    #[arg(long, value_parser = ["text", "json"])]
    format: Option<String>,

    /// 递归扫描目录参数
    #[arg(short, long)]
    recursive: bool,

    /// 线程数（"auto"=CPU 核心数；默认 1）
    #[arg(long)]
    threads: Option<String>,

    /// 配置文件路径（TOML，`[scan]` 表）；命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();
    let opts = build_options(&cli)?;
    info!(files = cli.files.len(), ?opts, "options resolved");

    // 以缓冲方式写标准输出；诊断信息直接写标准错误
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut diag = io::stderr();
    let stats = scan_and_write(&cli.files, &mut out, &mut diag, &opts).context("scan failed")?;
    out.flush().ok();

    info!(
        files_scanned = stats.files_scanned,
        files_failed = stats.files_failed,
        strings = stats.strings_emitted,
        "done"
    );
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到标准错误，标准输出只保留扫描结果
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 合并默认值、配置文件与命令行参数（优先级依次升高）
fn build_options(cli: &Cli) -> Result<ScanOptions> {
    let mut opts = ScanOptions::default();
    if let Some(path) = &cli.config {
        load_config(path)?.apply_to(&mut opts);
    }
    if let Some(v) = cli.min_len { opts.min_len = v; }
    if let Some(v) = cli.max_len { opts.max_len = v; }
    if let Some(v) = cli.chunk_size { opts.chunk_size = v; }
    if cli.offsets { opts.offsets = true; }
    if cli.recursive { opts.recursive = true; }
    if let Some(f) = cli.format.as_deref() {
        opts.format = match f {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        };
    }
    if let Some(t) = cli.threads.as_deref() {
        opts.threads = parse_threads(t)?;
    }
    opts.validate()?;
    Ok(opts)
}

/// 解析线程参数："auto" 表示自动（等于 CPU 核数）；其他为具体数值
fn parse_threads(s: &str) -> Result<Option<usize>> {
    if s.eq_ignore_ascii_case("auto") { return Ok(None); }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => anyhow::bail!("invalid --threads value: {s}"),
    }
}
