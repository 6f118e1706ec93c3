//! 输出端（sink）：扫描器通过它报告每一次输出
use std::io::{self, Write};

use crate::findings::Finding;
use crate::options::OutputFormat;
use crate::types::{OutputItem, Run};

/// 接收扫描器输出的对象
/// - 扫描器本身不会失败；下游写入失败由 sink 自行记录并上报
pub trait Sink {
    fn emit(&mut self, run: Run<'_>);
}

impl<F> Sink for F
where
    F: FnMut(Run<'_>),
{
    fn emit(&mut self, run: Run<'_>) {
        self(run)
    }
}

/// 收集为拥有型记录（测试与并行路径使用）
impl Sink for Vec<Finding> {
    fn emit(&mut self, run: Run<'_>) {
        self.push(Finding::from(run));
    }
}

/// 结果渲染器：负责文本/JSON 两种格式的流式写出
/// - JSON 模式跨文件维护数组的逗号状态，由 `begin`/`end` 写入括号
pub struct OutputWriter<'w> {
    out: &'w mut dyn Write,
    format: OutputFormat,
    offsets: bool,
    first: bool,
    written: usize,
}

impl<'w> OutputWriter<'w> {
    pub fn new(out: &'w mut dyn Write, format: OutputFormat, offsets: bool) -> Self {
        Self { out, format, offsets, first: true, written: 0 }
    }

    pub fn begin(&mut self) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write!(self.out, "["),
            OutputFormat::Text => Ok(()),
        }
    }

    /// 文件名标题行（仅文本格式）
    pub fn file_header(&mut self, file: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{file}"),
            OutputFormat::Json => Ok(()),
        }
    }

    pub fn write_item(&mut self, file: &str, value: &str, offset: u64) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                if self.offsets {
                    writeln!(self.out, "{offset} {value}")?;
                } else {
                    writeln!(self.out, "{value}")?;
                }
            }
            OutputFormat::Json => {
                if !self.first { write!(self.out, ",")?; } else { self.first = false; }
                let item = OutputItem { file, offset, value };
                serde_json::to_writer(&mut *self.out, &item)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    pub fn end(&mut self) -> io::Result<()> {
        if let OutputFormat::Json = self.format {
            writeln!(self.out, "]")?;
        }
        self.out.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// 已写出的字符串条数
    pub fn written(&self) -> usize {
        self.written
    }
}

/// 将单个文件的输出直接流式写入 `OutputWriter`
/// - 首次写入失败后不再写出，错误在 `finish` 时返回
pub struct WriteSink<'a, 'w> {
    writer: &'a mut OutputWriter<'w>,
    file: &'a str,
    error: Option<io::Error>,
}

impl<'a, 'w> WriteSink<'a, 'w> {
    pub fn new(writer: &'a mut OutputWriter<'w>, file: &'a str) -> Self {
        Self { writer, file, error: None }
    }

    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Sink for WriteSink<'_, '_> {
    fn emit(&mut self, run: Run<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.writer.write_item(self.file, &run.text(), run.offset()) {
            self.error = Some(e);
        }
    }
}
