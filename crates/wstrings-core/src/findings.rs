//! 命中项（拥有所有权的输出记录）
use crate::types::Run;

/// 单次输出的拥有型表示，供收集与跨线程传递使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub value: String,
    pub offset: u64,
}

impl From<Run<'_>> for Finding {
    fn from(run: Run<'_>) -> Self {
        Self { value: run.text().into_owned(), offset: run.offset() }
    }
}
