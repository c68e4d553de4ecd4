//! 运行时统一错误定义
//!
//! 对应三类失败中需要显式返回错误值的两类：
//! - 构造失败（无法创建内部节点、分组标识耗尽）；
//! - 非法参数（空属性名、重名事件等）。
//!
//! “未找到”类条件不在此处建模，调用方通过 `bool`/`Option` 感知。
//!
use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// 错误类别，`code()` 为稳定的数值编码
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MleErrorKind {
    InvalidArgument,
    Construction,
    Duplicate,
    Exhausted,
}

impl MleErrorKind {
    pub fn code(&self) -> i32 {
        match self {
            MleErrorKind::InvalidArgument => 1,
            MleErrorKind::Construction => 2,
            MleErrorKind::Duplicate => 3,
            MleErrorKind::Exhausted => 4,
        }
    }
}

/// 显式错误值：消息、数值编码、发生时间与可选的底层原因
#[derive(Debug, Error)]
#[error("{}: {} - {}", .kind.code(), .when, .message)]
pub struct MleError {
    kind: MleErrorKind,
    message: String,
    when: DateTime<Utc>,
    #[source]
    source: Option<BoxError>,
}

impl MleError {
    pub fn new(kind: MleErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            when: Utc::now(),
            source: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(MleErrorKind::InvalidArgument, message)
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::new(MleErrorKind::Construction, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(MleErrorKind::Duplicate, message)
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self::new(MleErrorKind::Exhausted, message)
    }

    /// 附加底层原因
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> MleErrorKind {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn when(&self) -> DateTime<Utc> {
        self.when
    }
}

/// 统一 Result 类型别名
pub type MleResult<T> = Result<T, MleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_code_time_and_message() {
        let err = MleError::duplicate("Named event already exists.");
        let rendered = err.to_string();

        assert!(rendered.starts_with("3: "));
        assert!(rendered.ends_with(" - Named event already exists."));
        assert!(rendered.contains(&err.when().to_string()));
    }

    #[test]
    fn source_is_exposed_through_error_trait() {
        let parse = "x".parse::<i32>().unwrap_err();
        let err = MleError::construction("unable to build node").with_source(parse);

        assert_eq!(err.kind(), MleErrorKind::Construction);
        assert!(StdError::source(&err).is_some());
        assert!(StdError::source(&MleError::invalid_argument("a")).is_none());
    }
}
