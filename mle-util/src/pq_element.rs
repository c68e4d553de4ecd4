use crate::element::Element;
use serde::Serialize;
use std::fmt;

/// 可用的最高优先级
pub const MAX_PRIORITY: i32 = 32767;
/// 可用的最低优先级
pub const MIN_PRIORITY: i32 = -32768;

/// 优先队列元素：排序键 + 关联数据
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PQElement<T> {
    pub key: i32,
    pub data: T,
}

impl<T> PQElement<T> {
    pub fn new(key: i32, data: T) -> Self {
        Self { key, data }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> Element for PQElement<T> {
    fn is_greater_than(&self, other: &Self) -> bool {
        self.key > other.key
    }
}

impl<T> fmt::Display for PQElement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}
