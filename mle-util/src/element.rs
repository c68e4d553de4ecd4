use std::fmt;

/// 可参与堆排序的元素：提供严格“大于”比较与字符串呈现
pub trait Element: fmt::Display {
    fn is_greater_than(&self, other: &Self) -> bool;
}

impl Element for i32 {
    fn is_greater_than(&self, other: &Self) -> bool {
        self > other
    }
}

impl Element for i64 {
    fn is_greater_than(&self, other: &Self) -> bool {
        self > other
    }
}
