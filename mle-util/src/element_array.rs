//! 可增长、按下标寻址的元素数组
//!
//! - 自身不保证任何顺序，堆序由 `HeapArray` 维护；
//! - 容量按逻辑值记录，满载时以 `INC_QSIZE` 为步长扩容。
//!
use crate::element::Element;
use std::fmt;
use std::slice;

/// 默认初始容量与扩容步长
pub const INC_QSIZE: usize = 64;

#[derive(Clone, Debug)]
pub struct ElementArray<E> {
    elements: Vec<E>,
    capacity: usize,
}

impl<E> Default for ElementArray<E> {
    fn default() -> Self {
        Self::with_capacity(INC_QSIZE)
    }
}

impl<E> From<Vec<E>> for ElementArray<E> {
    fn from(elements: Vec<E>) -> Self {
        let capacity = elements.len().max(INC_QSIZE);
        let mut array = Self { elements, capacity };
        array.elements.reserve_exact(capacity - array.elements.len());
        array
    }
}

impl<E> ElementArray<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// 追加元素，满载时自动扩容
    pub fn add_element(&mut self, element: E) {
        self.ensure_room();
        self.elements.push(element);
    }

    /// 在 `index` 处插入元素，其后元素整体后移
    pub fn insert(&mut self, index: usize, element: E) {
        self.ensure_room();
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
    }

    pub fn element_at(&self, index: usize) -> Option<&E> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 移除最后一个元素
    pub fn pop_last(&mut self) -> Option<E> {
        self.elements.pop()
    }

    /// 移除 `index` 处的元素，其后元素整体前移
    pub fn remove(&mut self, index: usize) -> Option<E> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    /// 交换两个位置的元素；任一下标越界时不做任何事并返回 `false`
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        let len = self.elements.len();
        if a >= len || b >= len {
            return false;
        }
        self.elements.swap(a, b);
        true
    }

    /// 额外扩充 `additional` 个槽位，已有元素保持不变
    pub fn grow(&mut self, additional: usize) {
        self.capacity += additional;
        let spare = self.capacity - self.elements.len();
        self.elements.reserve_exact(spare);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, E> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.elements
    }

    pub fn into_vec(self) -> Vec<E> {
        self.elements
    }

    fn ensure_room(&mut self) {
        if self.elements.len() >= self.capacity {
            self.grow(INC_QSIZE);
        }
    }
}

impl<E: Element> ElementArray<E> {
    /// `a` 处元素是否严格大于 `b` 处元素；越界视为 `false`
    pub fn is_greater_than(&self, a: usize, b: usize) -> bool {
        match (self.elements.get(a), self.elements.get(b)) {
            (Some(x), Some(y)) => x.is_greater_than(y),
            _ => false,
        }
    }
}

impl<E: fmt::Display> fmt::Display for ElementArray<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for element in &self.elements {
            write!(f, " {element}")?;
        }
        f.write_str(" )")
    }
}
