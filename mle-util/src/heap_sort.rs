//! 堆排序数组
//!
//! 元素先无序追加，`heapsort` 时整体建堆，再不断把堆顶移入结果区；
//! 结果区从数组尾部向前填充，因此排序完成后数组为升序。
//!
use crate::element::Element;
use crate::heap_array::HeapArray;
use std::fmt;

#[derive(Clone, Debug)]
pub struct HeapSortArray<E> {
    heap: HeapArray<E>,
}

impl<E> Default for HeapSortArray<E> {
    fn default() -> Self {
        Self {
            heap: HeapArray::new(),
        }
    }
}

impl<E> HeapSortArray<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: HeapArray::with_capacity(capacity),
        }
    }

    pub fn add_element(&mut self, element: E) {
        self.heap.add_element(element);
    }

    pub fn element_at(&self, k: usize) -> Option<&E> {
        self.heap.element_at(k)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn grow(&mut self, additional: usize) {
        self.heap.grow(additional);
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn as_slice(&self) -> &[E] {
        self.heap.as_slice()
    }

    pub fn into_vec(self) -> Vec<E> {
        self.heap.into_vec()
    }
}

impl<E: Element> HeapSortArray<E> {
    pub fn heapsort(&mut self) {
        self.heap.build_heap();
        while self.heap.move_max().is_some() {}
    }
}

impl<E: fmt::Display> fmt::Display for HeapSortArray<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.heap.fmt(f)
    }
}

/// 对任意元素序列做堆排序，返回升序结果
pub fn heap_sort<E, I>(items: I) -> Vec<E>
where
    E: Element,
    I: IntoIterator<Item = E>,
{
    let mut array = HeapSortArray::new();
    for item in items {
        array.add_element(item);
    }
    array.heapsort();
    array.into_vec()
}
