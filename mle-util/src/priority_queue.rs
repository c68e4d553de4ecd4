//! 优先队列（PriorityQueue）
//!
//! 在 `HeapArray` 之上提供插入（上浮）与取最大值（下沉）操作，
//! 另提供任意下标删除并就地修复堆序。
//!
use crate::element::Element;
use crate::heap_array::{HeapArray, ROOT};
use std::fmt;

#[derive(Clone, Debug)]
pub struct PriorityQueue<E> {
    heap: HeapArray<E>,
}

impl<E> Default for PriorityQueue<E> {
    fn default() -> Self {
        Self {
            heap: HeapArray::new(),
        }
    }
}

impl<E> PriorityQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: HeapArray::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.heap_len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.heap_empty()
    }

    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    /// 查看堆区 `k` 处的元素
    pub fn peek(&self, k: usize) -> Option<&E> {
        self.heap.at(k).and_then(|k| self.heap.element_at(k))
    }

    /// 按存储顺序遍历堆区
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.heap.as_slice()[..self.heap.heap_len()].iter()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn heap(&self) -> &HeapArray<E> {
        &self.heap
    }
}

impl<E: Element> PriorityQueue<E> {
    /// 插入元素并上浮
    pub fn add_element(&mut self, element: E) {
        self.heap.add_element(element);
        self.flow_up(self.heap.heap_len() - 1);
    }

    /// 取出最大元素
    pub fn max_element(&mut self) -> Option<E> {
        let index = self.heap.move_max()?;
        self.heap.remove(index)
    }

    pub fn flow_up(&mut self, k: usize) {
        self.heap.flow_up(k);
    }

    pub fn flow_down(&mut self, k: usize) {
        self.heap.heapify(k);
    }

    /// 删除 `k` 处元素：与最后一个元素交换后收缩堆区，
    /// 再根据换入元素相对被删元素的大小决定上浮或下沉
    pub fn remove_at(&mut self, k: usize) -> Option<E> {
        self.heap.at(k)?;
        let last = self.heap.heap_len() - 1;
        if k == last {
            self.heap.shrink_heap();
            return self.heap.remove(last);
        }

        self.heap.swap(k, last);
        let rose = self.heap.is_greater_than(k, last);
        self.heap.shrink_heap();
        let removed = self.heap.remove(last)?;

        if rose && k != ROOT {
            self.flow_up(k);
        } else {
            self.flow_down(k);
        }
        Some(removed)
    }

    pub fn is_heap_ordered(&self) -> bool {
        self.heap.is_heap_ordered()
    }
}

impl<E: fmt::Display> fmt::Display for PriorityQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.heap.fmt(f)
    }
}
