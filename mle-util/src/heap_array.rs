//! 堆数组（HeapArray）
//!
//! 在 `ElementArray` 之上维护一个最大堆：
//! - 前缀 `[0, heap_len)` 为堆区，满足 `array[parent(i)] >= array[i]`；
//! - 后缀 `[heap_len, len)` 为结果区，存放已被 `move_max` 移出的元素；
//! - 根固定为下标 0，所有“空位置”以 `None` 表示。
//!
use crate::element::Element;
use crate::element_array::ElementArray;
use std::fmt;

/// 根节点下标
pub const ROOT: usize = 0;

#[derive(Clone, Debug)]
pub struct HeapArray<E> {
    array: ElementArray<E>,
    heap_len: usize,
}

impl<E> Default for HeapArray<E> {
    fn default() -> Self {
        Self {
            array: ElementArray::new(),
            heap_len: 0,
        }
    }
}

impl<E> HeapArray<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            array: ElementArray::with_capacity(capacity),
            heap_len: 0,
        }
    }

    /// 以已有数组构造，全部元素计入堆区但尚未建堆
    pub fn from_array(array: ElementArray<E>) -> Self {
        let heap_len = array.len();
        Self { array, heap_len }
    }

    /// 将元素放到堆区末尾并扩展堆区（不做上浮）
    pub fn add_element(&mut self, element: E) {
        self.array.insert(self.heap_len, element);
        self.heap_len += 1;
    }

    pub fn element_at(&self, index: usize) -> Option<&E> {
        self.array.element_at(index)
    }

    /// 元素总数（堆区 + 结果区）
    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn heap_len(&self) -> usize {
        self.heap_len
    }

    pub fn heap_empty(&self) -> bool {
        self.heap_len == 0
    }

    pub fn capacity(&self) -> usize {
        self.array.capacity()
    }

    pub fn grow(&mut self, additional: usize) {
        self.array.grow(additional);
    }

    /// 结果区元素（按被移出的先后逆序排列）
    pub fn results(&self) -> &[E] {
        &self.array.as_slice()[self.heap_len..]
    }

    pub fn as_slice(&self) -> &[E] {
        self.array.as_slice()
    }

    pub fn into_vec(self) -> Vec<E> {
        self.array.into_vec()
    }

    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        self.array.swap(a, b)
    }

    /// 下标在堆区内则原样返回
    pub fn at(&self, index: usize) -> Option<usize> {
        (index < self.heap_len).then_some(index)
    }

    /// 父节点；根的父节点为根自身
    pub fn parent(&self, k: usize) -> Option<usize> {
        if k == ROOT {
            return self.at(ROOT);
        }
        self.at((k - 1) / 2)
    }

    pub fn left_child(&self, k: usize) -> Option<usize> {
        self.at(2 * k + 1)
    }

    pub fn right_child(&self, k: usize) -> Option<usize> {
        self.at(2 * k + 2)
    }

    /// 最后一个带有子节点的元素
    pub fn last_inner_element(&self) -> Option<usize> {
        if self.heap_empty() {
            return None;
        }
        self.parent(self.heap_len - 1)
    }

    /// 清空堆区与结果区
    pub fn clear(&mut self) {
        self.heap_len = 0;
        self.array.clear();
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<E> {
        let element = self.array.remove(index)?;
        if index < self.heap_len {
            self.heap_len -= 1;
        }
        Some(element)
    }

    pub(crate) fn shrink_heap(&mut self) {
        self.heap_len = self.heap_len.saturating_sub(1);
    }
}

impl<E: Element> HeapArray<E> {
    pub fn is_greater_than(&self, a: usize, b: usize) -> bool {
        self.array.is_greater_than(a, b)
    }

    /// 两个子节点中较大者；叶子节点返回 `None`
    pub fn max_child(&self, k: usize) -> Option<usize> {
        let lc = self.left_child(k)?;
        match self.right_child(k) {
            Some(rc) if !self.is_greater_than(lc, rc) => Some(rc),
            _ => Some(lc),
        }
    }

    /// 让 `k` 与其较大子节点比较，需要交换时返回 `k` 原元素的新位置
    pub fn heapify_locally(&mut self, k: usize) -> Option<usize> {
        let mc = self.max_child(k)?;
        if self.is_greater_than(mc, k) {
            self.array.swap(k, mc);
            return Some(mc);
        }
        None
    }

    /// 下沉 `k` 处的元素，前提是两棵子树都已满足堆序
    pub fn heapify(&mut self, k: usize) {
        let mut next = self.at(k);
        while let Some(k) = next {
            next = self.heapify_locally(k);
        }
    }

    /// 对整个堆区建堆
    pub fn build_heap(&mut self) {
        let Some(last_inner) = self.last_inner_element() else {
            return;
        };
        for k in (ROOT..=last_inner).rev() {
            self.heapify(k);
        }
    }

    /// 将堆顶移入结果区，返回其所在下标
    pub fn move_max(&mut self) -> Option<usize> {
        if self.heap_empty() {
            return None;
        }
        let last = self.heap_len - 1;
        self.array.swap(ROOT, last);
        self.shrink_heap();
        self.heapify(ROOT);
        Some(last)
    }

    /// 上浮 `k` 处的元素，直到父节点不小于它或到达根
    pub fn flow_up(&mut self, mut k: usize) {
        while k != ROOT {
            let Some(p) = self.parent(k) else {
                break;
            };
            if !self.is_greater_than(k, p) {
                break;
            }
            self.array.swap(k, p);
            k = p;
        }
    }

    /// 检查堆区是否满足最大堆性质
    pub fn is_heap_ordered(&self) -> bool {
        (1..self.heap_len).all(|i| {
            self.parent(i)
                .is_some_and(|p| !self.is_greater_than(i, p))
        })
    }

    /// 以树形呈现堆区的前四层，用于调试
    pub fn tree_string(&self) -> String {
        let mut out = String::new();
        let (mut start, mut end) = (ROOT, 2 * ROOT + 1);
        let (mut lead, mut gap) = (7usize, 1usize);

        for _level in 0..=3 {
            out.push_str(&" ".repeat(lead));
            for index in start..end {
                match self.at(index).and_then(|i| self.element_at(i)) {
                    Some(element) => out.push_str(&element.to_string()),
                    None => out.push(' '),
                }
                out.push_str(&" ".repeat(gap));
            }
            out.push('\n');
            start = 2 * start + 1;
            end = 2 * end + 1;
            gap = lead;
            lead = ((lead + 1) / 2).saturating_sub(1);
        }
        out
    }
}

impl<E: fmt::Display> fmt::Display for HeapArray<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.array.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap_of(values: &[i32]) -> HeapArray<i32> {
        let mut heap = HeapArray::new();
        for v in values {
            heap.add_element(*v);
        }
        heap.build_heap();
        heap
    }

    #[test]
    fn build_heap_orders_the_heap_region() {
        let heap = heap_of(&[3, 2, 1, 5, 4, 6, 8, 7, 8]);
        assert!(heap.is_heap_ordered());
        assert_eq!(heap.element_at(ROOT), Some(&8));
    }

    #[test]
    fn move_max_fills_the_result_region() {
        let mut heap = heap_of(&[1, 9, 4]);

        assert_eq!(heap.move_max(), Some(2));
        assert_eq!(heap.heap_len(), 2);
        assert_eq!(heap.results(), &[9]);
        assert!(heap.is_heap_ordered());

        heap.move_max();
        heap.move_max();
        assert!(heap.heap_empty());
        assert_eq!(heap.move_max(), None);
        assert_eq!(heap.results(), &[1, 4, 9]);
    }

    #[test]
    fn navigation_stays_inside_heap_region() {
        let heap = heap_of(&[5, 3, 4]);
        assert_eq!(heap.parent(ROOT), Some(ROOT));
        assert_eq!(heap.parent(2), Some(0));
        assert_eq!(heap.left_child(0), Some(1));
        assert_eq!(heap.right_child(1), None);
        assert_eq!(heap.max_child(0), Some(2));
        assert_eq!(heap.max_child(1), None);
        assert_eq!(heap.at(3), None);
    }

    #[test]
    fn clear_empties_everything() {
        let mut heap = heap_of(&[2, 7]);
        heap.move_max();
        heap.clear();
        assert!(heap.is_empty());
        assert!(heap.heap_empty());
    }

    #[test]
    fn tree_string_renders_levels() {
        let heap = heap_of(&[1, 2, 3]);
        let tree = heap.tree_string();
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].trim(), "3");
        assert_eq!(lines[1].split_whitespace().count(), 2);
    }
}
