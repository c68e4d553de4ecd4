//! 带类型的优先队列门面（PQ）
//!
//! 元素为 `(key, data)` 对，在 `PriorityQueue` 的基础上提供：
//! - 按键/按数据的线性查找；
//! - 任意位置删除并以 O(log n) 修复堆序；
//! - 优先级变更（删除后以新键重新插入，而非原地修改）；
//! - 派发时使用的防御性拷贝。
//!
//! 相同键的元素之间没有 FIFO 保证，顺序取决于堆的物理布局。
//!
use crate::pq_element::PQElement;
use crate::priority_queue::PriorityQueue;
use std::fmt;

#[derive(Clone, Debug)]
pub struct PQ<T> {
    queue: PriorityQueue<PQElement<T>>,
}

impl<T> Default for PQ<T> {
    fn default() -> Self {
        Self {
            queue: PriorityQueue::new(),
        }
    }
}

impl<T> FromIterator<PQElement<T>> for PQ<T> {
    fn from_iter<I: IntoIterator<Item = PQElement<T>>>(iter: I) -> Self {
        let mut pq = Self::new();
        for item in iter {
            pq.insert(item);
        }
        pq
    }
}

impl<T> PQ<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: PriorityQueue::with_capacity(capacity),
        }
    }

    /// 以一组元素构造队列（逐个插入）
    pub fn from_elements(elements: Vec<PQElement<T>>) -> Self {
        let mut pq = Self::with_capacity(elements.len().max(crate::INC_QSIZE));
        for item in elements {
            pq.insert(item);
        }
        pq
    }

    pub fn insert(&mut self, item: PQElement<T>) {
        self.queue.add_element(item);
    }

    /// 取出优先级最高的元素
    pub fn remove(&mut self) -> Option<PQElement<T>> {
        self.queue.max_element()
    }

    /// 删除全部键为 `priority` 的元素并返回
    pub fn remove_with_priority(&mut self, priority: i32) -> Vec<PQElement<T>> {
        let mut found = Vec::new();
        while let Some(k) = self.find_item_with_priority(priority) {
            match self.destroy_item(k) {
                Some(item) => found.push(item),
                None => break,
            }
        }
        found
    }

    /// 删除 `k` 处的元素
    pub fn destroy_item(&mut self, k: usize) -> Option<PQElement<T>> {
        self.queue.remove_at(k)
    }

    /// 删除堆顶
    pub fn destroy(&mut self) -> Option<PQElement<T>> {
        self.destroy_item(0)
    }

    /// 删除第一个键为 `priority` 的元素
    pub fn destroy_item_with_priority(&mut self, priority: i32) -> Option<PQElement<T>> {
        let k = self.find_item_with_priority(priority)?;
        self.destroy_item(k)
    }

    /// 以新优先级重新插入 `k` 处元素的数据
    pub fn change_item(&mut self, k: usize, priority: i32) -> bool {
        match self.destroy_item(k) {
            Some(item) => {
                self.insert(PQElement::new(priority, item.data));
                true
            }
            None => false,
        }
    }

    pub fn find_item_with_priority(&self, priority: i32) -> Option<usize> {
        self.position(|item| item.key == priority)
    }

    /// 线性查找首个满足条件的元素下标
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&PQElement<T>) -> bool,
    {
        self.queue.iter().position(pred)
    }

    pub fn in_queue_with_priority(&self, priority: i32) -> bool {
        self.find_item_with_priority(priority).is_some()
    }

    pub fn peek(&self, k: usize) -> Option<&PQElement<T>> {
        self.queue.peek(k)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// 按存储顺序遍历（非优先级顺序）
    pub fn iter(&self) -> impl Iterator<Item = &PQElement<T>> {
        self.queue.iter()
    }

    /// 并入另一个队列的全部元素
    pub fn join(&mut self, other: PQ<T>) {
        let mut other = other;
        while let Some(item) = other.remove() {
            self.insert(item);
        }
    }

    pub fn is_heap_ordered(&self) -> bool {
        self.queue.is_heap_ordered()
    }

    pub fn tree_string(&self) -> String {
        self.queue.heap().tree_string()
    }
}

impl<T: PartialEq> PQ<T> {
    /// 查找与 `item` 键和数据均相等的元素
    pub fn find_item(&self, item: &PQElement<T>) -> Option<usize> {
        self.position(|candidate| candidate == item)
    }

    pub fn in_queue(&self, item: &PQElement<T>) -> bool {
        self.find_item(item).is_some()
    }
}

impl<T: Clone> PQ<T> {
    /// 逐个元素拷贝，供派发期间安全遍历
    pub fn copy_queue(&self) -> Vec<PQElement<T>> {
        self.queue.iter().cloned().collect()
    }

    /// 合并两个队列为新队列
    pub fn joined(a: &PQ<T>, b: &PQ<T>) -> PQ<T> {
        let mut out = PQ::with_capacity(a.len() + b.len());
        for item in a.iter().chain(b.iter()) {
            out.insert(item.clone());
        }
        out
    }
}

impl<T> fmt::Display for PQ<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.queue.fmt(f)
    }
}
