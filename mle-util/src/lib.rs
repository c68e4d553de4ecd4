//! MLE 运行时基础库（mle-util）
//!
//! 提供事件派发与调度所依赖的数据结构：
//! - `ElementArray`：可增长、按下标寻址的元素数组；
//! - `HeapArray`：在数组前缀上维护最大堆，后缀为结果区；
//! - `PriorityQueue` / `PQ`：插入、取最大值、任意位置删除与优先级变更；
//! - `HeapSortArray`：堆排序；
//! - `MleError`：显式错误值。
//!
pub mod element;
pub mod element_array;
pub mod error;
pub mod heap_array;
pub mod heap_sort;
pub mod pq;
pub mod pq_element;
pub mod priority_queue;

pub use element::Element;
pub use element_array::{ElementArray, INC_QSIZE};
pub use error::{MleError, MleErrorKind, MleResult};
pub use heap_array::HeapArray;
pub use heap_sort::{HeapSortArray, heap_sort};
pub use pq::PQ;
pub use pq_element::{MAX_PRIORITY, MIN_PRIORITY, PQElement};
pub use priority_queue::PriorityQueue;
