//! MLE 运行时核心（mle-runtime）
//!
//! 提供多媒体作品运行时的事件派发与阶段式调度：
//! - 事件（`event`）：复合事件标识、事件注册表、回调派发器与属性变更通知；
//! - 调度（`scheduler`）：任务、阶段与按轮次执行的调度器；
//! - 工厂注册表（`registry`）：按名称创建类型化对象；
//! - 上下文（`context`）：持有以上组件，替代进程级全局状态。
//!
//! 典型用法：
//! 1. 通过 `RuntimeContext::builder()` 构造上下文；
//! 2. 注册事件标识并在派发器上安装回调；
//! 3. 立即派发或入队后在每帧调用 `dispatch_events`；
//! 4. 把工作单元包装为 `Task` 加入各 `Phase`，由 `Scheduler` 逐轮运行。
//!
pub mod context;
pub mod error;
pub mod event;
pub mod registry;
pub mod scheduler;

pub use context::RuntimeContext;
pub use error::{RuntimeError, RuntimeResult};
pub use registry::FactoryRegistry;
