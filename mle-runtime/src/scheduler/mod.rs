//! 阶段式任务调度（scheduler）
//!
//! - `Task`：包装一个 `Runnable`，每次调用派生一次并发运行；
//! - `Phase`：一组任务，全部完成后才返回；
//! - `Scheduler`：按顺序运行各阶段，支持在阶段边界退出。
//!
pub mod phase;
pub mod round_robin;
pub mod task;

pub use phase::Phase;
pub use round_robin::{
    ExitHandle, PhaseDump, Scheduler, SchedulerConfig, SchedulerDump, SchedulerHandle,
};
pub use task::{CompletionSignal, Runnable, RunnableFn, Task};
