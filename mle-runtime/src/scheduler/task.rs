//! 任务（Task）
//!
//! 包装一个可并发执行的工作单元：
//! - `invoke` 为本次运行创建独立的完成信号，在 tokio 运行时上派生执行后立即返回；
//! - `is_running` 在信号到达后的下一次查询时惰性清除运行状态；
//! - 同一任务仍在运行时拒绝再次 `invoke`。
//!
use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::Shared;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{trace, warn};

/// 完成信号：消费自身以保证至多发送一次
#[derive(Debug)]
pub struct CompletionSignal {
    tx: oneshot::Sender<()>,
}

impl CompletionSignal {
    pub fn signal(self) {
        let _ = self.tx.send(());
    }
}

/// 外部参与调度唯一需要实现的协议
///
/// 若传入了完成信号，运行结束时应调用一次 `signal`。
/// 未显式发送的信号会在被丢弃时同样视为完成。
#[async_trait]
pub trait Runnable: Send + Sync {
    async fn run(&self, done: Option<CompletionSignal>);
}

/// 把异步闭包适配为 `Runnable`
pub struct RunnableFn<F> {
    f: F,
}

impl<F> RunnableFn<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Runnable for RunnableFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run(&self, done: Option<CompletionSignal>) {
        (self.f)().await;
        if let Some(done) = done {
            done.signal();
        }
    }
}

type Completion = Shared<oneshot::Receiver<()>>;

pub struct Task {
    name: String,
    runnable: Arc<dyn Runnable>,
    completion: Mutex<Option<Completion>>,
}

impl Task {
    pub fn new(runnable: Arc<dyn Runnable>) -> Self {
        Self::with_name(runnable, "")
    }

    pub fn with_name(runnable: Arc<dyn Runnable>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runnable,
            completion: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 派生一次运行；任务仍在运行时返回 `false`
    ///
    /// 必须在 tokio 运行时上下文中调用。
    pub fn invoke(&self) -> bool {
        let mut completion = self.completion.lock();
        if Self::in_flight(&mut completion) {
            warn!(task = %self.name, "task still running, invocation refused");
            return false;
        }

        let (tx, rx) = oneshot::channel();
        *completion = Some(rx.shared());
        drop(completion);

        let runnable = self.runnable.clone();
        let name = self.name.clone();
        tokio::spawn(async move {
            runnable.run(Some(CompletionSignal { tx })).await;
            trace!(task = %name, "task run returned");
        });
        true
    }

    pub fn is_running(&self) -> bool {
        Self::in_flight(&mut self.completion.lock())
    }

    /// 等待当前运行结束；未运行时立即返回
    pub async fn join(&self) {
        let pending = self.completion.lock().clone();
        if let Some(done) = pending {
            let _ = done.await;
        }
    }

    fn in_flight(completion: &mut Option<Completion>) -> bool {
        let finished = match completion.as_ref() {
            Some(done) => done.clone().now_or_never().is_some(),
            None => return false,
        };
        if finished {
            *completion = None;
        }
        !finished
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str("empty")
        } else {
            f.write_str(&self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    struct Gated {
        gate: Arc<Notify>,
        runs: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Runnable for Gated {
        async fn run(&self, done: Option<CompletionSignal>) {
            self.gate.notified().await;
            self.runs.fetch_add(1, Ordering::SeqCst);
            if let Some(done) = done {
                done.signal();
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn running_until_signalled_then_reinvokable() {
        let gate = Arc::new(Notify::new());
        let runs = Arc::new(AtomicUsize::new(0));
        let task = Task::with_name(
            Arc::new(Gated {
                gate: gate.clone(),
                runs: runs.clone(),
            }),
            "gated",
        );

        assert!(!task.is_running());
        assert!(task.invoke());
        assert!(task.is_running());
        assert!(!task.invoke());

        gate.notify_one();
        task.join().await;
        assert!(!task.is_running());
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // 每次调用使用新的完成信号
        assert!(task.invoke());
        gate.notify_one();
        task.join().await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dropped_signal_counts_as_completion() {
        struct Forgetful;

        #[async_trait]
        impl Runnable for Forgetful {
            async fn run(&self, _done: Option<CompletionSignal>) {}
        }

        let task = Task::new(Arc::new(Forgetful));
        assert!(task.invoke());
        tokio::time::timeout(Duration::from_secs(2), task.join())
            .await
            .expect("join should finish once the signal is dropped");
        assert!(!task.is_running());
        assert_eq!(task.to_string(), "empty");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn closure_runnable_signals() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let task = Task::with_name(
            Arc::new(RunnableFn::new(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })),
            "closure",
        );

        task.invoke();
        task.join().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(task.name(), "closure");
    }
}
