//! 调度器（Scheduler）
//!
//! 按注册顺序依次运行各阶段：
//! - `run` 执行一轮，每个阶段结束后检查退出标志，置位则提前结束本轮；
//! - 退出标志只在阶段边界生效，不会中断正在运行的阶段；
//! - `start` 以固定间隔连续执行多轮，直到退出或句柄被关闭。
//!
use super::phase::Phase;
use super::task::Task;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

/// 调度器配置
#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    /// 连续调度时两轮之间的间隔
    pub sweep_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(16),
        }
    }
}

/// 退出标志的共享句柄，任务可借此在运行中请求结束本轮
#[derive(Clone, Debug, Default)]
pub struct ExitHandle {
    flag: Arc<AtomicBool>,
}

impl ExitHandle {
    pub fn set_exit_ok(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// 读取并清除退出标志
    fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    phases: RwLock<Vec<Arc<Phase>>>,
    exit: ExitHandle,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn phase_count(&self) -> usize {
        self.phases.read().len()
    }

    /// 同一个阶段实例只能注册一次
    pub fn add_phase(&self, phase: Arc<Phase>) -> bool {
        let mut phases = self.phases.write();
        if phases.iter().any(|p| Arc::ptr_eq(p, &phase)) {
            return false;
        }
        phases.push(phase);
        true
    }

    pub fn delete_phase(&self, phase: &Arc<Phase>) -> bool {
        let mut phases = self.phases.write();
        match phases.iter().position(|p| Arc::ptr_eq(p, phase)) {
            Some(index) => {
                phases.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn phase(&self, n: usize) -> Option<Arc<Phase>> {
        self.phases.read().get(n).cloned()
    }

    pub fn phase_with_name(&self, name: &str) -> Option<Arc<Phase>> {
        self.phases.read().iter().find(|p| p.name() == name).cloned()
    }

    fn is_registered(&self, phase: &Arc<Phase>) -> bool {
        self.phases.read().iter().any(|p| Arc::ptr_eq(p, phase))
    }

    /// 仅当阶段已注册时才加入任务
    pub fn add_task(&self, phase: &Arc<Phase>, task: Arc<Task>) -> bool {
        self.is_registered(phase) && phase.add_task(task)
    }

    pub fn delete_task(&self, phase: &Arc<Phase>, task: &Arc<Task>) -> bool {
        self.is_registered(phase) && phase.delete_task(task)
    }

    pub fn set_exit_ok(&self) {
        self.exit.set_exit_ok();
    }

    pub fn exit_requested(&self) -> bool {
        self.exit.is_set()
    }

    pub fn exit_handle(&self) -> ExitHandle {
        self.exit.clone()
    }

    /// 执行一轮；返回本轮是否因退出请求而提前结束
    ///
    /// 必须在 tokio 运行时上下文中调用。
    pub async fn run(&self) -> bool {
        self.exit.reset();
        self.sweep().await
    }

    /// 不清除退出标志的单轮执行
    async fn sweep(&self) -> bool {
        let phases = self.phases.read().clone();

        for phase in phases {
            phase.run().await;
            if self.exit.is_set() {
                info!(phase = %phase.name(), "exit requested, sweep stopped");
                return true;
            }
        }
        false
    }

    /// 在调度轮次之外单独运行一个阶段
    ///
    /// 必须在 tokio 运行时上下文中调用。
    pub async fn go(&self, phase: &Phase) {
        phase.run().await;
    }

    /// 连续执行多轮，直到某轮以退出请求结束、两轮之间收到退出请求或句柄被关闭
    pub fn start(self: Arc<Self>) -> SchedulerHandle {
        let token = CancellationToken::new();
        let cancel = token.clone();
        let interval = self.config.sweep_interval;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut sweeps = 0usize;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        // 首轮之前残留的请求作废；之后任何时刻的请求都不会被清除
                        if self.exit.take() && sweeps > 0 {
                            break;
                        }
                        sweeps += 1;
                        if self.sweep().await {
                            break;
                        }
                    }
                }
            }
            debug!(sweeps, "scheduler loop stopped");
            sweeps
        });

        SchedulerHandle {
            token,
            task: Some(task),
        }
    }

    /// 阶段/任务拓扑，仅用于诊断
    pub fn dump(&self) -> SchedulerDump {
        let phases = self
            .phases
            .read()
            .iter()
            .map(|phase| PhaseDump {
                name: phase.name().to_string(),
                tasks: phase.tasks().iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        SchedulerDump { phases }
    }
}

/// 连续调度的运行句柄：用于关闭与等待
pub struct SchedulerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<usize>>,
}

impl SchedulerHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// 等待调度循环结束，返回已执行的轮数
    ///
    /// 调度循环异常终止（如任务 panic）时返回 `JoinError`。
    pub async fn join(mut self) -> Result<usize, JoinError> {
        match self.task.take() {
            Some(task) => task.await.inspect_err(|err| {
                warn!(error = %err, "scheduler loop terminated abnormally");
            }),
            None => Ok(0),
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhaseDump {
    pub name: String,
    pub tasks: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchedulerDump {
    pub phases: Vec<PhaseDump>,
}

impl fmt::Display for SchedulerDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, phase) in self.phases.iter().enumerate() {
            write!(f, "Phase {}: {}", i + 1, phase.name)?;
            for (j, task) in phase.tasks.iter().enumerate() {
                write!(f, "\tTask {}: {}", j + 1, task)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
