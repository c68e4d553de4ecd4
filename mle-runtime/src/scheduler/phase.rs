use super::task::Task;
use futures_util::future::join_all;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// 阶段：一组按注册顺序启动、全部完成后才返回的任务
#[derive(Debug, Default)]
pub struct Phase {
    name: String,
    tasks: RwLock<Vec<Arc<Task>>>,
}

impl Phase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: RwLock::new(Vec::new()),
        }
    }

    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }

    /// 同一个任务实例只能加入一次
    pub fn add_task(&self, task: Arc<Task>) -> bool {
        let mut tasks = self.tasks.write();
        if tasks.iter().any(|t| Arc::ptr_eq(t, &task)) {
            return false;
        }
        tasks.push(task);
        true
    }

    pub fn delete_task(&self, task: &Arc<Task>) -> bool {
        let mut tasks = self.tasks.write();
        match tasks.iter().position(|t| Arc::ptr_eq(t, task)) {
            Some(index) => {
                tasks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn delete_task_at(&self, n: usize) -> Option<Arc<Task>> {
        let mut tasks = self.tasks.write();
        (n < tasks.len()).then(|| tasks.remove(n))
    }

    pub fn delete_task_with_name(&self, name: &str) -> Option<Arc<Task>> {
        let mut tasks = self.tasks.write();
        let index = tasks.iter().position(|t| t.name() == name)?;
        Some(tasks.remove(index))
    }

    pub fn task(&self, n: usize) -> Option<Arc<Task>> {
        self.tasks.read().get(n).cloned()
    }

    pub fn task_with_name(&self, name: &str) -> Option<Arc<Task>> {
        self.tasks.read().iter().find(|t| t.name() == name).cloned()
    }

    pub fn tasks(&self) -> Vec<Arc<Task>> {
        self.tasks.read().clone()
    }

    /// 启动全部任务并等待它们完成
    ///
    /// 必须在 tokio 运行时上下文中调用。
    pub async fn run(&self) {
        let tasks = self.tasks();
        info!(phase = %self.name, tasks = tasks.len(), "*** EXECUTING PHASE {} ***", self.name);

        for task in &tasks {
            task.invoke();
        }
        join_all(tasks.iter().map(|t| t.join())).await;
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
