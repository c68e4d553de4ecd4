//! 运行时上下文
//!
//! 持有事件管理器、派发器、工厂注册表、属性变更通知与调度器，
//! 以引用或 `Arc` 传递给需要它们的组件。
//!
use crate::event::{DispatcherConfig, EventDispatcher, EventManager, PropChangeSupport};
use crate::registry::FactoryRegistry;
use crate::scheduler::{Scheduler, SchedulerConfig};
use bon::bon;
use mle_util::MleResult;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct RuntimeContext {
    events: RwLock<EventManager>,
    dispatcher: EventDispatcher,
    factories: FactoryRegistry,
    props: PropChangeSupport,
    scheduler: Arc<Scheduler>,
    ok_to_exit: AtomicBool,
}

#[bon]
impl RuntimeContext {
    #[builder]
    pub fn new(
        events: Option<EventManager>,
        dispatcher_config: Option<DispatcherConfig>,
        scheduler_config: Option<SchedulerConfig>,
    ) -> Self {
        Self {
            events: RwLock::new(events.unwrap_or_default()),
            dispatcher: EventDispatcher::with_config(dispatcher_config.unwrap_or_default()),
            factories: FactoryRegistry::new(),
            props: PropChangeSupport::new(),
            scheduler: Arc::new(Scheduler::with_config(scheduler_config.unwrap_or_default())),
            ok_to_exit: AtomicBool::new(false),
        }
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RuntimeContext {
    pub fn events(&self) -> RwLockReadGuard<'_, EventManager> {
        self.events.read()
    }

    pub fn events_mut(&self) -> RwLockWriteGuard<'_, EventManager> {
        self.events.write()
    }

    /// 在分组内取得下一个标识并立即注册
    pub fn register_event(&self, group: i16, name: Option<&str>) -> MleResult<i32> {
        let mut events = self.events.write();
        let id = events.create_event(group)?;
        events.add_event(id, name)?;
        Ok(id)
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    pub fn props(&self) -> &PropChangeSupport {
        &self.props
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    pub fn ok_to_exit(&self) -> bool {
        self.ok_to_exit.load(Ordering::SeqCst)
    }

    pub fn set_exit_status(&self, status: bool) {
        self.ok_to_exit.store(status, Ordering::SeqCst);
    }
}
