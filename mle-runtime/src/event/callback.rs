use super::types::Event;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 事件回调：返回值作为立即派发时的状态
pub trait EventCallback: Send + Sync {
    fn dispatch(&self, event: &Event, client_data: Option<&Value>) -> bool;
}

impl<F> EventCallback for F
where
    F: Fn(&Event, Option<&Value>) -> bool + Send + Sync,
{
    fn dispatch(&self, event: &Event, client_data: Option<&Value>) -> bool {
        self(event, client_data)
    }
}

/// 安装回调后返回的不透明句柄
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CallbackId(pub(crate) u64);

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cb-{}", self.0)
    }
}

/// 事件节点优先队列中的回调条目
pub(crate) struct CallbackNode {
    pub(crate) id: CallbackId,
    pub(crate) callback: Arc<dyn EventCallback>,
    pub(crate) client_data: Option<Value>,
    enabled: AtomicBool,
}

impl CallbackNode {
    pub(crate) fn new(
        id: CallbackId,
        callback: Arc<dyn EventCallback>,
        client_data: Option<Value>,
    ) -> Self {
        Self {
            id,
            callback,
            client_data,
            enabled: AtomicBool::new(true),
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub(crate) fn invoke(&self, event: &Event) -> bool {
        self.callback.dispatch(event, self.client_data.as_ref())
    }
}
