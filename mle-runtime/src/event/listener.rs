use super::types::Event;
use std::sync::Arc;

/// 派发观察者
///
/// 两条通知路径彼此独立：
/// - `event_processed`：立即派发完成后；
/// - `event_dispatched`：延迟队列被 `dispatch_events` 取出并派发后。
pub trait EventListener: Send + Sync {
    fn event_processed(&self, _event: &Event) {}

    fn event_dispatched(&self, _event: &Event) {}
}

/// 以实例身份（而非值）比较两个监听器
pub(crate) fn same_listener(a: &Arc<dyn EventListener>, b: &Arc<dyn EventListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
