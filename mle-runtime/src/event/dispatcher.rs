//! 事件派发器（EventDispatcher）
//!
//! 按复合事件标识把事件路由到回调链：
//! - 每个事件标识对应一个事件节点，节点内以 `PQ` 按优先级保存回调；
//! - 事件节点按分组归档，首次安装回调时惰性创建；
//! - 支持立即派发与延迟派发（全局延迟队列，按优先级而非入队时间出队）；
//! - 监听器分别在立即派发后与批量派发后得到两类不同的通知。
//!
//! 分组表、各节点的回调队列与延迟队列由同一把互斥锁保护；
//! 调用回调与监听器之前锁已释放，因此回调内可以再次调用派发器。
//!
use super::callback::{CallbackId, CallbackNode, EventCallback};
use super::id::{INVALID_EVENT_ID, group_id};
use super::listener::{EventListener, same_listener};
use super::types::{DispatchMode, Event};
use mle_util::{MleError, MleResult, PQ, PQElement};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// 派发器配置
#[derive(Clone, Copy, Debug)]
pub struct DispatcherConfig {
    /// 分组表的初始容量
    pub group_capacity: usize,
    /// 延迟队列与回调队列的初始容量
    pub queue_capacity: usize,
    /// 新安装回调的默认优先级
    pub default_priority: i32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            group_capacity: 10,
            queue_capacity: mle_util::INC_QSIZE,
            default_priority: 0,
        }
    }
}

struct EventNode {
    event: i32,
    enabled: bool,
    callbacks: PQ<Arc<CallbackNode>>,
}

impl EventNode {
    fn callback_index(&self, id: CallbackId) -> Option<usize> {
        self.callbacks.position(|item| item.data.id == id)
    }
}

#[derive(Default)]
struct EventGroup {
    nodes: Vec<EventNode>,
}

struct DispatchState {
    groups: HashMap<i16, EventGroup>,
    queue: PQ<Event>,
}

impl DispatchState {
    fn node(&self, event: i32) -> Option<&EventNode> {
        self.groups
            .get(&group_id(event))?
            .nodes
            .iter()
            .find(|n| n.event == event)
    }

    fn node_mut(&mut self, event: i32) -> Option<&mut EventNode> {
        self.groups
            .get_mut(&group_id(event))?
            .nodes
            .iter_mut()
            .find(|n| n.event == event)
    }

    /// 事件节点已启用时，返回其回调队列的拷贝
    fn snapshot(&self, event: i32) -> Option<PQ<Arc<CallbackNode>>> {
        let node = self.node(event).filter(|n| n.enabled)?;
        Some(PQ::from_elements(node.callbacks.copy_queue()))
    }
}

pub struct EventDispatcher {
    state: Mutex<DispatchState>,
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
    next_callback: AtomicU64,
    config: DispatcherConfig,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::with_config(DispatcherConfig::default())
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            state: Mutex::new(DispatchState {
                groups: HashMap::with_capacity(config.group_capacity),
                queue: PQ::with_capacity(config.queue_capacity),
            }),
            listeners: RwLock::new(Vec::new()),
            next_callback: AtomicU64::new(1),
            config,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// 以默认优先级安装回调
    pub fn install_event_cb(
        &self,
        event: i32,
        callback: Arc<dyn EventCallback>,
        client_data: Option<Value>,
    ) -> MleResult<CallbackId> {
        self.install_event_cb_with_priority(event, callback, client_data, self.config.default_priority)
    }

    pub fn install_event_cb_with_priority(
        &self,
        event: i32,
        callback: Arc<dyn EventCallback>,
        client_data: Option<Value>,
        priority: i32,
    ) -> MleResult<CallbackId> {
        if event == INVALID_EVENT_ID {
            return Err(MleError::construction(
                "unable to install event callback: invalid event id",
            ));
        }

        let id = CallbackId(self.next_callback.fetch_add(1, Ordering::Relaxed));
        let cb_node = Arc::new(CallbackNode::new(id, callback, client_data));

        let mut state = self.state.lock();
        let group = state.groups.entry(group_id(event)).or_default();
        let position = match group.nodes.iter().position(|n| n.event == event) {
            Some(position) => position,
            None => {
                group.nodes.push(EventNode {
                    event,
                    enabled: true,
                    callbacks: PQ::with_capacity(self.config.queue_capacity),
                });
                debug!(event, "event node created");
                group.nodes.len() - 1
            }
        };
        group.nodes[position]
            .callbacks
            .insert(PQElement::new(priority, cb_node));

        trace!(event, callback = %id, priority, "event callback installed");
        Ok(id)
    }

    pub fn uninstall_event_cb(&self, event: i32, callback: CallbackId) -> bool {
        let mut state = self.state.lock();
        let Some(node) = state.node_mut(event) else {
            return false;
        };
        let Some(index) = node.callback_index(callback) else {
            return false;
        };
        node.callbacks.destroy_item(index).is_some()
    }

    pub fn enable_event_cb(&self, event: i32, callback: CallbackId) -> bool {
        self.set_callback_enabled(event, callback, true)
    }

    pub fn disable_event_cb(&self, event: i32, callback: CallbackId) -> bool {
        self.set_callback_enabled(event, callback, false)
    }

    fn set_callback_enabled(&self, event: i32, callback: CallbackId, enabled: bool) -> bool {
        let state = self.state.lock();
        let Some(node) = state.node(event) else {
            return false;
        };
        match node.callback_index(callback).and_then(|k| node.callbacks.peek(k)) {
            Some(item) => {
                item.data.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    pub fn enable_event(&self, event: i32) -> bool {
        self.set_event_enabled(event, true)
    }

    pub fn disable_event(&self, event: i32) -> bool {
        self.set_event_enabled(event, false)
    }

    fn set_event_enabled(&self, event: i32, enabled: bool) -> bool {
        match self.state.lock().node_mut(event) {
            Some(node) => {
                node.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// 清空事件节点的回调队列并移除节点
    pub fn uninstall_event(&self, event: i32) -> bool {
        let mut state = self.state.lock();
        let gid = group_id(event);
        let Some(group) = state.groups.get_mut(&gid) else {
            return false;
        };
        let Some(position) = group.nodes.iter().position(|n| n.event == event) else {
            return false;
        };

        let mut node = group.nodes.remove(position);
        let drained = node.callbacks.len();
        node.callbacks.clear();
        if group.nodes.is_empty() {
            state.groups.remove(&gid);
        }

        debug!(event, drained, "event node uninstalled");
        true
    }

    /// 调整回调在其事件节点内的优先级
    pub fn change_cb_priority(&self, event: i32, callback: CallbackId, priority: i32) -> bool {
        let mut state = self.state.lock();
        let Some(node) = state.node_mut(event) else {
            return false;
        };
        match node.callback_index(callback) {
            Some(k) => node.callbacks.change_item(k, priority),
            None => false,
        }
    }

    /// 调整延迟队列中第一条匹配事件的优先级
    pub fn change_event_priority(&self, event: i32, priority: i32) -> bool {
        let mut state = self.state.lock();
        match state.queue.position(|item| item.data.id() == event) {
            Some(k) => state.queue.change_item(k, priority),
            None => false,
        }
    }

    pub fn process_event(&self, event: i32, call_data: Option<Value>, mode: DispatchMode) -> bool {
        self.process_event_with_priority(event, call_data, mode, 0)
    }

    /// 立即模式下同步派发并返回最后一个被调用回调的结果；
    /// 延迟模式下按 `priority` 入队并立即返回
    pub fn process_event_with_priority(
        &self,
        event: i32,
        call_data: Option<Value>,
        mode: DispatchMode,
        priority: i32,
    ) -> bool {
        let event = Event::new(event, mode, call_data);
        match mode {
            DispatchMode::Immediate => {
                let Some(status) = self.invoke_callbacks(&event) else {
                    return false;
                };
                for listener in self.listener_snapshot() {
                    listener.event_processed(&event);
                }
                status
            }
            DispatchMode::Delayed => self.push_event(event, priority),
        }
    }

    /// 取出调用时已在队列中的全部事件，按优先级依次派发；返回取出的数量
    pub fn dispatch_events(&self) -> usize {
        let size = self.pending_events();
        let mut dispatched = 0;

        for _ in 0..size {
            let Some(event) = self.pop_event() else {
                break;
            };
            dispatched += 1;

            if self.invoke_callbacks(&event).is_some() {
                for listener in self.listener_snapshot() {
                    listener.event_dispatched(&event);
                }
            }
        }

        if dispatched > 0 {
            trace!(dispatched, "delayed events drained");
        }
        dispatched
    }

    pub fn push_event(&self, event: Event, priority: i32) -> bool {
        self.state.lock().queue.insert(PQElement::new(priority, event));
        true
    }

    pub fn pop_event(&self) -> Option<Event> {
        self.state.lock().queue.remove().map(PQElement::into_data)
    }

    pub fn pending_events(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// 丢弃延迟队列中的全部事件，不调用任何回调
    pub fn flush(&self) {
        let mut state = self.state.lock();
        let discarded = state.queue.len();
        state.queue.clear();
        debug!(discarded, "delayed queue flushed");
    }

    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        self.listeners.write().push(listener);
    }

    /// 移除该监听器最早的一次注册；重复注册需逐次移除
    pub fn remove_listener(&self, listener: &Arc<dyn EventListener>) -> bool {
        let mut listeners = self.listeners.write();
        match listeners.iter().position(|l| same_listener(l, listener)) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn has_event_node(&self, event: i32) -> bool {
        self.state.lock().node(event).is_some()
    }

    pub fn callback_count(&self, event: i32) -> usize {
        self.state
            .lock()
            .node(event)
            .map_or(0, |n| n.callbacks.len())
    }

    /// 按优先级调用事件节点上已启用的回调；节点不存在或被禁用时返回 `None`
    fn invoke_callbacks(&self, event: &Event) -> Option<bool> {
        let mut queue = self.state.lock().snapshot(event.id())?;
        let mut status = false;
        while let Some(item) = queue.remove() {
            let cb_node = item.data;
            if cb_node.is_enabled() {
                status = cb_node.invoke(event);
            }
        }
        Some(status)
    }

    fn listener_snapshot(&self) -> Vec<Arc<dyn EventListener>> {
        self.listeners.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::id::make_id;
    use std::sync::atomic::AtomicUsize;

    fn recorder(log: &Arc<Mutex<Vec<i32>>>, tag: i32) -> Arc<dyn EventCallback> {
        let log = log.clone();
        Arc::new(move |_event: &Event, _data: Option<&Value>| {
            log.lock().push(tag);
            true
        })
    }

    #[derive(Default)]
    struct CountingListener {
        processed: AtomicUsize,
        dispatched: AtomicUsize,
    }

    impl EventListener for CountingListener {
        fn event_processed(&self, _event: &Event) {
            self.processed.fetch_add(1, Ordering::SeqCst);
        }

        fn event_dispatched(&self, _event: &Event) {
            self.dispatched.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn delayed_dispatch_follows_callback_priority() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(1, 0);
        let log = Arc::new(Mutex::new(Vec::new()));

        for p in [3, 1, 5, 2, 4] {
            dispatcher
                .install_event_cb_with_priority(event, recorder(&log, p), None, p)
                .unwrap();
        }

        assert!(dispatcher.process_event(event, None, DispatchMode::Delayed));
        assert!(log.lock().is_empty());
        assert_eq!(dispatcher.dispatch_events(), 1);
        assert_eq!(*log.lock(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn change_cb_priority_reorders_callbacks() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(1, 1);
        let log = Arc::new(Mutex::new(Vec::new()));

        let low = dispatcher
            .install_event_cb_with_priority(event, recorder(&log, 1), None, 1)
            .unwrap();
        dispatcher
            .install_event_cb_with_priority(event, recorder(&log, 2), None, 2)
            .unwrap();

        assert!(dispatcher.change_cb_priority(event, low, 9));
        assert!(!dispatcher.change_cb_priority(make_id(1, 2), low, 9));

        dispatcher.process_event(event, None, DispatchMode::Immediate);
        assert_eq!(*log.lock(), vec![1, 2]);
    }

    #[test]
    fn disabled_event_suppresses_then_restores_callbacks() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(2, 0);
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.install_event_cb(event, recorder(&log, 1), None).unwrap();
        dispatcher.install_event_cb(event, recorder(&log, 2), None).unwrap();

        assert!(dispatcher.disable_event(event));
        assert!(!dispatcher.process_event(event, None, DispatchMode::Immediate));
        assert!(log.lock().is_empty());
        assert_eq!(dispatcher.callback_count(event), 2);

        assert!(dispatcher.enable_event(event));
        assert!(dispatcher.process_event(event, None, DispatchMode::Immediate));
        let mut seen = log.lock().clone();
        seen.sort();
        assert_eq!(seen, vec![1, 2]);

        assert!(!dispatcher.enable_event(make_id(2, 1)));
    }

    #[test]
    fn disabled_callback_is_skipped_individually() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(2, 3);
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = dispatcher
            .install_event_cb_with_priority(event, recorder(&log, 1), None, 1)
            .unwrap();
        dispatcher
            .install_event_cb_with_priority(event, recorder(&log, 2), None, 2)
            .unwrap();

        assert!(dispatcher.disable_event_cb(event, first));
        dispatcher.process_event(event, None, DispatchMode::Immediate);
        assert_eq!(*log.lock(), vec![2]);

        assert!(dispatcher.enable_event_cb(event, first));
        assert!(!dispatcher.enable_event_cb(make_id(2, 4), first));
        dispatcher.process_event(event, None, DispatchMode::Immediate);
        assert_eq!(*log.lock(), vec![2, 2, 1]);
    }

    #[test]
    fn immediate_status_comes_from_last_callback() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(3, 0);
        let seen = Arc::new(Mutex::new(None));
        let seen_cb = seen.clone();

        dispatcher
            .install_event_cb_with_priority(
                event,
                Arc::new(|_: &Event, _: Option<&Value>| true),
                None,
                10,
            )
            .unwrap();
        dispatcher
            .install_event_cb_with_priority(
                event,
                Arc::new(move |e: &Event, data: Option<&Value>| {
                    *seen_cb.lock() = Some((e.call_data().cloned(), data.cloned()));
                    false
                }),
                Some(serde_json::json!("client")),
                1,
            )
            .unwrap();

        let status = dispatcher.process_event(
            event,
            Some(serde_json::json!({"w": 640})),
            DispatchMode::Immediate,
        );
        assert!(!status);
        assert_eq!(
            *seen.lock(),
            Some((
                Some(serde_json::json!({"w": 640})),
                Some(serde_json::json!("client"))
            ))
        );
        assert!(!dispatcher.process_event(make_id(3, 1), None, DispatchMode::Immediate));
    }

    #[test]
    fn flush_discards_queued_events() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(4, 0);
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.install_event_cb(event, recorder(&log, 1), None).unwrap();

        for p in 0..5 {
            dispatcher.process_event_with_priority(event, None, DispatchMode::Delayed, p);
        }
        assert_eq!(dispatcher.pending_events(), 5);

        dispatcher.flush();
        assert_eq!(dispatcher.dispatch_events(), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn delayed_queue_orders_by_priority_and_supports_reprioritising() {
        let dispatcher = EventDispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let events: Vec<i32> = (0..3).map(|i| make_id(5, i)).collect();
        for (tag, event) in events.iter().enumerate() {
            dispatcher
                .install_event_cb(*event, recorder(&log, tag as i32), None)
                .unwrap();
        }

        dispatcher.process_event_with_priority(events[0], None, DispatchMode::Delayed, 1);
        dispatcher.process_event_with_priority(events[1], None, DispatchMode::Delayed, 2);
        dispatcher.process_event_with_priority(events[2], None, DispatchMode::Delayed, 3);

        assert!(dispatcher.change_event_priority(events[0], 10));
        assert!(!dispatcher.change_event_priority(make_id(5, 9), 10));

        assert_eq!(dispatcher.dispatch_events(), 3);
        assert_eq!(*log.lock(), vec![0, 2, 1]);
    }

    #[test]
    fn events_queued_during_dispatch_wait_for_next_drain() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let event = make_id(6, 0);
        let hits = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&dispatcher);
        let counter = hits.clone();
        dispatcher
            .install_event_cb(
                event,
                Arc::new(move |e: &Event, _: Option<&Value>| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if let Some(d) = weak.upgrade() {
                        d.process_event(e.id(), None, DispatchMode::Delayed);
                    }
                    true
                }),
                None,
            )
            .unwrap();

        dispatcher.process_event(event, None, DispatchMode::Delayed);
        assert_eq!(dispatcher.dispatch_events(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.pending_events(), 1);
    }

    #[test]
    fn listeners_receive_distinct_notifications() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(7, 0);
        dispatcher
            .install_event_cb(event, Arc::new(|_: &Event, _: Option<&Value>| true), None)
            .unwrap();

        let listener = Arc::new(CountingListener::default());
        let as_dyn: Arc<dyn EventListener> = listener.clone();
        dispatcher.add_listener(as_dyn.clone());

        dispatcher.process_event(event, None, DispatchMode::Immediate);
        dispatcher.process_event(event, None, DispatchMode::Delayed);
        dispatcher.process_event(event, None, DispatchMode::Delayed);
        dispatcher.dispatch_events();

        assert_eq!(listener.processed.load(Ordering::SeqCst), 1);
        assert_eq!(listener.dispatched.load(Ordering::SeqCst), 2);

        // 没有事件节点时不通知
        dispatcher.process_event(make_id(7, 1), None, DispatchMode::Immediate);
        assert_eq!(listener.processed.load(Ordering::SeqCst), 1);

        assert!(dispatcher.remove_listener(&as_dyn));
        assert_eq!(dispatcher.listener_count(), 0);
        dispatcher.process_event(event, None, DispatchMode::Immediate);
        assert_eq!(listener.processed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_listener_drops_one_registration_at_a_time() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(7, 2);
        dispatcher
            .install_event_cb(event, Arc::new(|_: &Event, _: Option<&Value>| true), None)
            .unwrap();

        let listener = Arc::new(CountingListener::default());
        let as_dyn: Arc<dyn EventListener> = listener.clone();
        dispatcher.add_listener(as_dyn.clone());
        dispatcher.add_listener(as_dyn.clone());

        dispatcher.process_event(event, None, DispatchMode::Immediate);
        assert_eq!(listener.processed.load(Ordering::SeqCst), 2);

        assert!(dispatcher.remove_listener(&as_dyn));
        assert_eq!(dispatcher.listener_count(), 1);
        dispatcher.process_event(event, None, DispatchMode::Immediate);
        assert_eq!(listener.processed.load(Ordering::SeqCst), 3);

        assert!(dispatcher.remove_listener(&as_dyn));
        assert!(!dispatcher.remove_listener(&as_dyn));
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn uninstall_callback_and_event() {
        let dispatcher = EventDispatcher::new();
        let event = make_id(8, 0);
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = dispatcher.install_event_cb(event, recorder(&log, 1), None).unwrap();
        dispatcher.install_event_cb(event, recorder(&log, 2), None).unwrap();

        assert!(dispatcher.uninstall_event_cb(event, a));
        assert!(!dispatcher.uninstall_event_cb(event, a));
        assert!(!dispatcher.uninstall_event_cb(make_id(8, 1), a));
        assert_eq!(dispatcher.callback_count(event), 1);

        assert!(dispatcher.disable_event(event));
        assert!(dispatcher.uninstall_event(event));
        assert!(!dispatcher.uninstall_event(event));
        assert!(!dispatcher.has_event_node(event));

        // 重新安装后节点以启用状态重建
        dispatcher.install_event_cb(event, recorder(&log, 3), None).unwrap();
        dispatcher.process_event(event, None, DispatchMode::Immediate);
        assert_eq!(*log.lock(), vec![3]);
    }

    #[test]
    fn invalid_event_id_cannot_be_installed() {
        let dispatcher = EventDispatcher::new();
        let err = dispatcher
            .install_event_cb(INVALID_EVENT_ID, Arc::new(|_: &Event, _: Option<&Value>| true), None)
            .unwrap_err();
        assert_eq!(err.kind(), mle_util::MleErrorKind::Construction);
    }
}
