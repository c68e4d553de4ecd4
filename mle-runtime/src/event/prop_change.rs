//! 属性变更通知
//!
//! 对象模型层在属性被修改时构造 `PropChangeEvent`，
//! 经 `PropChangeSupport` 通知所有已注册的 `PropChangeListener`。
//!
use mle_util::{MleError, MleResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropChangeEvent {
    source: String,
    name: String,
    old_value: Value,
    new_value: Value,
}

impl PropChangeEvent {
    /// 属性名不能为空
    pub fn new(
        source: impl Into<String>,
        name: impl Into<String>,
        old_value: Value,
        new_value: Value,
    ) -> MleResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(MleError::invalid_argument("property name must not be empty"));
        }
        Ok(Self {
            source: source.into(),
            name,
            old_value,
            new_value,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn property_name(&self) -> &str {
        &self.name
    }

    pub fn old_value(&self) -> &Value {
        &self.old_value
    }

    pub fn new_value(&self) -> &Value {
        &self.new_value
    }

    pub fn is_changed(&self) -> bool {
        self.old_value != self.new_value
    }
}

pub trait PropChangeListener: Send + Sync {
    fn prop_changed(&self, event: &PropChangeEvent);
}

/// 属性变更监听器注册表
#[derive(Default)]
pub struct PropChangeSupport {
    listeners: RwLock<Vec<Arc<dyn PropChangeListener>>>,
}

impl PropChangeSupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn PropChangeListener>) {
        self.listeners.write().push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn PropChangeListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)));
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// 通知全部监听器，新旧值相同则跳过；返回被通知的数量
    pub fn fire(&self, event: &PropChangeEvent) -> usize {
        if !event.is_changed() {
            return 0;
        }
        let listeners = self.listeners.read().clone();
        for listener in &listeners {
            listener.prop_changed(event);
        }
        trace!(property = event.property_name(), notified = listeners.len(), "property change fired");
        listeners.len()
    }
}
