//! 事件子系统（event）
//!
//! - `id`：复合事件标识的打包/拆包与系统事件常量；
//! - `EventManager`：事件标识与名称的注册表；
//! - `EventDispatcher`：回调安装、立即/延迟派发与监听器；
//! - `PropChangeSupport`：属性变更通知。
//!
pub mod callback;
pub mod dispatcher;
pub mod id;
pub mod listener;
pub mod manager;
pub mod prop_change;
pub mod types;

pub use callback::{CallbackId, EventCallback};
pub use dispatcher::{DispatcherConfig, EventDispatcher};
pub use id::{INVALID_EVENT_ID, group_id, local_id, make_id};
pub use listener::EventListener;
pub use manager::EventManager;
pub use prop_change::{PropChangeEvent, PropChangeListener, PropChangeSupport};
pub use types::{DispatchMode, Event};
