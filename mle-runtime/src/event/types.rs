use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 派发方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchMode {
    /// 立即同步派发
    Immediate,
    /// 进入延迟队列，待 `dispatch_events` 批量派发
    #[default]
    Delayed,
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Immediate => f.write_str("IMMEDIATE"),
            DispatchMode::Delayed => f.write_str("DELAYED"),
        }
    }
}

/// 一次事件发生：复合标识、派发方式与调用数据
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: i32,
    #[builder(default)]
    mode: DispatchMode,
    call_data: Option<Value>,
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
}

impl Event {
    pub fn new(id: i32, mode: DispatchMode, call_data: Option<Value>) -> Self {
        Self {
            id,
            mode,
            call_data,
            occurred_at: Utc::now(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn call_data(&self) -> Option<&Value> {
        self.call_data.as_ref()
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MleEvent: id={} : type={}", self.id, self.mode)
    }
}
