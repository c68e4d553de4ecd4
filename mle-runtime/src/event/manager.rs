//! 事件管理器（EventManager）
//!
//! 维护“复合事件标识 ↔ 可选名称”的注册表：
//! - 以有序映射按标识存储，便于按分组取得最大组内编号；
//! - 名称唯一，另有一张名称索引；
//! - 构造时预先注册系统分组的四个事件。
//!
use super::id::{self, make_id};
use mle_util::{MleError, MleResult};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct EventManager {
    registry: BTreeMap<i32, Option<String>>,
    names: HashMap<String, i32>,
}

impl Default for EventManager {
    fn default() -> Self {
        let mut manager = Self {
            registry: BTreeMap::new(),
            names: HashMap::new(),
        };
        for event in [id::PAINT, id::SIZE, id::RESIZE_PAINT, id::QUIT] {
            manager.registry.insert(event, None);
        }
        manager
    }
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册事件；已存在时不做任何事，名称与其他事件冲突时报错
    pub fn add_event(&mut self, event: i32, name: Option<&str>) -> MleResult<()> {
        if self.registry.contains_key(&event) {
            return Ok(());
        }

        let name = name.filter(|n| !n.is_empty());
        if let Some(name) = name {
            if self.names.contains_key(name) {
                return Err(MleError::duplicate("Named event already exists."));
            }
            self.names.insert(name.to_string(), event);
        }

        self.registry.insert(event, name.map(str::to_string));
        debug!(event, name = name.unwrap_or(""), "event registered");
        Ok(())
    }

    pub fn remove_event(&mut self, event: i32) -> bool {
        match self.registry.remove(&event) {
            Some(name) => {
                if let Some(name) = name {
                    self.names.remove(&name);
                }
                true
            }
            None => false,
        }
    }

    pub fn has_event(&self, event: i32) -> bool {
        self.registry.contains_key(&event)
    }

    pub fn has_event_by_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn event_id(&self, name: &str) -> Option<i32> {
        self.names.get(name).copied()
    }

    /// 事件名称；未注册或注册时未命名均返回 `None`
    pub fn event_name(&self, event: i32) -> Option<&str> {
        self.registry.get(&event)?.as_deref()
    }

    pub fn clear(&mut self) {
        self.registry.clear();
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// 按标识升序遍历已注册事件
    pub fn events(&self) -> impl Iterator<Item = (i32, Option<&str>)> {
        self.registry.iter().map(|(id, name)| (*id, name.as_deref()))
    }

    /// 计算分组内下一个未使用的标识（仅计算，不注册）
    ///
    /// 只考虑非负的组内编号；分组为空时从 0 开始。
    pub fn create_event(&self, group: i16) -> MleResult<i32> {
        let last = self
            .registry
            .range(make_id(group, 0)..=make_id(group, i16::MAX))
            .next_back()
            .map(|(cid, _)| id::local_id(*cid));

        match last {
            None => Ok(make_id(group, 0)),
            Some(i16::MAX) => Err(MleError::exhausted(format!(
                "event group {group} has no unused identifiers"
            ))),
            Some(local) => Ok(make_id(group, local + 1)),
        }
    }
}
