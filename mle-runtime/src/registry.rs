use crate::error::{RuntimeError, RuntimeResult};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tracing::debug;

type BoxAnySend = Box<dyn Any + Send>;

type FactoryFn = Arc<dyn Fn() -> BoxAnySend + Send + Sync>;

/// 按名称注册的类型化工厂
/// - 以名称为键，同时记录产物的 TypeId，在创建时校验类型
/// - 同名重复注册返回错误
#[derive(Default)]
pub struct FactoryRegistry {
    factories: DashMap<String, (TypeId, &'static str, FactoryFn)>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T, F>(&self, name: impl Into<String>, factory: F) -> RuntimeResult<()>
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let name = name.into();
        let f: FactoryFn = Arc::new(move || Box::new(factory()) as BoxAnySend);

        match self.factories.entry(name) {
            Entry::Occupied(entry) => Err(RuntimeError::AlreadyRegistered {
                name: entry.key().clone(),
                product: entry.get().1,
            }),
            Entry::Vacant(entry) => {
                debug!(name = %entry.key(), product = type_name::<T>(), "factory registered");
                entry.insert((TypeId::of::<T>(), type_name::<T>(), f));
                Ok(())
            }
        }
    }

    pub fn create<T>(&self, name: &str) -> RuntimeResult<T>
    where
        T: Send + 'static,
    {
        let Some((type_id, registered, f)) = self.factories.get(name).map(|e| e.value().clone())
        else {
            return Err(RuntimeError::FactoryNotFound(name.to_string()));
        };

        let mismatch = || RuntimeError::TypeMismatch {
            name: name.to_string(),
            expected: type_name::<T>(),
            registered,
        };
        if type_id != TypeId::of::<T>() {
            return Err(mismatch());
        }

        f().downcast::<T>().map(|b| *b).map_err(|_| mismatch())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    /// 已注册的名称（只读视图，顺序不保证）
    pub fn registered_names(&self) -> Vec<String> {
        self.factories.iter().map(|e| e.key().clone()).collect()
    }
}
