use crate::{
    bus::OrderEventBus,
    di::{DependenciesInject, DependenciesInjectDeps},
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub bus: Arc<OrderEventBus>,
    pub registry: Arc<Registry>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.di_container)
            .finish()
    }
}

impl AppState {
    pub fn new(pool: ConnectionPool) -> Result<Self> {
        let mut registry = Registry::default();
        let bus = Arc::new(OrderEventBus::new());

        let deps = DependenciesInjectDeps {
            pool,
            bus: bus.clone(),
        };

        let di_container = DependenciesInject::new(deps, &mut registry);

        Ok(Self {
            di_container,
            bus,
            registry: Arc::new(registry),
        })
    }

    /// Fully wired state backed by the in-memory store.
    pub fn new_in_memory() -> Self {
        let mut registry = Registry::default();
        let bus = Arc::new(OrderEventBus::new());

        let di_container = DependenciesInject::new_in_memory(bus.clone(), &mut registry);

        Self {
            di_container,
            bus,
            registry: Arc::new(registry),
        }
    }
}
