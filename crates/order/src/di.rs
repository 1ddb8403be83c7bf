use crate::{
    abstract_trait::order::{
        repository::{
            DynOrderCommandRepository, DynOrderItemQueryRepository, DynOrderQueryRepository,
        },
        service::{DynOrderCommandService, DynOrderQueryService},
    },
    bus::OrderEventBus,
    repository::{
        memory::MemoryOrderRepository,
        postgres::{OrderCommandRepository, OrderItemQueryRepository, OrderQueryRepository},
    },
    service::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService},
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_command: DynOrderCommandService,
    pub order_query: DynOrderQueryService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_command", &"OrderCommandService")
            .field("order_query", &"OrderQueryService")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub bus: Arc<OrderEventBus>,
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps { pool, bus } = deps;

        let query_repo: DynOrderQueryRepository =
            Arc::new(OrderQueryRepository::new(pool.clone()));
        let command_repo: DynOrderCommandRepository =
            Arc::new(OrderCommandRepository::new(pool.clone()));
        let item_query_repo: DynOrderItemQueryRepository =
            Arc::new(OrderItemQueryRepository::new(pool));

        Self::from_repositories(query_repo, command_repo, item_query_repo, bus, registry)
    }

    /// Wire every service against the in-memory store. Used by the test
    /// suites and embedded deployments that run without Postgres.
    pub fn new_in_memory(bus: Arc<OrderEventBus>, registry: &mut Registry) -> Self {
        let repo = MemoryOrderRepository::new();

        let query_repo: DynOrderQueryRepository = Arc::new(repo.clone());
        let command_repo: DynOrderCommandRepository = Arc::new(repo.clone());
        let item_query_repo: DynOrderItemQueryRepository = Arc::new(repo);

        Self::from_repositories(query_repo, command_repo, item_query_repo, bus, registry)
    }

    fn from_repositories(
        query_repo: DynOrderQueryRepository,
        command_repo: DynOrderCommandRepository,
        item_query_repo: DynOrderItemQueryRepository,
        bus: Arc<OrderEventBus>,
        registry: &mut Registry,
    ) -> Self {
        let order_query: DynOrderQueryService = Arc::new(OrderQueryService::new(
            query_repo.clone(),
            item_query_repo.clone(),
            registry,
        ));

        let command_deps = OrderCommandServiceDeps {
            command: command_repo,
            query: query_repo,
            item_query: item_query_repo,
            bus,
        };

        let order_command: DynOrderCommandService =
            Arc::new(OrderCommandService::new(command_deps, registry));

        Self {
            order_command,
            order_query,
        }
    }
}
