pub mod order;

pub use self::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService};
