mod command;
mod query;

pub use self::command::OrderCommandRepository;
pub use self::query::{OrderItemQueryRepository, OrderQueryRepository};
