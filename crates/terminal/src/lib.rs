//! Staff-terminal client library: a local order cache that stays in sync
//! with the store through change signals and wholesale refetches, plus the
//! role-based view shaping each screen applies on top of it.

pub mod client;
pub mod roles;

pub use self::client::{LIST_TIMEOUT, OrderTerminal};
pub use self::roles::{KanbanBoard, StaffRole};
