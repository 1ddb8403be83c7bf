use serde::{Deserialize, Serialize};
use shared::domain::responses::OrderResponse;
use shared::domain::status::OrderStatus;

/// Staff roles a terminal can be signed in as. The role only shapes what an
/// already-fetched order set shows; it grants no store-level rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Cashier,
    Kitchen,
    Staff,
    Manager,
    Admin,
}

/// The working view for a role: cashiers settle completed orders and see
/// only terminal ones; every other role works the active queue.
pub fn visible_orders<'a>(role: StaffRole, orders: &'a [OrderResponse]) -> Vec<&'a OrderResponse> {
    match role {
        StaffRole::Cashier => orders
            .iter()
            .filter(|order| order.status.is_terminal())
            .collect(),
        StaffRole::Kitchen | StaffRole::Staff | StaffRole::Manager | StaffRole::Admin => orders
            .iter()
            .filter(|order| !order.status.is_terminal())
            .collect(),
    }
}

/// Explicit history view: completed orders only, available to every role.
pub fn history_orders<'a>(orders: &'a [OrderResponse]) -> Vec<&'a OrderResponse> {
    orders
        .iter()
        .filter(|order| order.status.is_terminal())
        .collect()
}

/// Kanban-style workflow grouping. Exactly four buckets; `completed` is the
/// union of delivered and cancelled.
#[derive(Debug, Default)]
pub struct KanbanBoard<'a> {
    pub pending: Vec<&'a OrderResponse>,
    pub preparing: Vec<&'a OrderResponse>,
    pub ready: Vec<&'a OrderResponse>,
    pub completed: Vec<&'a OrderResponse>,
}

impl<'a> KanbanBoard<'a> {
    pub fn partition(orders: &'a [OrderResponse]) -> Self {
        let mut board = Self::default();

        for order in orders {
            match order.status {
                OrderStatus::Pending => board.pending.push(order),
                OrderStatus::Preparing => board.preparing.push(order),
                OrderStatus::Ready => board.ready.push(order),
                OrderStatus::Delivered | OrderStatus::Cancelled => board.completed.push(order),
            }
        }

        board
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.preparing.len() + self.ready.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
