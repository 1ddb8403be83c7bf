use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Which order stream an order belongs to. Food and bar queues are kept
/// logically separate though structurally identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderChannel {
    Food,
    Bar,
}

impl OrderChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderChannel::Food => "food",
            OrderChannel::Bar => "bar",
        }
    }
}

impl fmt::Display for OrderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(OrderChannel::Food),
            "bar" => Ok(OrderChannel::Bar),
            other => Err(format!("unknown order channel: {other}")),
        }
    }
}

/// Preparation lifecycle of an order.
///
/// The canonical workflow is strictly forward, one step at a time:
/// `pending -> preparing -> ready -> delivered`. Cancellation is reachable
/// from any non-terminal state. `delivered` and `cancelled` are terminal;
/// nothing transitions out of them. Re-applying the current status is a
/// legal no-op everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The completed set history views and bulk deletion operate on.
    pub const TERMINAL: [OrderStatus; 2] = [OrderStatus::Delivered, OrderStatus::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// `self == next` is legal (idempotent re-application); the caller
    /// decides whether to treat it as a write or a no-op.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Preparing)
                | (OrderStatus::Preparing, OrderStatus::Ready)
                | (OrderStatus::Ready, OrderStatus::Delivered)
                | (
                    OrderStatus::Pending | OrderStatus::Preparing | OrderStatus::Ready,
                    OrderStatus::Cancelled,
                )
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use OrderStatus::*;

    #[test]
    fn forward_walk_is_legal() {
        assert!(Pending.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Delivered));
    }

    #[test]
    fn skipping_steps_is_illegal() {
        assert!(!Pending.can_transition_to(Ready));
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Preparing.can_transition_to(Delivered));
    }

    #[test]
    fn backward_steps_are_illegal() {
        assert!(!Preparing.can_transition_to(Pending));
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Ready.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Ready));
    }

    #[test]
    fn cancel_reachable_from_non_terminal_only() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Preparing.can_transition_to(Cancelled));
        assert!(Ready.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_admit_nothing_new() {
        for terminal in OrderStatus::TERMINAL {
            for next in OrderStatus::ALL {
                if next != terminal {
                    assert!(
                        !terminal.can_transition_to(next),
                        "{terminal} -> {next} should be illegal"
                    );
                }
            }
        }
    }

    #[test]
    fn same_status_is_always_legal() {
        for status in OrderStatus::ALL {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn terminal_set_matches_predicate() {
        for status in OrderStatus::ALL {
            assert_eq!(
                status.is_terminal(),
                OrderStatus::TERMINAL.contains(&status)
            );
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!("archived".parse::<OrderStatus>().is_err());
    }
}
