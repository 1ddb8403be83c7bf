use shared::domain::responses::OrderResponse;
use shared::domain::status::OrderStatus;

/// Fixed guest-facing message for a status the guest should hear about.
/// `pending` returns `None`: orders start silently.
pub fn compose(status: OrderStatus, order: &OrderResponse) -> Option<String> {
    let guest = order.guest_name.as_str();

    match status {
        OrderStatus::Pending => None,
        OrderStatus::Preparing => Some(format!(
            "Hi {guest}, we have started preparing your order."
        )),
        OrderStatus::Ready => Some(format!(
            "Hi {guest}, your order is ready and on its way to {}.",
            order.locator
        )),
        OrderStatus::Delivered => Some(format!(
            "Hi {guest}, your order has been delivered. Enjoy!"
        )),
        OrderStatus::Cancelled => Some(format!(
            "Hi {guest}, your order was cancelled. Please contact reception if this is unexpected."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::status::{OrderChannel, PaymentStatus};
    use uuid::Uuid;

    fn order() -> OrderResponse {
        OrderResponse {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            channel: OrderChannel::Food,
            guest_name: "Ada".into(),
            locator: "Room 12".into(),
            guest_phone: Some("+355001122".into()),
            status: OrderStatus::Ready,
            total_amount: 130,
            notes: None,
            payment_method: None,
            payment_status: PaymentStatus::Pending,
            created_at: "2024-01-01 12:00:00".into(),
            updated_at: "2024-01-01 12:05:00".into(),
            items: vec![],
        }
    }

    #[test]
    fn pending_never_notifies() {
        assert!(compose(OrderStatus::Pending, &order()).is_none());
    }

    #[test]
    fn every_other_status_has_a_message() {
        let order = order();
        for status in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let message = compose(status, &order).unwrap();
            assert!(message.contains("Ada"), "{status} message should greet the guest");
        }
    }

    #[test]
    fn ready_message_names_the_locator() {
        let message = compose(OrderStatus::Ready, &order()).unwrap();
        assert!(message.contains("Room 12"));
    }
}
