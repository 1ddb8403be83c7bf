mod order;

pub use self::order::{
    BulkDeleteHistoryRequest, CreateOrderItemRecordRequest, CreateOrderItemRequest,
    CreateOrderRecordRequest, CreateOrderRequest, ListOrders, SortOrder,
    UpdateOrderStatusRequest, UpdatePaymentStatusRequest,
};
