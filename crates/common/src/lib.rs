//! Types shared across the checkout services.
//!
//! Everything here is wire vocabulary: identifiers, status enums and the
//! priced cart snapshot the services exchange over HTTP. Service-local
//! models live in the service crates.

pub mod cart;
pub mod ids;
pub mod shutdown;
pub mod status;

pub use cart::{CartLine, CartSnapshot};
pub use ids::{OrderId, PaymentId, ProductId, TransactionId, UserId};
pub use shutdown::shutdown_signal;
pub use status::{OrderStatus, ParseStatusError, PaymentStatus, PaymentStatusUpdate};
