//! Error types for the coffee shop.

use thiserror::Error;

use crate::model::OrderStatus;

/// Errors that can occur while using the shop.
///
/// `InvalidKiosk` and `Closed` are ordinary control flow (a customer holding a
/// kiosk they already gave back, a customer arriving after closing time). The
/// `Option` returning APIs collapse them to `None`; the `try_` variants keep
/// them for callers that want to know which one happened.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShopError {
    /// The kiosk was released back to the pool and has not been re-acquired.
    #[error("Kiosk is not valid, acquire it from the shop first")]
    InvalidKiosk,

    /// The shop stopped taking orders.
    #[error("Shop is closed")]
    Closed,

    /// An order was asked to move to a state that does not follow its current one.
    #[error("Invalid order transition: {from:?} -> {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The shop configuration cannot produce a working shop.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A barista task ended abnormally.
    #[error("Barista task failed: {0}")]
    WorkerFailed(String),
}
