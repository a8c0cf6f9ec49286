//! Application layer: use-case handlers over the ports.

mod apply_payment_event;

pub use apply_payment_event::{ApplyOutcome, ApplyPaymentEventHandler};
