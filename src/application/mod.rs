//! Application layer: request routing and the services behind each channel.
//!
//! `RequestRouter` is the entry point for the application shell. NFC calls
//! are parked in the `NfcDispatcher` until their out-of-process completion
//! arrives; payment calls are answered by the `PaymentGateway` directly.

pub mod bridge;
pub mod channels;
pub mod nfc_dispatcher;
pub mod payment_gateway;
pub mod router;
pub mod txn_id;
