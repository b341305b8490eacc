//! Domain types and the ports the application layer drives.

pub mod nfc;
pub mod payment;
pub mod ports;
pub mod request;
pub mod response;
