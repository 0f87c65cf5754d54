//! Adapters Layer
//!
//! Inbound adapters are the hostable service kinds; outbound adapters
//! implement the directory and config-store ports.

pub mod inbound;
pub mod outbound;
