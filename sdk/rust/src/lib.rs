//! Client SDK for the stock quote gateway.

pub mod client;

pub use client::{GatewayClient, PriceQuote, SdkError};
