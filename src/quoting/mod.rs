pub mod engine;
pub mod types;

pub use engine::QuoteGateway;
pub use types::{GatewayError, PriceQuote};
