//! Gas supply contracts and active-contract resolution.

pub mod error;
pub mod service;
pub mod types;

pub use error::ContractError;
pub use service::ContractService;
pub use types::SupplyContract;
