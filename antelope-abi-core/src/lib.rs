//! # Antelope ABI Core
//!
//! Core types for the Antelope ABI codec: raw ABI documents, actions and
//! transactions, transaction configuration, and the error families.

pub mod abi;
pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub mod prelude {
    pub use crate::abi::RawAbi;
    pub use crate::config::TransactionConfig;
    pub use crate::error::{ChainError, CodecError, CodecResult, TransactionError};
    pub use crate::types::{
        Action, BlockInfo, ChainInfo, PermissionLevel, SignedTransaction, SigningContext,
        Transaction,
    };
}
