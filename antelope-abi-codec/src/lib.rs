//! ABI-driven binary codec for Antelope/EOSIO transactions.
//!
//! Provides:
//! - the primitive codec table (`name`, `asset`, varints, keys, ...)
//! - field type and struct inheritance resolution
//! - the ABI AST builder and a per-contract AST cache
//! - the recursive serializer producing action `hex_data`
//! - the transaction envelope builder (TaPoS header, body, signer digest)
//!
//! RPC transport, key custody and signing live behind the
//! [`cache::AbiProvider`], [`tx::ChainReader`], [`tx::Signer`] and
//! [`tx::TransactionPusher`] traits.

pub mod ast;
pub mod cache;
pub mod hex;
pub mod primitives;
pub mod resolve;
pub mod serialize;
pub mod tx;

pub use ast::{build_ast, Ast, ContractAst, StructEntry};
pub use cache::{AbiCache, AbiProvider};
pub use primitives::PrimitiveKind;
pub use resolve::{ResolvedField, ResolvedType, StructKind};
pub use serialize::{
    encode_instructions, resolve_actions, serialize, serialize_action, serialize_action_data,
    Context, SerializeInstruction,
};
pub use tx::{
    build_transaction, sign_transaction, submit_transaction, ChainReader, Signer,
    TransactionEnvelope, TransactionPusher,
};
