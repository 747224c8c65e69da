//! # Antelope ABI
//!
//! Describe contract actions as JSON, get back the exact transaction bytes
//! an Antelope chain expects, TaPoS header included.

// Re-export core types
pub use antelope_abi_core::*;

// Re-export the codec
pub use antelope_abi_codec::{
    ast, build_ast, build_transaction, cache, encode_instructions, primitives, resolve,
    resolve_actions, serialize, serialize_action, serialize_action_data, sign_transaction,
    submit_transaction, tx, AbiCache, AbiProvider, Ast, ChainReader, Context, ContractAst,
    PrimitiveKind, SerializeInstruction, Signer, TransactionEnvelope, TransactionPusher,
};

pub mod prelude {
    pub use antelope_abi_codec::{
        build_ast, build_transaction, serialize_action, serialize_action_data, AbiCache,
        AbiProvider, Ast, ChainReader, ContractAst, Signer, TransactionEnvelope,
        TransactionPusher,
    };
    pub use antelope_abi_core::prelude::*;
}
