//! Transaction-level data model shared by the codec and its callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An `{actor, permission}` pair authorizing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub actor: String,
    pub permission: String,
}

impl PermissionLevel {
    pub fn new(actor: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            permission: permission.into(),
        }
    }
}

/// A contract action.
///
/// `data` is the structured payload; `hex_data` is its serialized form.
/// The envelope builder only reads `hex_data`, so an action built from
/// `data` alone has to be resolved against its contract's ABI first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub account: String,
    pub name: String,
    pub authorization: Vec<PermissionLevel>,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_data: Option<String>,
}

impl Action {
    /// Action with structured data, not yet serialized.
    pub fn new(
        account: impl Into<String>,
        name: impl Into<String>,
        authorization: Vec<PermissionLevel>,
        data: Value,
    ) -> Self {
        Self {
            account: account.into(),
            name: name.into(),
            authorization,
            data,
            hex_data: None,
        }
    }

    /// Action whose data is already serialized.
    pub fn with_hex_data(
        account: impl Into<String>,
        name: impl Into<String>,
        authorization: Vec<PermissionLevel>,
        hex_data: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            name: name.into(),
            authorization,
            data: Value::Null,
            hex_data: Some(hex_data.into()),
        }
    }
}

/// The JSON view of an assembled transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Seconds since the Unix epoch.
    pub expiration: u32,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub max_net_usage_words: u32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: u32,
    pub context_free_actions: Vec<Action>,
    pub actions: Vec<Action>,
    pub transaction_extensions: Vec<(u16, String)>,
}

/// Subset of `get_info` the envelope builder needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// 32-byte chain id, hex.
    pub chain_id: String,
    pub head_block_num: u32,
}

/// Subset of `get_block` the envelope builder needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// `YYYY-MM-DDTHH:MM:SS.sss`, UTC without a zone suffix.
    pub timestamp: String,
    pub block_num: u32,
    pub ref_block_prefix: u32,
}

/// What a signer gets alongside the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningContext {
    pub chain_id: String,
    #[serde(default)]
    pub required_keys: Vec<String>,
}

/// Signed transaction in the shape `push_transaction` expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub signatures: Vec<String>,
    pub compression: String,
    pub packed_context_free_data: String,
    pub packed_trx: String,
}
