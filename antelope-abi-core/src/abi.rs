//! Raw ABI (Application Binary Interface) types.
//!
//! This is the JSON document returned by `get_abi` for a contract account,
//! kept exactly as declared. The codec normalizes it into a struct table
//! before anything is serialized against it.

use serde::{Deserialize, Serialize};

/// Top-level ABI of a contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAbi {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub types: Vec<AbiTypeDef>,
    #[serde(default)]
    pub structs: Vec<AbiStructDef>,
    #[serde(default)]
    pub actions: Vec<AbiActionDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<AbiTableDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ricardian_clauses: Vec<AbiClausePair>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_messages: Vec<AbiErrorMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abi_extensions: Vec<(u16, String)>,
    #[serde(default)]
    pub variants: Vec<AbiVariantDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_results: Vec<AbiActionResult>,
}

/// `types[]` entry: `new_type_name` is an alias of `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiTypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// `structs[]` entry. `base` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiStructDef {
    pub name: String,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub fields: Vec<AbiFieldDef>,
}

/// A field as declared, with its raw type string (`uint64`, `name[]`, `asset?`, `foo$`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiFieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// `actions[]` entry mapping an action name to the struct that carries its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiActionDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiTableDef {
    pub name: String,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiClausePair {
    pub id: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiErrorMessage {
    pub error_code: u64,
    pub error_msg: String,
}

/// `variants[]` entry: a tagged union over `types`, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiVariantDef {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiActionResult {
    pub name: String,
    pub result_type: String,
}

impl RawAbi {
    /// Parse an ABI document; sections missing from the JSON default to empty.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
