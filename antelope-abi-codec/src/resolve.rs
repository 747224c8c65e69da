//! Field type resolution and struct inheritance flattening.
//!
//! Both run once per ABI while the AST is built; the serializer only ever
//! sees their output.

use std::collections::{HashMap, HashSet};

use antelope_abi_core::abi::{AbiFieldDef, AbiStructDef};
use antelope_abi_core::error::{CodecError, CodecResult};

use crate::primitives::PrimitiveKind;

/// What a named entry of the struct table is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKind {
    /// `structs[]` entry
    Plain,
    /// `types[]` entry, a one-field struct that forwards its value
    Alias,
    /// `variants[]` entry, one synthesized field per member type
    Variant,
}

/// Base type of a field after modifiers are stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Primitive(PrimitiveKind),
    Struct(String),
    Unknown(String),
}

/// A field with its type string parsed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub base_type: String,
    pub resolved: ResolvedType,
    pub is_list: bool,
    pub is_optional: bool,
    pub is_variant: bool,
    pub is_binary_extension: bool,
}

/// A raw type string split into its base name and modifier flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeModifiers<'a> {
    pub base: &'a str,
    pub is_list: bool,
    pub is_optional: bool,
    pub is_binary_extension: bool,
}

/// Peel `[]`, `?` and `$` suffixes off a type string.
///
/// Suffixes are peeled from the end until none remain, so `asset[]?` and
/// `name[]$` resolve as well as the single-modifier forms.
pub fn parse_type_modifiers(raw: &str) -> TypeModifiers<'_> {
    let mut base = raw.trim();
    let mut mods = TypeModifiers {
        base,
        is_list: false,
        is_optional: false,
        is_binary_extension: false,
    };
    loop {
        if let Some(rest) = base.strip_suffix("[]") {
            mods.is_list = true;
            base = rest;
        } else if let Some(rest) = base.strip_suffix('?') {
            mods.is_optional = true;
            base = rest;
        } else if let Some(rest) = base.strip_suffix('$') {
            mods.is_binary_extension = true;
            base = rest;
        } else {
            break;
        }
    }
    mods.base = base;
    mods
}

/// Resolve a base name: struct table first, then the primitive table.
pub fn resolve_base(base: &str, table: &HashMap<String, StructKind>) -> ResolvedType {
    if table.contains_key(base) {
        ResolvedType::Struct(base.to_string())
    } else if let Some(kind) = PrimitiveKind::from_name(base) {
        ResolvedType::Primitive(kind)
    } else {
        ResolvedType::Unknown(base.to_string())
    }
}

/// Parse and resolve one declared field.
pub fn resolve_field(
    name: &str,
    raw_type: &str,
    table: &HashMap<String, StructKind>,
) -> ResolvedField {
    let mods = parse_type_modifiers(raw_type);
    let resolved = resolve_base(mods.base, table);
    let is_variant = matches!(table.get(mods.base), Some(StructKind::Variant));
    ResolvedField {
        name: name.to_string(),
        base_type: mods.base.to_string(),
        resolved,
        is_list: mods.is_list,
        is_optional: mods.is_optional,
        is_variant,
        is_binary_extension: mods.is_binary_extension,
    }
}

/// Flatten a struct's base chain: `fields(base(S)) ++ own_fields(S)`.
///
/// A base missing from `structs` or a chain that revisits a struct is a
/// `MalformedAbi` error.
pub fn flatten_fields<'a>(
    name: &str,
    structs: &HashMap<&'a str, &'a AbiStructDef>,
) -> CodecResult<Vec<&'a AbiFieldDef>> {
    let mut chain: Vec<&'a AbiStructDef> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let mut current = *structs
        .get(name)
        .ok_or_else(|| CodecError::malformed(format!("struct '{}' is not declared", name)))?;
    loop {
        if !seen.insert(current.name.as_str()) {
            return Err(CodecError::malformed(format!(
                "struct '{}' has a cyclic base chain through '{}'",
                name, current.name
            )));
        }
        chain.push(current);
        if current.base.is_empty() {
            break;
        }
        current = *structs.get(current.base.as_str()).ok_or_else(|| {
            CodecError::malformed(format!(
                "struct '{}' has unknown base '{}'",
                current.name, current.base
            ))
        })?;
    }

    Ok(chain
        .into_iter()
        .rev()
        .flat_map(|def| def.fields.iter())
        .collect())
}
