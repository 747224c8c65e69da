//! ABI AST builder.
//!
//! Normalizes a raw ABI into a struct table keyed by type name. Aliases
//! (`types[]`) and variants (`variants[]`) become struct entries too, so
//! the serializer has one lookup for every non-primitive type.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use antelope_abi_core::abi::{AbiStructDef, RawAbi};
use antelope_abi_core::error::{CodecError, CodecResult};

use crate::resolve::{
    flatten_fields, parse_type_modifiers, resolve_field, ResolvedField, ResolvedType, StructKind,
};

/// One entry of the struct table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructEntry {
    pub name: String,
    pub kind: StructKind,
    /// Flattened fields in declaration order, base fields first.
    pub fields: Vec<ResolvedField>,
}

/// The struct table of one contract, built once per ABI fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAst {
    contract: String,
    structs: HashMap<String, StructEntry>,
    actions: HashMap<String, String>,
}

impl ContractAst {
    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructEntry> {
        self.structs.get(name)
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructEntry> {
        self.structs.values()
    }

    /// Struct type carrying the data of `action_name`.
    pub fn action_type(&self, action_name: &str) -> Option<&str> {
        self.actions.get(action_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

/// Build the struct table for `contract` from its raw ABI.
pub fn build_ast(contract: &str, abi: &RawAbi) -> CodecResult<ContractAst> {
    let mut table: HashMap<String, StructKind> = HashMap::new();
    let names = abi
        .structs
        .iter()
        .map(|s| (s.name.as_str(), StructKind::Plain))
        .chain(abi.types.iter().map(|t| (t.new_type_name.as_str(), StructKind::Alias)))
        .chain(abi.variants.iter().map(|v| (v.name.as_str(), StructKind::Variant)));
    for (name, kind) in names {
        if table.insert(name.to_string(), kind).is_some() {
            return Err(CodecError::malformed(format!("type '{}' is declared twice", name)));
        }
    }

    check_alias_cycles(abi)?;

    let plain: HashMap<&str, &AbiStructDef> =
        abi.structs.iter().map(|s| (s.name.as_str(), s)).collect();
    let mut structs = HashMap::with_capacity(table.len());

    for def in &abi.structs {
        let fields: Vec<ResolvedField> = flatten_fields(&def.name, &plain)?
            .into_iter()
            .map(|f| resolve_field(&f.name, &f.type_, &table))
            .collect();
        check_extensions_trail(&def.name, &fields)?;
        structs.insert(
            def.name.clone(),
            StructEntry {
                name: def.name.clone(),
                kind: StructKind::Plain,
                fields,
            },
        );
    }

    for alias in &abi.types {
        let field = resolve_field(&alias.new_type_name, &alias.type_, &table);
        structs.insert(
            alias.new_type_name.clone(),
            StructEntry {
                name: alias.new_type_name.clone(),
                kind: StructKind::Alias,
                fields: vec![field],
            },
        );
    }

    for variant in &abi.variants {
        let mut fields = Vec::with_capacity(variant.types.len());
        for member in &variant.types {
            let field = resolve_field(member, member, &table);
            if let ResolvedType::Unknown(missing) = &field.resolved {
                return Err(CodecError::malformed(format!(
                    "variant '{}' has unresolvable member '{}'",
                    variant.name, missing
                )));
            }
            fields.push(field);
        }
        structs.insert(
            variant.name.clone(),
            StructEntry {
                name: variant.name.clone(),
                kind: StructKind::Variant,
                fields,
            },
        );
    }

    let actions = abi
        .actions
        .iter()
        .map(|a| (a.name.clone(), a.type_.clone()))
        .collect();

    tracing::debug!(
        contract,
        structs = structs.len(),
        actions = abi.actions.len(),
        "built ABI AST"
    );

    Ok(ContractAst {
        contract: contract.to_string(),
        structs,
        actions,
    })
}

/// Binary extensions may only be followed by more binary extensions.
fn check_extensions_trail(struct_name: &str, fields: &[ResolvedField]) -> CodecResult<()> {
    let mut extension: Option<&str> = None;
    for field in fields {
        match extension {
            Some(ext) if !field.is_binary_extension => {
                return Err(CodecError::malformed(format!(
                    "struct '{}': field '{}' follows binary extension '{}'",
                    struct_name, field.name, ext
                )));
            }
            None if field.is_binary_extension => extension = Some(field.name.as_str()),
            _ => {}
        }
    }
    Ok(())
}

/// An alias whose target chain leads back to itself would recurse forever.
fn check_alias_cycles(abi: &RawAbi) -> CodecResult<()> {
    let targets: HashMap<&str, &str> = abi
        .types
        .iter()
        .map(|t| (t.new_type_name.as_str(), parse_type_modifiers(&t.type_).base))
        .collect();

    for start in targets.keys() {
        let mut seen = HashSet::new();
        let mut current = *start;
        while let Some(&next) = targets.get(current) {
            if !seen.insert(current) {
                return Err(CodecError::malformed(format!(
                    "type alias '{}' is cyclic",
                    start
                )));
            }
            current = next;
        }
    }
    Ok(())
}

/// Snapshot of several contracts' ASTs, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    contracts: HashMap<String, Arc<ContractAst>>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of `self` with `contract` added or replaced.
    pub fn with_contract(&self, contract: Arc<ContractAst>) -> Self {
        let mut contracts = self.contracts.clone();
        contracts.insert(contract.contract().to_string(), contract);
        Self { contracts }
    }

    pub fn contract(&self, name: &str) -> Option<&Arc<ContractAst>> {
        self.contracts.get(name)
    }

    pub fn contracts(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }
}

impl FromIterator<Arc<ContractAst>> for Ast {
    fn from_iter<I: IntoIterator<Item = Arc<ContractAst>>>(iter: I) -> Self {
        Self {
            contracts: iter
                .into_iter()
                .map(|c| (c.contract().to_string(), c))
                .collect(),
        }
    }
}
