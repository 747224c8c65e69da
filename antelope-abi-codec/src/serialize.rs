//! Recursive serializer: walks caller data against the AST.
//!
//! The walk produces an ordered list of [`SerializeInstruction`]s, each a
//! single primitive emission. Encoding those instructions in order gives
//! the wire bytes. Everything here is synchronous.

use antelope_abi_core::error::{CodecError, CodecResult};
use antelope_abi_core::types::Action;
use serde_json::Value;

use crate::ast::{Ast, ContractAst, StructEntry};
use crate::hex::hex_encode;
use crate::primitives::{self, PrimitiveKind};
use crate::resolve::{ResolvedField, ResolvedType, StructKind};

/// One primitive emission.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializeInstruction {
    pub kind: PrimitiveKind,
    pub value: Value,
}

impl SerializeInstruction {
    pub fn new(kind: PrimitiveKind, value: Value) -> Self {
        Self { kind, value }
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) -> CodecResult<()> {
        primitives::encode_into(self.kind, &self.value, out)
    }

    pub fn to_hex(&self) -> CodecResult<String> {
        primitives::encode_hex(self.kind, &self.value)
    }
}

/// The contract being serialized and its struct table, passed down every
/// recursive call.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub contract: &'a str,
    pub ast: &'a ContractAst,
}

impl<'a> Context<'a> {
    pub fn new(ast: &'a ContractAst) -> Self {
        Self {
            contract: ast.contract(),
            ast,
        }
    }

    fn lookup(&self, name: &str) -> CodecResult<&'a StructEntry> {
        self.ast
            .get_struct(name)
            .ok_or_else(|| CodecError::unknown_type(name))
    }
}

/// Serialize `data` as the struct (or alias/variant) named `type_name`.
pub fn serialize(
    ctx: &Context<'_>,
    type_name: &str,
    data: &Value,
) -> CodecResult<Vec<SerializeInstruction>> {
    let entry = ctx.lookup(type_name)?;
    let mut out = Vec::new();
    emit_struct(ctx, entry, data, &mut out)?;
    Ok(out)
}

/// Serialize `data` against an explicit field list, in list order.
pub fn serialize_fields(
    ctx: &Context<'_>,
    struct_name: &str,
    fields: &[ResolvedField],
    data: &Value,
) -> CodecResult<Vec<SerializeInstruction>> {
    let obj = expect_object(struct_name, data)?;
    let mut out = Vec::new();
    emit_fields(ctx, struct_name, fields, obj, &mut out)?;
    Ok(out)
}

/// Concatenate the encodings of `instructions`.
pub fn encode_instructions(instructions: &[SerializeInstruction]) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    for instruction in instructions {
        instruction.encode_into(&mut out)?;
    }
    Ok(out)
}

/// Serialize action data of type `action_type` and return it as hex.
pub fn serialize_action(ast: &ContractAst, action_type: &str, data: &Value) -> CodecResult<String> {
    let ctx = Context::new(ast);
    let instructions = serialize(&ctx, action_type, data)?;
    let bytes = encode_instructions(&instructions)?;
    tracing::debug!(
        contract = ctx.contract,
        action_type,
        instructions = instructions.len(),
        bytes = bytes.len(),
        "serialized action data"
    );
    Ok(hex_encode(&bytes))
}

/// Fill `hex_data` from `data` using the action's ABI entry. Actions that
/// already carry `hex_data` are returned unchanged.
pub fn serialize_action_data(ast: &ContractAst, action: &Action) -> CodecResult<Action> {
    if action.hex_data.is_some() {
        return Ok(action.clone());
    }
    let action_type = ast
        .action_type(&action.name)
        .ok_or_else(|| CodecError::unknown_type(format!("{}::{}", action.account, action.name)))?;
    let hex_data = serialize_action(ast, action_type, &action.data)?;
    Ok(Action {
        hex_data: Some(hex_data),
        ..action.clone()
    })
}

/// [`serialize_action_data`] for each action, picking the contract by `account`.
pub fn resolve_actions(ast: &Ast, actions: &[Action]) -> CodecResult<Vec<Action>> {
    actions
        .iter()
        .map(|action| {
            if action.hex_data.is_some() {
                return Ok(action.clone());
            }
            let contract = ast.contract(&action.account).ok_or_else(|| {
                CodecError::malformed(format!("no ABI loaded for contract '{}'", action.account))
            })?;
            serialize_action_data(contract, action)
        })
        .collect()
}

fn expect_object<'v>(
    type_name: &str,
    data: &'v Value,
) -> CodecResult<&'v serde_json::Map<String, Value>> {
    data.as_object().ok_or_else(|| {
        CodecError::format(type_name, format!("expected an object, got {}", data))
    })
}

fn emit_struct(
    ctx: &Context<'_>,
    entry: &StructEntry,
    data: &Value,
    out: &mut Vec<SerializeInstruction>,
) -> CodecResult<()> {
    match entry.kind {
        StructKind::Plain => {
            let obj = expect_object(&entry.name, data)?;
            emit_fields(ctx, &entry.name, &entry.fields, obj, out)
        }
        StructKind::Alias => {
            let target = entry.fields.first().ok_or_else(|| {
                CodecError::malformed(format!("alias '{}' has no target", entry.name))
            })?;
            emit_field(ctx, &entry.name, target, Some(data), out)
        }
        StructKind::Variant => emit_variant(ctx, entry, data, out),
    }
}

/// Fields in declaration order. Once a binary extension is left out, no
/// later extension may carry a value: its bytes would decode as the
/// skipped field.
fn emit_fields(
    ctx: &Context<'_>,
    struct_name: &str,
    fields: &[ResolvedField],
    obj: &serde_json::Map<String, Value>,
    out: &mut Vec<SerializeInstruction>,
) -> CodecResult<()> {
    let mut skipped_extension: Option<&str> = None;
    for field in fields {
        let value = obj.get(&field.name);
        if field.is_binary_extension {
            match (present(value), skipped_extension) {
                (None, None) => skipped_extension = Some(field.name.as_str()),
                (Some(_), Some(skipped)) => {
                    return Err(CodecError::format(
                        struct_name,
                        format!(
                            "binary extension '{}' is set but earlier extension '{}' is not",
                            field.name, skipped
                        ),
                    ))
                }
                _ => {}
            }
        }
        emit_field(ctx, struct_name, field, value, out)?;
    }
    Ok(())
}

/// Index of the single populated member, then that member's value.
fn emit_variant(
    ctx: &Context<'_>,
    entry: &StructEntry,
    data: &Value,
    out: &mut Vec<SerializeInstruction>,
) -> CodecResult<()> {
    let obj = expect_object(&entry.name, data)?;
    let populated: Vec<(usize, &ResolvedField, &Value)> = entry
        .fields
        .iter()
        .enumerate()
        .filter_map(|(i, f)| present(obj.get(&f.name)).map(|v| (i, f, v)))
        .collect();

    match populated.as_slice() {
        [] => Ok(()),
        [(index, field, value)] => {
            out.push(SerializeInstruction::new(
                PrimitiveKind::VarUint32,
                Value::from(*index as u64),
            ));
            emit_present(ctx, field, value, out)
        }
        many => Err(CodecError::AmbiguousVariant {
            variant: entry.name.clone(),
            populated: many.iter().map(|(_, f, _)| f.name.clone()).collect(),
        }),
    }
}

fn emit_field(
    ctx: &Context<'_>,
    struct_name: &str,
    field: &ResolvedField,
    value: Option<&Value>,
    out: &mut Vec<SerializeInstruction>,
) -> CodecResult<()> {
    let value = present(value);

    // Trailing extension: no presence flag, nothing at all when absent.
    if field.is_binary_extension {
        return match value {
            Some(v) => emit_present(ctx, field, v, out),
            None => Ok(()),
        };
    }

    if field.is_optional {
        out.push(SerializeInstruction::new(
            PrimitiveKind::Bool,
            Value::Bool(value.is_some()),
        ));
        return match value {
            Some(v) => emit_present(ctx, field, v, out),
            None => Ok(()),
        };
    }

    let v = value.ok_or_else(|| CodecError::missing(struct_name, &field.name))?;
    emit_present(ctx, field, v, out)
}

fn emit_present(
    ctx: &Context<'_>,
    field: &ResolvedField,
    value: &Value,
    out: &mut Vec<SerializeInstruction>,
) -> CodecResult<()> {
    if !field.is_list {
        return emit_value(ctx, &field.resolved, value, out);
    }

    let items = value.as_array().ok_or_else(|| {
        CodecError::format(
            &field.base_type,
            format!("list field '{}' expects an array, got {}", field.name, value),
        )
    })?;
    out.push(SerializeInstruction::new(
        PrimitiveKind::VarUint32,
        Value::from(items.len() as u64),
    ));
    for item in items {
        emit_value(ctx, &field.resolved, item, out)?;
    }
    Ok(())
}

fn emit_value(
    ctx: &Context<'_>,
    ty: &ResolvedType,
    value: &Value,
    out: &mut Vec<SerializeInstruction>,
) -> CodecResult<()> {
    match ty {
        ResolvedType::Primitive(kind) => {
            out.push(SerializeInstruction::new(*kind, value.clone()));
            Ok(())
        }
        ResolvedType::Struct(name) => {
            let entry = ctx.lookup(name)?;
            emit_struct(ctx, entry, value, out)
        }
        ResolvedType::Unknown(name) => Err(CodecError::unknown_type(name)),
    }
}

/// JSON `null` counts as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
