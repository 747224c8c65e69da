//! Transaction envelope: TaPoS header, action body, signer pre-image.

use antelope_abi_core::config::TransactionConfig;
use antelope_abi_core::error::{ChainError, CodecError, CodecResult, TransactionError};
use antelope_abi_core::types::{
    Action, BlockInfo, ChainInfo, SignedTransaction, SigningContext, Transaction,
};
use antelope_abi_core::validation::validate_transaction_config;
use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::hex::{decode_fixed, hex_decode, hex_encode};
use crate::primitives::name::encode_name;
use crate::primitives::number::write_varuint32;
use crate::primitives::time::parse_timestamp_millis;

/// Zero digest standing in for absent context-free data.
pub const CONTEXT_FREE_DATA_DIGEST: [u8; 32] = [0u8; 32];

/// Chain reads the builder depends on (`get_info`, `get_block`).
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn get_info(&self) -> Result<ChainInfo, ChainError>;
    async fn get_block(&self, block_num_or_id: &str) -> Result<BlockInfo, ChainError>;
}

/// Signs a SHA-256 digest. Key material never reaches this crate.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(
        &self,
        digest: [u8; 32],
        context: &SigningContext,
    ) -> Result<Vec<String>, ChainError>;
}

/// Broadcasts a signed transaction (`push_transaction`).
#[async_trait]
pub trait TransactionPusher: Send + Sync {
    async fn push_transaction(&self, transaction: &SignedTransaction) -> Result<Value, ChainError>;
}

/// Output of [`build_transaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEnvelope {
    pub chain_id: [u8; 32],
    pub transaction_header: Vec<u8>,
    /// Context-free actions, actions and extensions, as pushed after the header.
    pub transaction_body: Vec<u8>,
    pub transaction: Transaction,
}

impl TransactionEnvelope {
    pub fn chain_id_hex(&self) -> String {
        hex_encode(&self.chain_id)
    }

    /// Header followed by body, the `packed_trx` of a push.
    pub fn packed_trx(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.transaction_header.len() + self.transaction_body.len());
        out.extend_from_slice(&self.transaction_header);
        out.extend_from_slice(&self.transaction_body);
        out
    }

    /// `chain_id ++ header ++ body ++ 32 zero bytes`.
    pub fn signing_preimage(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            32 + self.transaction_header.len() + self.transaction_body.len() + 32,
        );
        out.extend_from_slice(&self.chain_id);
        out.extend_from_slice(&self.transaction_header);
        out.extend_from_slice(&self.transaction_body);
        out.extend_from_slice(&CONTEXT_FREE_DATA_DIGEST);
        out
    }

    pub fn signing_digest(&self) -> [u8; 32] {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(self.signing_preimage()));
        digest
    }
}

/// `varuint32(count)` then, per action: account, name, authorizations, data.
pub fn serialize_actions(actions: &[Action]) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    write_count(&mut out, "actions", actions.len())?;
    for action in actions {
        encode_name(&mut out, &action.account)?;
        encode_name(&mut out, &action.name)?;
        write_count(&mut out, "authorization", action.authorization.len())?;
        for level in &action.authorization {
            encode_name(&mut out, &level.actor)?;
            encode_name(&mut out, &level.permission)?;
        }
        let hex_data = action.hex_data.as_deref().ok_or_else(|| {
            CodecError::missing(format!("action {}::{}", action.account, action.name), "hex_data")
        })?;
        let data = hex_decode("hex_data", hex_data)?;
        write_count(&mut out, "hex_data", data.len())?;
        out.extend_from_slice(&data);
    }
    Ok(out)
}

/// `varuint32(count)` then `uint16 type + bytes data` per extension.
pub fn serialize_extensions(extensions: &[(u16, String)]) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    write_count(&mut out, "transaction_extensions", extensions.len())?;
    for (ext_type, data) in extensions {
        out.extend_from_slice(&ext_type.to_le_bytes());
        let data = hex_decode("transaction_extensions", data)?;
        write_count(&mut out, "transaction_extensions", data.len())?;
        out.extend_from_slice(&data);
    }
    Ok(out)
}

/// The TaPoS header.
pub fn transaction_header(
    expiration: u32,
    ref_block_num: u16,
    ref_block_prefix: u32,
    max_net_usage_words: u32,
    max_cpu_usage_ms: u8,
    delay_sec: u32,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    out.extend_from_slice(&expiration.to_le_bytes());
    out.extend_from_slice(&ref_block_num.to_le_bytes());
    out.extend_from_slice(&ref_block_prefix.to_le_bytes());
    write_varuint32(&mut out, max_net_usage_words);
    out.push(max_cpu_usage_ms);
    write_varuint32(&mut out, delay_sec);
    out
}

pub fn transaction_body(
    context_free_actions: &[Action],
    actions: &[Action],
    extensions: &[(u16, String)],
) -> CodecResult<Vec<u8>> {
    let mut out = serialize_actions(context_free_actions)?;
    out.extend(serialize_actions(actions)?);
    out.extend(serialize_extensions(extensions)?);
    Ok(out)
}

/// Assemble header and body for `actions`, reading TaPoS data from `reader`.
///
/// The configuration is validated before the first chain read. The two
/// reads are sequential: the reference block number comes from `get_info`.
pub async fn build_transaction<R>(
    actions: Vec<Action>,
    context_free_actions: Vec<Action>,
    config: &TransactionConfig,
    reader: &R,
) -> Result<TransactionEnvelope, TransactionError>
where
    R: ChainReader + ?Sized,
{
    validate_transaction_config(config)?;
    let max_net_usage_words = narrow_u32("max_net_usage_words", config.max_net_usage_words)?;
    let max_cpu_usage_ms = u8::try_from(config.max_cpu_usage_ms)
        .map_err(|_| {
            CodecError::range("max_cpu_usage_ms", config.max_cpu_usage_ms, "must fit in uint8")
        })?;
    let delay_sec = narrow_u32("delay_sec", config.delay_sec)?;

    // Encode before touching the network so bad data fails fast.
    let transaction_extensions: Vec<(u16, String)> = Vec::new();
    let transaction_body =
        transaction_body(&context_free_actions, &actions, &transaction_extensions)?;

    let info = reader.get_info().await?;
    let chain_id = decode_fixed::<32>("chain_id", &info.chain_id).map_err(|e| {
        ChainError::InvalidResponse {
            message: e.to_string(),
        }
    })?;
    let ref_block = info
        .head_block_num
        .checked_sub(config.blocks_behind)
        .ok_or_else(|| {
            CodecError::range(
                "blocks_behind",
                config.blocks_behind,
                format!("exceeds head block {}", info.head_block_num),
            )
        })?;

    let block = reader.get_block(&ref_block.to_string()).await?;
    let block_ms = parse_timestamp_millis("timestamp", &block.timestamp).map_err(|e| {
        ChainError::InvalidResponse {
            message: e.to_string(),
        }
    })?;
    let expiration = block_ms.div_euclid(1000) + config.expire_seconds as i64;
    let expiration = u32::try_from(expiration)
        .map_err(|_| CodecError::range("expiration", expiration, "must fit in uint32"))?;
    let ref_block_num = (block.block_num & 0xffff) as u16;

    let transaction_header = transaction_header(
        expiration,
        ref_block_num,
        block.ref_block_prefix,
        max_net_usage_words,
        max_cpu_usage_ms,
        delay_sec,
    );

    tracing::info!(
        head_block = info.head_block_num,
        ref_block = block.block_num,
        expiration,
        actions = actions.len(),
        body_bytes = transaction_body.len(),
        "assembled transaction"
    );

    let transaction = Transaction {
        expiration,
        ref_block_num,
        ref_block_prefix: block.ref_block_prefix,
        max_net_usage_words,
        max_cpu_usage_ms,
        delay_sec,
        context_free_actions,
        actions,
        transaction_extensions,
    };

    Ok(TransactionEnvelope {
        chain_id,
        transaction_header,
        transaction_body,
        transaction,
    })
}

/// Hash the pre-image and hand the digest to `signer`.
pub async fn sign_transaction<S>(
    envelope: &TransactionEnvelope,
    signer: &S,
    required_keys: Vec<String>,
) -> Result<SignedTransaction, TransactionError>
where
    S: Signer + ?Sized,
{
    let context = SigningContext {
        chain_id: envelope.chain_id_hex(),
        required_keys,
    };
    let signatures = signer.sign(envelope.signing_digest(), &context).await?;
    if signatures.is_empty() {
        return Err(ChainError::Signer {
            message: "signer returned no signatures".to_string(),
        }
        .into());
    }
    tracing::debug!(signatures = signatures.len(), "transaction signed");

    Ok(SignedTransaction {
        signatures,
        compression: "none".to_string(),
        packed_context_free_data: String::new(),
        packed_trx: hex_encode(&envelope.packed_trx()),
    })
}

/// Sign then push. Failures are returned as-is; nothing is retried.
pub async fn submit_transaction<S, P>(
    envelope: &TransactionEnvelope,
    signer: &S,
    pusher: &P,
    required_keys: Vec<String>,
) -> Result<Value, TransactionError>
where
    S: Signer + ?Sized,
    P: TransactionPusher + ?Sized,
{
    let signed = sign_transaction(envelope, signer, required_keys).await?;
    match pusher.push_transaction(&signed).await {
        Ok(receipt) => {
            tracing::info!("transaction pushed");
            Ok(receipt)
        }
        Err(e) => {
            tracing::warn!(error = %e, "push_transaction failed");
            Err(e.into())
        }
    }
}

fn write_count(out: &mut Vec<u8>, type_name: &str, count: usize) -> CodecResult<()> {
    let count = u32::try_from(count)
        .map_err(|_| CodecError::range(type_name, count, "count exceeds varuint32"))?;
    write_varuint32(out, count);
    Ok(())
}

fn narrow_u32(type_name: &str, value: u64) -> CodecResult<u32> {
    u32::try_from(value).map_err(|_| CodecError::range(type_name, value, "must fit in uint32"))
}
