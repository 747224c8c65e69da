//! Per-contract AST cache.
//!
//! Each contract maps to an `Arc<ContractAst>` snapshot. A refresh builds a
//! complete new snapshot and swaps the `Arc`; readers holding the old one
//! keep using it. Nothing is written to the cache until a fetch and build
//! have both finished, so a failed or dropped fetch leaves it untouched.
//!
//! Every refresh takes a ticket before fetching. A snapshot only replaces one
//! built from an older ticket, so a slow fetch that finishes after a newer
//! one cannot roll the cache back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use antelope_abi_core::abi::RawAbi;
use antelope_abi_core::error::{ChainError, TransactionError};
use async_trait::async_trait;
use dashmap::DashMap;

use crate::ast::{build_ast, Ast, ContractAst};

/// Source of contract ABIs, i.e. the `get_abi` RPC.
#[async_trait]
pub trait AbiProvider: Send + Sync {
    async fn get_abi(&self, account: &str) -> Result<RawAbi, ChainError>;
}

struct Snapshot {
    ticket: u64,
    ast: Arc<ContractAst>,
}

pub struct AbiCache<P> {
    provider: P,
    snapshots: DashMap<String, Snapshot>,
    next_ticket: AtomicU64,
}

impl<P: AbiProvider> AbiCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            snapshots: DashMap::new(),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Cached snapshot for `account`, without fetching.
    pub fn cached(&self, account: &str) -> Option<Arc<ContractAst>> {
        self.snapshots.get(account).map(|entry| Arc::clone(&entry.ast))
    }

    /// Cached snapshot, or fetch and build one on a miss.
    pub async fn get(&self, account: &str) -> Result<Arc<ContractAst>, TransactionError> {
        if let Some(ast) = self.cached(account) {
            tracing::debug!(account, "ABI cache hit");
            return Ok(ast);
        }
        tracing::debug!(account, "ABI cache miss");
        self.refresh(account).await
    }

    /// Fetch the ABI again and publish a fresh snapshot.
    ///
    /// If a refresh that started later has already published, its snapshot is
    /// kept and returned instead.
    pub async fn refresh(&self, account: &str) -> Result<Arc<ContractAst>, TransactionError> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let abi = self.provider.get_abi(account).await?;
        let ast = Arc::new(build_ast(account, &abi)?);

        let published = {
            let mut slot = self
                .snapshots
                .entry(account.to_string())
                .or_insert_with(|| Snapshot {
                    ticket,
                    ast: Arc::clone(&ast),
                });
            if slot.ticket < ticket {
                *slot = Snapshot {
                    ticket,
                    ast: Arc::clone(&ast),
                };
            }
            Arc::clone(&slot.ast)
        };

        if Arc::ptr_eq(&published, &ast) {
            tracing::info!(account, ticket, structs = ast.len(), "published ABI snapshot");
        } else {
            tracing::debug!(account, ticket, "discarded stale ABI snapshot");
        }
        Ok(published)
    }

    /// Drop the snapshot for `account`; the next `get` refetches.
    pub fn invalidate(&self, account: &str) -> bool {
        self.snapshots.remove(account).is_some()
    }

    /// Snapshots for every listed account, fetched as needed.
    pub async fn ast_for<'a, I>(&self, accounts: I) -> Result<Ast, TransactionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut contracts = Vec::new();
        for account in accounts {
            contracts.push(self.get(account).await?);
        }
        Ok(contracts.into_iter().collect())
    }
}
