use std::io::{BufRead, Write};

use async_trait::async_trait;
use srl_crypto::{LocalWallet, Wallet, WalletError, WalletSignature};
use srl_store::{LedgerStore, StoreError, StoreResult};
use srl_types::{Address, ChainId};
use tracing::debug;

/// Source of yes/no answers. May wait on a human for as long as it takes.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, question: String) -> bool;
}

/// Where approval answers come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Approval {
    /// Ask on the terminal.
    Interactive,
    /// Answer every question the same way.
    Always(bool),
}

#[async_trait]
impl Confirm for Approval {
    async fn confirm(&self, question: String) -> bool {
        match *self {
            Self::Always(answer) => answer,
            Self::Interactive => tokio::task::spawn_blocking(move || ask(&question))
                .await
                .unwrap_or(false),
        }
    }
}

fn ask(question: &str) -> bool {
    let mut stderr = std::io::stderr();
    if write!(stderr, "{question} [y/N] ").and_then(|_| stderr.flush()).is_err() {
        return false;
    }
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Local wallet that asks before signing. "No" is a user rejection.
pub struct PromptWallet {
    inner: LocalWallet,
    approval: Approval,
}

impl PromptWallet {
    pub fn new(inner: LocalWallet, approval: Approval) -> Self {
        Self { inner, approval }
    }

    pub fn local(&self) -> &LocalWallet {
        &self.inner
    }
}

#[async_trait]
impl Wallet for PromptWallet {
    async fn address(&self) -> Option<Address> {
        self.inner.address().await
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        self.inner.chain_id().await
    }

    async fn sign(&self, message: &str) -> Result<WalletSignature, WalletError> {
        let question = format!("Sign this message?\n---\n{message}\n---\n");
        if !self.approval.confirm(question).await {
            debug!("signature declined at prompt");
            return Err(WalletError::UserRejected);
        }
        self.inner.sign(message).await
    }
}

/// Store wrapper that asks before every write, like a transaction prompt.
///
/// The question is put before the inner store is touched, so a timeout on
/// the inner store does not run while the user is deciding.
pub struct ConfirmingStore<S, C = Approval> {
    inner: S,
    approval: C,
}

impl<S, C: Confirm> ConfirmingStore<S, C> {
    pub fn new(inner: S, approval: C) -> Self {
        Self { inner, approval }
    }

    async fn approve(&self, key: &str, len: usize) -> StoreResult<()> {
        let question = format!("Write {len} bytes to ledger key {key:?}?");
        if self.approval.confirm(question).await {
            Ok(())
        } else {
            debug!(key, "write declined at prompt");
            Err(StoreError::UserRejected)
        }
    }
}

#[async_trait]
impl<S: LedgerStore, C: Confirm> LedgerStore for ConfirmingStore<S, C> {
    async fn is_available(&self) -> StoreResult<bool> {
        self.inner.is_available().await
    }

    async fn address(&self) -> StoreResult<String> {
        self.inner.address().await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.approve(key, value.len()).await?;
        self.inner.set(key, value).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> StoreResult<bool> {
        self.approve(key, value.len()).await?;
        self.inner.compare_and_set(key, expected, value).await
    }
}
