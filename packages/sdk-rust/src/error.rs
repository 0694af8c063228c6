//! SDK error type.

use solana_sdk::pubkey::Pubkey;

/// All errors returned by the Drip SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Account discovery ────────────────────────────────────────────────────
    /// No vault exists for the given (token A, token B, proto config) triple.
    #[error("Vault not found for mints {0} / {1}")]
    VaultNotFound(Pubkey, Pubkey),

    /// A vault period the operation needs has not been created yet.
    #[error("Vault period {period_id} of vault {vault} does not exist; create it with init_vault_period")]
    VaultPeriodMissing { vault: Pubkey, period_id: u64 },

    // ── Position lifecycle ───────────────────────────────────────────────────
    #[error("Position {0} is already closed")]
    PositionClosed(Pubkey),

    /// The position has no token B to withdraw for its current window.
    #[error("Nothing to withdraw for position {0}")]
    NothingToWithdraw(Pubkey),

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in drip / withdrawal math")]
    MathOverflow,

    // ── Account parsing ──────────────────────────────────────────────────────
    /// Raw account bytes could not be deserialized.
    #[error("Account parse error at offset {offset}: {reason}")]
    ParseError { offset: usize, reason: String },

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
