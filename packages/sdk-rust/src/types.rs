//! Parameter and result types for [`crate::DripClient`].
//!
//! Results derive `Serialize` so agents and services can hand them straight
//! to `serde_json`.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::state::{PositionState, VaultState};

/// Identifies a vault by the triple its PDA is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultKey {
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub proto_config: Pubkey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProtoConfigParams {
    /// Period length in seconds
    pub granularity:                 i64,
    pub token_a_drip_trigger_spread: u16,
    pub token_b_withdrawal_spread:   u16,
    pub token_b_referral_spread:     u16,
    pub admin:                       Pubkey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVaultParams {
    pub vault:                   VaultKey,
    pub treasury_token_b:        Pubkey,
    /// Up to five venue addresses; empty leaves swaps unrestricted
    pub whitelisted_swaps:       Vec<Pubkey>,
    pub max_slippage_bps:        u16,
    pub max_price_deviation_bps: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositParams {
    pub vault:           VaultKey,
    pub token_a_amount:  u64,
    pub number_of_swaps: u64,
    pub referrer:        Option<Pubkey>,
    /// Attach Metaplex metadata to the position token
    pub with_metadata:   bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepositResult {
    pub signature:            String,
    pub vault:                Pubkey,
    pub position:             Pubkey,
    pub position_mint:        Pubkey,
    pub periodic_drip_amount: u64,
    pub expiry_period_id:     u64,
}

/// What a withdrawal or close would move at the time of the quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalQuote {
    pub period_id_i:        u64,
    pub period_id_j:        u64,
    /// Released from the vault, fees included
    pub gross_token_b:      u64,
    pub treasury_fee:       u64,
    pub referral_fee:       u64,
    pub user_token_b:       u64,
    /// Undripped token A a close would return
    pub refundable_token_a: u64,
    /// Average token B per token A over the window
    pub average_price:      f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawResult {
    pub signature: String,
    pub position:  Pubkey,
    pub quote:     WithdrawalQuote,
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultInfo {
    pub address:         Pubkey,
    pub state:           VaultState,
    pub token_a_balance: u64,
    pub token_b_balance: u64,
    /// Seconds until the next drip is allowed; 0 when it is due
    pub next_drip_in:    i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionInfo {
    pub address: Pubkey,
    pub state:   PositionState,
    /// `None` for closed positions
    pub quote:   Option<WithdrawalQuote>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProtoConfigResult {
    pub signature:    String,
    pub proto_config: Pubkey,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateVaultResult {
    pub signature:       String,
    pub vault:           Pubkey,
    pub token_a_account: Pubkey,
    pub token_b_account: Pubkey,
}

#[derive(Debug, Clone, Serialize)]
pub struct DripResult {
    pub signature:   String,
    pub vault:       Pubkey,
    /// Period the drip closed
    pub period_id:   u64,
    /// Token A drawn from the vault, trigger spread included
    pub drip_amount: u64,
}
