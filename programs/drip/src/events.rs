use anchor_lang::prelude::*;

use crate::instructions::venue::SwapVenueKind;

#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub proto_config: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub max_slippage_bps: u16,
    pub max_price_deviation_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub position: Pubkey,
    pub position_mint: Pubkey,
    pub token_a_amount: u64,
    pub number_of_swaps: u64,
    pub periodic_drip_amount: u64,
    pub expiry_period_id: u64,
    pub timestamp: i64,
}

#[event]
pub struct Dripped {
    pub vault: Pubkey,
    pub period_id: u64,
    pub venue: SwapVenueKind,
    pub swap: Pubkey,
    pub token_a_swapped: u64,
    pub token_b_received: u64,
    pub trigger_fee: u64,
    pub twap: u128,
    pub timestamp: i64,
}

#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub position: Pubkey,
    pub gross_token_b: u64,
    pub user_token_b: u64,
    pub treasury_fee: u64,
    pub referral_fee: u64,
    pub timestamp: i64,
}

#[event]
pub struct PositionClosed {
    pub vault: Pubkey,
    pub position: Pubkey,
    /// Holder, or the proto config admin closing for them
    pub closed_by: Pubkey,
    pub token_a_refunded: u64,
    pub gross_token_b: u64,
    pub vault_drip_amount_after: u64,
    pub timestamp: i64,
}

#[event]
pub struct VaultGuardsUpdated {
    pub vault: Pubkey,
    pub limit_swaps: bool,
    pub max_slippage_bps: u16,
    pub max_price_deviation_bps: u16,
    pub oracle_config: Option<Pubkey>,
}

#[event]
pub struct AdminWithdrawn {
    pub vault: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub destination: Pubkey,
}
