use anchor_lang::prelude::*;
use crate::{
    constants::*,
    error::DripError,
    events::VaultGuardsUpdated,
    state::{Vault, VaultProtoConfig},
};

impl<'info> VaultAdmin<'info> {
    pub fn emit_guards(&self) {
        let vault = &self.vault;
        emit!(VaultGuardsUpdated {
            vault: vault.key(),
            limit_swaps: vault.limit_swaps,
            max_slippage_bps: vault.max_slippage_bps,
            max_price_deviation_bps: vault.max_price_deviation_bps,
            oracle_config: vault.oracle_config,
        });
    }
}

/// Signer must be the admin of the vault's proto config.
#[derive(Accounts)]
pub struct VaultAdmin<'info> {
    #[account(
        mut,
        address = vault_proto_config.admin @ DripError::SignerIsNotAdmin,
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [
            VAULT_SEED,
            vault.token_a_mint.as_ref(),
            vault.token_b_mint.as_ref(),
            vault.proto_config.as_ref(),
        ],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        constraint = vault_proto_config.key() == vault.proto_config
            @ DripError::InvalidVaultProtoConfigReference,
    )]
    pub vault_proto_config: Box<Account<'info, VaultProtoConfig>>,
}
