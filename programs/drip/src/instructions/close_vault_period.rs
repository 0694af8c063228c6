use anchor_lang::prelude::*;
use crate::{
    error::DripError,
    state::{Vault, VaultPeriod, VaultProtoConfig},
};

/// Reclaim a period's rent once the vault has no active positions.
pub fn handler(ctx: Context<CloseVaultPeriod>) -> Result<()> {
    require!(ctx.accounts.vault.drip_amount == 0, DripError::VaultDripAmountNotZero);
    msg!(
        "Vault period closed: vault={} period={}",
        ctx.accounts.vault.key(),
        ctx.accounts.vault_period.period_id
    );
    Ok(())
}

#[derive(Accounts)]
pub struct CloseVaultPeriod<'info> {
    #[account(
        mut,
        address = vault_proto_config.admin @ DripError::SignerIsNotAdmin,
    )]
    pub admin: Signer<'info>,

    pub vault: Box<Account<'info, Vault>>,

    #[account(
        constraint = vault_proto_config.key() == vault.proto_config
            @ DripError::InvalidVaultProtoConfigReference,
    )]
    pub vault_proto_config: Box<Account<'info, VaultProtoConfig>>,

    #[account(
        mut,
        close = admin,
        constraint = vault_period.vault == vault.key() @ DripError::InvalidVaultReference,
    )]
    pub vault_period: Box<Account<'info, VaultPeriod>>,
}
