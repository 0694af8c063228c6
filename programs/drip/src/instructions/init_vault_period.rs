use anchor_lang::prelude::*;
use crate::{
    constants::*,
    state::{Vault, VaultPeriod},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct InitVaultPeriodParams {
    pub period_id: u64,
}

/// Create the ledger entry for `period_id`. Permissionless; periods at or
/// before the last drip can no longer be created (except period 0 on a
/// fresh vault).
pub fn handler(ctx: Context<InitializeVaultPeriod>, params: InitVaultPeriodParams) -> Result<()> {
    ctx.accounts.vault.check_new_period(params.period_id)?;

    let vault_key = ctx.accounts.vault.key();
    ctx.accounts
        .vault_period
        .init(vault_key, params.period_id, ctx.bumps.vault_period);

    msg!("Vault period created: vault={} period={}", vault_key, params.period_id);
    Ok(())
}

#[derive(Accounts)]
#[instruction(params: InitVaultPeriodParams)]
pub struct InitializeVaultPeriod<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
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
        init,
        payer = creator,
        space = VaultPeriod::LEN,
        seeds = [
            VAULT_PERIOD_SEED,
            vault.key().as_ref(),
            params.period_id.to_string().as_bytes(),
        ],
        bump,
    )]
    pub vault_period: Box<Account<'info, VaultPeriod>>,

    pub system_program: Program<'info, System>,
}
