use anchor_lang::prelude::*;
use crate::{
    constants::*,
    instructions::{drip_common::{self, *}, venue::WhirlpoolVenue},
    state::OracleConfig,
};

/// Drip through an Orca whirlpool. Pool owner, mints and token vaults are
/// checked by the venue before the swap.
pub fn handler(ctx: Context<DripOrcaWhirlpool>) -> Result<()> {
    let venue = WhirlpoolVenue {
        program: ctx.accounts.whirlpool_program.to_account_info(),
        whirlpool: ctx.accounts.whirlpool.to_account_info(),
        token_vault_a: ctx.accounts.whirlpool_token_vault_a.to_account_info(),
        token_vault_b: ctx.accounts.whirlpool_token_vault_b.to_account_info(),
        tick_array_0: ctx.accounts.tick_array_0.to_account_info(),
        tick_array_1: ctx.accounts.tick_array_1.to_account_info(),
        tick_array_2: ctx.accounts.tick_array_2.to_account_info(),
        oracle: ctx.accounts.whirlpool_oracle.to_account_info(),
    };
    drip_common::execute(
        &mut ctx.accounts.common,
        &venue,
        ctx.accounts.oracle_config.as_deref(),
    )
}

#[derive(Accounts)]
pub struct DripOrcaWhirlpool<'info> {
    pub common: DripCommon<'info>,

    /// CHECK: decoded and validated by the venue; whitelisted by address
    #[account(mut)]
    pub whirlpool: UncheckedAccount<'info>,

    /// CHECK: must equal the whirlpool's token_vault_a
    #[account(mut)]
    pub whirlpool_token_vault_a: UncheckedAccount<'info>,

    /// CHECK: must equal the whirlpool's token_vault_b
    #[account(mut)]
    pub whirlpool_token_vault_b: UncheckedAccount<'info>,

    /// CHECK: verified by the whirlpool program
    #[account(mut)]
    pub tick_array_0: UncheckedAccount<'info>,

    /// CHECK: verified by the whirlpool program
    #[account(mut)]
    pub tick_array_1: UncheckedAccount<'info>,

    /// CHECK: verified by the whirlpool program
    #[account(mut)]
    pub tick_array_2: UncheckedAccount<'info>,

    /// CHECK: whirlpool oracle PDA, verified by the whirlpool program
    #[account(mut)]
    pub whirlpool_oracle: UncheckedAccount<'info>,

    /// CHECK: address constraint
    #[account(address = WHIRLPOOL_PROGRAM_ID)]
    pub whirlpool_program: UncheckedAccount<'info>,

    /// Required when the vault references an oracle config
    pub oracle_config: Option<Box<Account<'info, OracleConfig>>>,
}
