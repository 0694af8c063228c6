use anchor_lang::prelude::*;
use crate::{
    error::DripError,
    instructions::init_oracle_config::{OracleConfigAccounts, OracleConfigParams},
    state::OracleConfig,
};

/// Replace every field of an oracle config, authority included.
pub fn handler(ctx: Context<UpdateOracleConfig>, params: OracleConfigParams) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let accounts = OracleConfigAccounts {
        config: &mut **accounts.oracle_config,
        token_a_mint: accounts.new_token_a_mint.key(),
        token_a_price: &accounts.new_token_a_price,
        token_b_mint: accounts.new_token_b_mint.key(),
        token_b_price: &accounts.new_token_b_price,
    };
    accounts.apply(params)
}

#[derive(Accounts)]
pub struct UpdateOracleConfig<'info> {
    #[account(
        address = oracle_config.update_authority @ DripError::SignerIsNotOracleUpdateAuthority,
    )]
    pub current_update_authority: Signer<'info>,

    #[account(mut)]
    pub oracle_config: Box<Account<'info, OracleConfig>>,

    /// CHECK: only its key is recorded
    pub new_token_a_mint: UncheckedAccount<'info>,

    /// CHECK: decoded as a price record in the handler
    pub new_token_a_price: UncheckedAccount<'info>,

    /// CHECK: only its key is recorded
    pub new_token_b_mint: UncheckedAccount<'info>,

    /// CHECK: decoded as a price record in the handler
    pub new_token_b_price: UncheckedAccount<'info>,
}
