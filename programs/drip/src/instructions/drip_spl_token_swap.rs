use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};
use crate::{
    constants::*,
    error::DripError,
    instructions::{drip_common::{self, *}, venue::SplTokenSwapVenue},
    state::OracleConfig,
};

/// Drip through an SPL token-swap constant-product pool.
pub fn handler(ctx: Context<DripSplTokenSwap>) -> Result<()> {
    let venue = SplTokenSwapVenue {
        program: ctx.accounts.token_swap_program.to_account_info(),
        swap: ctx.accounts.swap.to_account_info(),
        swap_authority: ctx.accounts.swap_authority.to_account_info(),
        swap_token_a_account: ctx.accounts.swap_token_a_account.to_account_info(),
        swap_token_b_account: ctx.accounts.swap_token_b_account.to_account_info(),
        swap_token_mint: ctx.accounts.swap_token_mint.to_account_info(),
        swap_fee_account: ctx.accounts.swap_fee_account.to_account_info(),
        reserve_a: ctx.accounts.swap_token_a_account.amount,
        reserve_b: ctx.accounts.swap_token_b_account.amount,
    };
    drip_common::execute(
        &mut ctx.accounts.common,
        &venue,
        ctx.accounts.oracle_config.as_deref(),
    )
}

#[derive(Accounts)]
pub struct DripSplTokenSwap<'info> {
    pub common: DripCommon<'info>,

    /// CHECK: owned by the token-swap program, decoded and checked by the venue; whitelisted by address
    #[account(owner = SPL_TOKEN_SWAP_PROGRAM_ID @ DripError::InvalidSwapAccount)]
    pub swap: UncheckedAccount<'info>,

    #[account(mut)]
    pub swap_token_mint: Box<Account<'info, Mint>>,

    /// Pool reserve of the vault's token A
    #[account(
        mut,
        constraint = swap_token_a_account.mint == common.vault.token_a_mint @ DripError::InvalidMint,
        constraint = swap_token_a_account.owner == swap_authority.key() @ DripError::InvalidOwner,
    )]
    pub swap_token_a_account: Box<Account<'info, TokenAccount>>,

    /// Pool reserve of the vault's token B
    #[account(
        mut,
        constraint = swap_token_b_account.mint == common.vault.token_b_mint @ DripError::InvalidMint,
        constraint = swap_token_b_account.owner == swap_authority.key() @ DripError::InvalidOwner,
    )]
    pub swap_token_b_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub swap_fee_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: must be the pool PDA recorded by `swap`, checked by the venue
    pub swap_authority: UncheckedAccount<'info>,

    /// CHECK: address constraint
    #[account(address = SPL_TOKEN_SWAP_PROGRAM_ID)]
    pub token_swap_program: UncheckedAccount<'info>,

    /// Required when the vault references an oracle config
    pub oracle_config: Option<Box<Account<'info, OracleConfig>>>,
}
