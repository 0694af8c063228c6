use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, CloseAccount, Mint, TokenAccount, Transfer};
use crate::{
    error::DripError,
    events::PositionClosed,
    instructions::settlement::{self, *},
    state::VaultPeriod,
};

/// Settle and retire a position. The holder signs, or the proto config
/// admin closes on the holder's behalf with every payout going to the
/// holder's accounts.
///
/// Effective flow:
///   1. vault_token_b → user / treasury / referrer : final withdrawal (if any)
///   2. vault_token_a → user_token_a               : undripped token A (if any)
///   3. holder only: burn the position token and close its token account
pub fn handler(ctx: Context<ClosePosition>) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let settler = accounts
        .common
        .check_holder(true, &[accounts.user_token_a_account.owner])?;

    let vault_key = accounts.common.vault.key();
    let close = settlement::close_settlement(
        &vault_key,
        &accounts.common.vault,
        &accounts.common.vault_proto_config,
        &accounts.common.user_position,
        &accounts.common.vault_period_i,
        &accounts.common.vault_period_j,
        &accounts.vault_period_user_expiry,
    )?;

    settlement::apply_close(
        &mut accounts.common.vault,
        &mut accounts.vault_period_user_expiry,
        &mut accounts.common.user_position,
        &close,
    )?;

    // ── Payouts (PDA-signed) ─────────────────────────────────────────────────
    let vault_signer = accounts.common.vault.signer();
    let seeds = vault_signer.seeds();
    let signer = &[&seeds[..]];

    accounts.common.pay_out(&close.withdrawal, signer)?;

    if close.refund_token_a > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                accounts.common.token_program.to_account_info(),
                Transfer {
                    from: accounts.vault_token_a_account.to_account_info(),
                    to: accounts.user_token_a_account.to_account_info(),
                    authority: accounts.common.vault.to_account_info(),
                },
                signer,
            ),
            close.refund_token_a,
        )?;
    }

    // ── Invalidate the position token ────────────────────────────────────────
    // An admin close cannot burn; the closed flag already voids the token
    if settler == Settler::Holder {
        token::burn(
            CpiContext::new(
                accounts.common.token_program.to_account_info(),
                Burn {
                    mint: accounts.user_position_nft_mint.to_account_info(),
                    from: accounts.common.user_position_nft_account.to_account_info(),
                    authority: accounts.common.withdrawer.to_account_info(),
                },
            ),
            1,
        )?;
        token::close_account(CpiContext::new(
            accounts.common.token_program.to_account_info(),
            CloseAccount {
                account: accounts.common.user_position_nft_account.to_account_info(),
                destination: accounts.common.withdrawer.to_account_info(),
                authority: accounts.common.withdrawer.to_account_info(),
            },
        ))?;
    }

    let now = Clock::get()?.unix_timestamp;
    emit!(PositionClosed {
        vault: vault_key,
        position: accounts.common.user_position.key(),
        closed_by: accounts.common.withdrawer.key(),
        token_a_refunded: close.refund_token_a,
        gross_token_b: close.withdrawal.gross,
        vault_drip_amount_after: accounts.common.vault.drip_amount,
        timestamp: now,
    });
    msg!(
        "ClosePosition: by={:?} refund_a={} gross_b={} retired={} vault_drip_amount={}",
        settler,
        close.refund_token_a,
        close.withdrawal.gross,
        close.retire_drip,
        accounts.common.vault.drip_amount
    );
    Ok(())
}

#[derive(Accounts)]
pub struct ClosePosition<'info> {
    pub common: WithdrawCommon<'info>,

    /// Period at which the position's last swap happens
    #[account(mut)]
    pub vault_period_user_expiry: Box<Account<'info, VaultPeriod>>,

    #[account(
        mut,
        address = common.vault.token_a_account @ DripError::IncorrectVaultTokenAccount,
    )]
    pub vault_token_a_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = user_token_a_account.mint == common.vault.token_a_mint @ DripError::InvalidMint,
    )]
    pub user_token_a_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = common.user_position.position_authority @ DripError::InvalidMint,
    )]
    pub user_position_nft_mint: Box<Account<'info, Mint>>,
}
