use anchor_lang::prelude::*;
use crate::{
    events::Withdrawn,
    instructions::settlement::{self, *},
};

/// Release the token B a position has earned since its last withdrawal.
///
/// Split of the gross amount:
///   - treasury : token_b_withdrawal_spread bps, less the referral share
///   - referrer : token_b_referral_spread bps of that fee (if any)
///   - user     : everything else
pub fn handler(ctx: Context<WithdrawB>) -> Result<()> {
    let common = &mut ctx.accounts.common;
    common.check_holder(false, &[])?;

    let vault_key = common.vault.key();
    let split = settlement::payable_withdrawal(
        &vault_key,
        &common.vault,
        &common.vault_proto_config,
        &common.user_position,
        &common.vault_period_i,
        &common.vault_period_j,
    )?;

    common.user_position.record_withdrawal(split.gross)?;

    let vault_signer = common.vault.signer();
    let seeds = vault_signer.seeds();
    common.pay_out(&split, &[&seeds[..]])?;

    let now = Clock::get()?.unix_timestamp;
    emit!(Withdrawn {
        vault: vault_key,
        position: common.user_position.key(),
        gross_token_b: split.gross,
        user_token_b: split.user,
        treasury_fee: split.treasury_fee,
        referral_fee: split.referral_fee,
        timestamp: now,
    });
    msg!(
        "WithdrawB: gross={} user={} treasury={} referral={} total_withdrawn={}",
        split.gross,
        split.user,
        split.treasury_fee,
        split.referral_fee,
        common.user_position.withdrawn_token_b_amount
    );
    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawB<'info> {
    pub common: WithdrawCommon<'info>,
}
