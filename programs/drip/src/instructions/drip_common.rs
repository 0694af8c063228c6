use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::{
    constants::*,
    error::DripError,
    events::Dripped,
    instructions::{
        drip_math::spread_amount,
        venue::{SwapVenue, VaultLegs},
    },
    state::{OracleConfig, Vault, VaultPeriod, VaultProtoConfig},
};

/// Advance `common.vault` by one period, swapping its pooled drip amount
/// through `venue`.
///
/// Flow:
///   1. check period sequencing, drip amount, whitelist, activation time, oracle
///   2. retire the current period's DAR and move `last_drip_period` forward
///   3. vault_token_a → drip_fee_token_a : trigger spread (PDA-signed)
///   4. venue swap of the rest (PDA-signed)
///   5. verify balances and fold the realized price into the TWAP
pub fn execute<'info, V: SwapVenue<'info>>(
    common: &mut DripCommon<'info>,
    venue: &V,
    oracle_config: Option<&Account<'info, OracleConfig>>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vault_key = common.vault.key();
    let swap_key = venue.whitelist_key();

    // ── Preconditions ────────────────────────────────────────────────────────
    let oracle_key = oracle_config.map(|config| config.key());
    let oracle = oracle_key.as_ref().zip(oracle_config.map(|config| &**config));
    common.vault.check_drip(
        &vault_key,
        &common.last_vault_period,
        &common.current_vault_period,
        &swap_key,
        oracle,
        now,
    )?;

    let drip_amount = common.vault.drip_amount;
    require!(
        common.vault_token_a_account.amount >= drip_amount,
        DripError::IncompleteSwap
    );
    let trigger_fee = spread_amount(drip_amount, common.vault_proto_config.token_a_drip_trigger_spread)?;
    let swap_amount = drip_amount - trigger_fee; // spread < 50 %

    // ── Vault bookkeeping ────────────────────────────────────────────────────
    let granularity = common.vault_proto_config.granularity;
    common.vault.process_drip(&common.current_vault_period, granularity, now)?;

    let vault_signer = common.vault.signer();
    let seeds = vault_signer.seeds();
    let signer = &[&seeds[..]];

    let before_a = common.vault_token_a_account.amount;
    let before_b = common.vault_token_b_account.amount;

    // ── Trigger reward ───────────────────────────────────────────────────────
    if trigger_fee > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                common.token_program.to_account_info(),
                Transfer {
                    from: common.vault_token_a_account.to_account_info(),
                    to: common.drip_fee_token_a_account.to_account_info(),
                    authority: common.vault.to_account_info(),
                },
                signer,
            ),
            trigger_fee,
        )?;
    }

    // ── Swap ─────────────────────────────────────────────────────────────────
    let legs = VaultLegs {
        authority: common.vault.to_account_info(),
        token_a_account: common.vault_token_a_account.to_account_info(),
        token_b_account: common.vault_token_b_account.to_account_info(),
        token_program: common.token_program.to_account_info(),
    };
    venue.swap(&legs, &common.vault, swap_amount, signer)?;

    common.vault_token_a_account.reload()?;
    common.vault_token_b_account.reload()?;
    let spent_a = before_a
        .checked_sub(common.vault_token_a_account.amount)
        .ok_or(DripError::IncompleteSwap)?;
    let received_b = common
        .vault_token_b_account
        .amount
        .checked_sub(before_b)
        .ok_or(DripError::IncompleteSwap)?;
    require!(
        spent_a == drip_amount && received_b > 0,
        DripError::IncompleteSwap
    );

    // ── TWAP ─────────────────────────────────────────────────────────────────
    let previous_twap = common.last_vault_period.twap;
    common
        .current_vault_period
        .record_drip(previous_twap, swap_amount, received_b, now)?;

    emit!(Dripped {
        vault: vault_key,
        period_id: common.current_vault_period.period_id,
        venue: V::KIND,
        swap: swap_key,
        token_a_swapped: swap_amount,
        token_b_received: received_b,
        trigger_fee,
        twap: common.current_vault_period.twap,
        timestamp: now,
    });
    msg!(
        "Drip: period={} swapped={} received={} trigger_fee={} remaining_drip_amount={}",
        common.current_vault_period.period_id,
        swap_amount,
        received_b,
        trigger_fee,
        common.vault.drip_amount
    );
    Ok(())
}

/// Accounts shared by every drip venue.
#[derive(Accounts)]
pub struct DripCommon<'info> {
    /// Anyone may trigger a drip
    pub drip_trigger_source: Signer<'info>,

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

    /// Checked against the vault's sequence in `Vault::check_drip`
    pub last_vault_period: Box<Account<'info, VaultPeriod>>,

    #[account(mut)]
    pub current_vault_period: Box<Account<'info, VaultPeriod>>,

    #[account(
        mut,
        address = vault.token_a_account @ DripError::IncorrectVaultTokenAccount,
    )]
    pub vault_token_a_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = vault.token_b_account @ DripError::IncorrectVaultTokenAccount,
    )]
    pub vault_token_b_account: Box<Account<'info, TokenAccount>>,

    /// Receives the trigger spread, in token A
    #[account(
        mut,
        constraint = drip_fee_token_a_account.mint == vault.token_a_mint @ DripError::InvalidMint,
    )]
    pub drip_fee_token_a_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
