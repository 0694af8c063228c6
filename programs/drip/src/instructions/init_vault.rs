use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};
use crate::{
    constants::*,
    error::DripError,
    events::VaultInitialized,
    state::{Vault, VaultProtoConfig},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeVaultParams {
    /// Up to five venue addresses; empty leaves swaps unrestricted
    pub whitelisted_swaps: Vec<Pubkey>,
    pub max_slippage_bps: u16,
    pub max_price_deviation_bps: u16,
}

/// Create the vault for a (token A, token B, proto config) triple.
/// The vault PDA owns its token accounts; only the proto config admin may
/// create vaults against it.
pub fn handler(ctx: Context<InitializeVault>, params: InitializeVaultParams) -> Result<()> {
    require_keys_neq!(
        ctx.accounts.token_a_mint.key(),
        ctx.accounts.token_b_mint.key(),
        DripError::InvalidMint
    );
    let now = Clock::get()?.unix_timestamp;

    let vault = &mut ctx.accounts.vault;
    vault.init(
        ctx.accounts.vault_proto_config.key(),
        ctx.accounts.token_a_mint.key(),
        ctx.accounts.token_b_mint.key(),
        ctx.accounts.token_a_account.key(),
        ctx.accounts.token_b_account.key(),
        ctx.accounts.treasury_token_b_account.key(),
        &params.whitelisted_swaps,
        params.max_slippage_bps,
        params.max_price_deviation_bps,
        ctx.accounts.vault_proto_config.granularity,
        now,
        ctx.bumps.vault,
    )?;

    emit!(VaultInitialized {
        vault: vault.key(),
        proto_config: vault.proto_config,
        token_a_mint: vault.token_a_mint,
        token_b_mint: vault.token_b_mint,
        max_slippage_bps: vault.max_slippage_bps,
        max_price_deviation_bps: vault.max_price_deviation_bps,
        timestamp: now,
    });
    msg!(
        "Vault created: {}/{} limit_swaps={} activation={}",
        vault.token_a_mint,
        vault.token_b_mint,
        vault.limit_swaps,
        vault.drip_activation_timestamp
    );
    Ok(())
}

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(
        mut,
        address = vault_proto_config.admin @ DripError::OnlyAdminCanInitVault,
    )]
    pub creator: Signer<'info>,

    #[account(
        init,
        payer = creator,
        space = Vault::LEN,
        seeds = [
            VAULT_SEED,
            token_a_mint.key().as_ref(),
            token_b_mint.key().as_ref(),
            vault_proto_config.key().as_ref(),
        ],
        bump,
    )]
    pub vault: Box<Account<'info, Vault>>,

    pub vault_proto_config: Box<Account<'info, VaultProtoConfig>>,

    pub token_a_mint: Box<Account<'info, Mint>>,
    pub token_b_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = token_a_mint,
        associated_token::authority = vault,
    )]
    pub token_a_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = token_b_mint,
        associated_token::authority = vault,
    )]
    pub token_b_account: Box<Account<'info, TokenAccount>>,

    /// Receives withdrawal fees
    #[account(
        constraint = treasury_token_b_account.mint == token_b_mint.key() @ DripError::InvalidMint,
    )]
    pub treasury_token_b_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
