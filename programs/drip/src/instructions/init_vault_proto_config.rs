use anchor_lang::prelude::*;
use crate::state::VaultProtoConfig;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct InitVaultProtoConfigParams {
    /// Period length in seconds; the sign is dropped
    pub granularity: i64,
    pub token_a_drip_trigger_spread: u16,
    pub token_b_withdrawal_spread: u16,
    pub token_b_referral_spread: u16,
    pub admin: Pubkey,
}

/// Create an immutable schedule and fee template. Anyone may create one;
/// `params.admin` governs every vault built on it.
pub fn handler(ctx: Context<InitVaultProtoConfig>, params: InitVaultProtoConfigParams) -> Result<()> {
    ctx.accounts.vault_proto_config.init(
        params.granularity,
        params.token_a_drip_trigger_spread,
        params.token_b_withdrawal_spread,
        params.token_b_referral_spread,
        params.admin,
    )?;

    let config = &ctx.accounts.vault_proto_config;
    msg!(
        "Proto config created: granularity={}s trigger={}bps withdrawal={}bps referral={}bps admin={}",
        config.granularity,
        config.token_a_drip_trigger_spread,
        config.token_b_withdrawal_spread,
        config.token_b_referral_spread,
        config.admin
    );
    Ok(())
}

#[derive(Accounts)]
pub struct InitVaultProtoConfig<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(init, payer = creator, space = VaultProtoConfig::LEN)]
    pub vault_proto_config: Account<'info, VaultProtoConfig>,

    pub system_program: Program<'info, System>,
}
