use anchor_lang::prelude::*;
use crate::{error::DripError, state::VaultProtoConfig};

/// Reclaim a proto config's rent. References are not counted; the admin
/// closes it once the vaults built on it are gone.
pub fn handler(ctx: Context<CloseVaultProtoConfig>) -> Result<()> {
    msg!("Proto config closed: {}", ctx.accounts.vault_proto_config.key());
    Ok(())
}

#[derive(Accounts)]
pub struct CloseVaultProtoConfig<'info> {
    #[account(
        mut,
        address = vault_proto_config.admin @ DripError::SignerIsNotAdmin,
    )]
    pub admin: Signer<'info>,

    #[account(mut, close = admin)]
    pub vault_proto_config: Box<Account<'info, VaultProtoConfig>>,
}
