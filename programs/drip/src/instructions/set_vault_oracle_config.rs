use anchor_lang::prelude::*;
use crate::{error::DripError, instructions::vault_admin::*, state::OracleConfig};

/// Attach `oracle_config` to the vault, or detach the current one when the
/// account is omitted. An attached config must price the vault's own pair.
pub fn handler(ctx: Context<SetVaultOracleConfig>) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let vault = &mut accounts.admin.vault;

    vault.oracle_config = match accounts.oracle_config.as_ref() {
        Some(config) => {
            require_keys_eq!(config.token_a_mint, vault.token_a_mint, DripError::InvalidMint);
            require_keys_eq!(config.token_b_mint, vault.token_b_mint, DripError::InvalidMint);
            Some(config.key())
        }
        None => None,
    };

    msg!("Oracle config set: {:?}", vault.oracle_config);
    accounts.admin.emit_guards();
    Ok(())
}

#[derive(Accounts)]
pub struct SetVaultOracleConfig<'info> {
    pub admin: VaultAdmin<'info>,

    pub oracle_config: Option<Box<Account<'info, OracleConfig>>>,
}
