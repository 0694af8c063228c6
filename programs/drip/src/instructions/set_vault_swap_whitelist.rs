use anchor_lang::prelude::*;
use crate::instructions::vault_admin::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetVaultSwapWhitelistParams {
    /// Replaces the whole list; empty clears `limit_swaps`
    pub whitelisted_swaps: Vec<Pubkey>,
}

pub fn handler(ctx: Context<SetVaultSwapWhitelist>, params: SetVaultSwapWhitelistParams) -> Result<()> {
    let admin = &mut ctx.accounts.admin;
    admin.vault.set_whitelisted_swaps(&params.whitelisted_swaps)?;
    admin.emit_guards();
    msg!("Swap whitelist set: entries={} limit_swaps={}", params.whitelisted_swaps.len(), admin.vault.limit_swaps);
    Ok(())
}

#[derive(Accounts)]
pub struct SetVaultSwapWhitelist<'info> {
    pub admin: VaultAdmin<'info>,
}
