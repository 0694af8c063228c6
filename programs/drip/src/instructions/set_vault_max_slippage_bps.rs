use anchor_lang::prelude::*;
use crate::instructions::vault_admin::*;

pub fn handler(ctx: Context<SetVaultMaxSlippageBps>, max_slippage_bps: u16) -> Result<()> {
    let admin = &mut ctx.accounts.admin;
    admin.vault.set_max_slippage_bps(max_slippage_bps)?;
    admin.emit_guards();
    msg!("Max slippage set: {}bps", max_slippage_bps);
    Ok(())
}

#[derive(Accounts)]
pub struct SetVaultMaxSlippageBps<'info> {
    pub admin: VaultAdmin<'info>,
}
