use anchor_lang::prelude::*;
use crate::instructions::vault_admin::*;

pub fn handler(ctx: Context<SetVaultMaxPriceDeviationBps>, max_price_deviation_bps: u16) -> Result<()> {
    let admin = &mut ctx.accounts.admin;
    admin.vault.set_max_price_deviation_bps(max_price_deviation_bps)?;
    admin.emit_guards();
    msg!("Max price deviation set: {}bps", max_price_deviation_bps);
    Ok(())
}

#[derive(Accounts)]
pub struct SetVaultMaxPriceDeviationBps<'info> {
    pub admin: VaultAdmin<'info>,
}
