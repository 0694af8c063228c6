use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::{error::DripError, events::AdminWithdrawn, instructions::vault_admin::*};

/// Emergency sweep: move the whole balance of one of the vault's token
/// accounts to an admin-owned account. Drip and position accounting is
/// left untouched.
pub fn handler(ctx: Context<AdminWithdraw>) -> Result<()> {
    let accounts = &ctx.accounts;
    let vault = &accounts.admin.vault;
    let source = &accounts.vault_token_account;
    require!(
        source.key() == vault.token_a_account || source.key() == vault.token_b_account,
        DripError::IncorrectVaultTokenAccount
    );

    let amount = source.amount;
    if amount > 0 {
        let vault_signer = vault.signer();
        let seeds = vault_signer.seeds();
        token::transfer(
            CpiContext::new_with_signer(
                accounts.token_program.to_account_info(),
                Transfer {
                    from: source.to_account_info(),
                    to: accounts.admin_token_account.to_account_info(),
                    authority: vault.to_account_info(),
                },
                &[&seeds[..]],
            ),
            amount,
        )?;
    }

    emit!(AdminWithdrawn {
        vault: vault.key(),
        mint: source.mint,
        amount,
        destination: accounts.admin_token_account.key(),
    });
    msg!("Admin withdraw: mint={} amount={}", source.mint, amount);
    Ok(())
}

#[derive(Accounts)]
pub struct AdminWithdraw<'info> {
    pub admin: VaultAdmin<'info>,

    /// The vault's token A or token B account
    #[account(mut)]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = admin_token_account.mint == vault_token_account.mint @ DripError::InvalidMint,
        constraint = admin_token_account.owner == admin.admin.key() @ DripError::InvalidOwner,
    )]
    pub admin_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
