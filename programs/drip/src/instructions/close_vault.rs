use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Token, TokenAccount, Transfer};
use crate::{
    constants::*,
    error::DripError,
    state::{Vault, VaultProtoConfig},
};

/// Tear down a drained vault: sweep residual balances to the admin, close
/// both vault token accounts and reclaim the vault's rent.
pub fn handler(ctx: Context<CloseVault>) -> Result<()> {
    let accounts = &ctx.accounts;
    require!(accounts.vault.drip_amount == 0, DripError::VaultDripAmountNotZero);

    let vault_signer = accounts.vault.signer();
    let seeds = vault_signer.seeds();
    let signer = &[&seeds[..]];

    for (source, destination) in [
        (&accounts.vault_token_a_account, &accounts.admin_token_a_account),
        (&accounts.vault_token_b_account, &accounts.admin_token_b_account),
    ] {
        if source.amount > 0 {
            token::transfer(
                CpiContext::new_with_signer(
                    accounts.token_program.to_account_info(),
                    Transfer {
                        from: source.to_account_info(),
                        to: destination.to_account_info(),
                        authority: accounts.vault.to_account_info(),
                    },
                    signer,
                ),
                source.amount,
            )?;
        }
        token::close_account(CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            CloseAccount {
                account: source.to_account_info(),
                destination: accounts.admin.to_account_info(),
                authority: accounts.vault.to_account_info(),
            },
            signer,
        ))?;
    }

    msg!(
        "Vault closed: {}/{} residual_a={} residual_b={}",
        accounts.vault.token_a_mint,
        accounts.vault.token_b_mint,
        accounts.vault_token_a_account.amount,
        accounts.vault_token_b_account.amount
    );
    Ok(())
}

#[derive(Accounts)]
pub struct CloseVault<'info> {
    #[account(
        mut,
        address = vault_proto_config.admin @ DripError::SignerIsNotAdmin,
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        close = admin,
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

    #[account(
        mut,
        constraint = admin_token_a_account.mint == vault.token_a_mint @ DripError::InvalidMint,
        constraint = admin_token_a_account.owner == admin.key() @ DripError::InvalidOwner,
    )]
    pub admin_token_a_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = admin_token_b_account.mint == vault.token_b_mint @ DripError::InvalidMint,
        constraint = admin_token_b_account.owner == admin.key() @ DripError::InvalidOwner,
    )]
    pub admin_token_b_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
