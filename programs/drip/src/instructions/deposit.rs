use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, spl_token::instruction::AuthorityType, Mint, MintTo, SetAuthority, Token, TokenAccount, Transfer},
};
use crate::{
    constants::*,
    error::DripError,
    events::Deposited,
    state::{Position, Vault, VaultPeriod},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct DepositParams {
    pub token_a_deposit_amount: u64,
    pub number_of_swaps: u64,
}

/// Register a DCA commitment and mint its position token.
pub fn handler(ctx: Context<Deposit>, params: DepositParams) -> Result<()> {
    let bump = ctx.bumps.common.user_position;
    ctx.accounts.common.deposit(params, bump)?;
    ctx.accounts.common.revoke_mint_authority()
}

impl<'info> DepositCommon<'info> {
    /// Record the position, add its periodic amount to the vault and the
    /// expiry period, pull token A in and mint the single position token.
    ///
    /// Effective flow:
    ///   1. depositor_token_a → vault_token_a : deposit amount
    ///   2. mint 1 position token → depositor (vault PDA is mint authority)
    pub fn deposit(&mut self, params: DepositParams, position_bump: u8) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let vault_key = self.vault.key();
        let referrer = self.referrer.as_ref().map(|account| account.key());

        self.user_position.init(
            vault_key,
            self.user_position_nft_mint.key(),
            referrer,
            params.token_a_deposit_amount,
            self.vault.last_drip_period,
            params.number_of_swaps,
            now,
            position_bump,
        )?;

        let expiry_period_id = self.user_position.expiry_period_id()?;
        self.user_position.check_expiry_period(&self.vault_period_end)?;

        let periodic = self.user_position.periodic_drip_amount;
        self.vault.increase_drip_amount(periodic)?;
        self.vault_period_end.increase_dar(periodic)?;

        token::transfer(
            CpiContext::new(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.user_token_a_account.to_account_info(),
                    to: self.vault_token_a_account.to_account_info(),
                    authority: self.depositor.to_account_info(),
                },
            ),
            params.token_a_deposit_amount,
        )?;

        let vault_signer = self.vault.signer();
        let seeds = vault_signer.seeds();
        token::mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.user_position_nft_mint.to_account_info(),
                    to: self.user_position_nft_account.to_account_info(),
                    authority: self.vault.to_account_info(),
                },
                &[&seeds[..]],
            ),
            1,
        )?;

        emit!(Deposited {
            vault: vault_key,
            position: self.user_position.key(),
            position_mint: self.user_position_nft_mint.key(),
            token_a_amount: params.token_a_deposit_amount,
            number_of_swaps: params.number_of_swaps,
            periodic_drip_amount: periodic,
            expiry_period_id,
            timestamp: now,
        });
        msg!(
            "Deposit: amount={} swaps={} periodic={} expiry_period={} vault_drip_amount={}",
            params.token_a_deposit_amount,
            params.number_of_swaps,
            periodic,
            expiry_period_id,
            self.vault.drip_amount
        );
        Ok(())
    }

    /// Drop the mint authority so the supply stays at exactly one token.
    /// The mint is created without a freeze authority.
    pub fn revoke_mint_authority(&self) -> Result<()> {
        let vault_signer = self.vault.signer();
        let seeds = vault_signer.seeds();
        token::set_authority(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                SetAuthority {
                    current_authority: self.vault.to_account_info(),
                    account_or_mint: self.user_position_nft_mint.to_account_info(),
                },
                &[&seeds[..]],
            ),
            AuthorityType::MintTokens,
            None,
        )
    }
}

#[derive(Accounts)]
pub struct DepositCommon<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

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

    /// Period at which the new position's last swap happens
    #[account(mut)]
    pub vault_period_end: Box<Account<'info, VaultPeriod>>,

    #[account(
        mut,
        address = vault.token_a_account @ DripError::IncorrectVaultTokenAccount,
    )]
    pub vault_token_a_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = user_token_a_account.mint == vault.token_a_mint @ DripError::InvalidMint,
        constraint = user_token_a_account.owner == depositor.key() @ DripError::InvalidOwner,
    )]
    pub user_token_a_account: Box<Account<'info, TokenAccount>>,

    /// Fresh keypair; becomes the position's identity
    #[account(
        init,
        payer = depositor,
        mint::decimals = 0,
        mint::authority = vault,
    )]
    pub user_position_nft_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = depositor,
        space = Position::LEN,
        seeds = [POSITION_SEED, user_position_nft_mint.key().as_ref()],
        bump,
    )]
    pub user_position: Box<Account<'info, Position>>,

    #[account(
        init,
        payer = depositor,
        associated_token::mint = user_position_nft_mint,
        associated_token::authority = depositor,
    )]
    pub user_position_nft_account: Box<Account<'info, TokenAccount>>,

    /// Token B account credited with a share of future withdrawal fees
    #[account(
        constraint = referrer.mint == vault.token_b_mint @ DripError::InvalidMint,
    )]
    pub referrer: Option<Box<Account<'info, TokenAccount>>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    pub common: DepositCommon<'info>,
}
