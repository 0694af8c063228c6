use anchor_lang::prelude::*;
use crate::state::{OracleConfig, PriceRecord};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct OracleConfigParams {
    pub enabled: bool,
    pub source: u8,
    pub update_authority: Pubkey,
}

/// Create an oracle config. Both price accounts must decode as live price
/// records.
pub fn handler(ctx: Context<InitOracleConfig>, params: OracleConfigParams) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let accounts = OracleConfigAccounts {
        config: &mut **accounts.oracle_config,
        token_a_mint: accounts.token_a_mint.key(),
        token_a_price: &accounts.token_a_price,
        token_b_mint: accounts.token_b_mint.key(),
        token_b_price: &accounts.token_b_price,
    };
    accounts.apply(params)
}

/// The fields `init_oracle_config` and `update_oracle_config` both write.
pub struct OracleConfigAccounts<'a, 'info> {
    pub config: &'a mut OracleConfig,
    pub token_a_mint: Pubkey,
    pub token_a_price: &'a AccountInfo<'info>,
    pub token_b_mint: Pubkey,
    pub token_b_price: &'a AccountInfo<'info>,
}

impl OracleConfigAccounts<'_, '_> {
    pub fn apply(self, params: OracleConfigParams) -> Result<()> {
        let price_a = PriceRecord::load(self.token_a_price)?;
        let price_b = PriceRecord::load(self.token_b_price)?;

        self.config.set(
            params.enabled,
            params.source,
            params.update_authority,
            self.token_a_mint,
            self.token_a_price.key(),
            self.token_b_mint,
            self.token_b_price.key(),
        )?;

        msg!(
            "Oracle config set: enabled={} price_a={}e{} price_b={}e{}",
            params.enabled,
            price_a.price,
            price_a.exponent,
            price_b.price,
            price_b.exponent
        );
        Ok(())
    }
}

#[derive(Accounts)]
pub struct InitOracleConfig<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(init, payer = creator, space = OracleConfig::LEN)]
    pub oracle_config: Box<Account<'info, OracleConfig>>,

    /// CHECK: only its key is recorded
    pub token_a_mint: UncheckedAccount<'info>,

    /// CHECK: decoded as a price record in the handler
    pub token_a_price: UncheckedAccount<'info>,

    /// CHECK: only its key is recorded
    pub token_b_mint: UncheckedAccount<'info>,

    /// CHECK: decoded as a price record in the handler
    pub token_b_price: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
