use anchor_lang::prelude::*;
use anchor_spl::metadata::{
    create_metadata_accounts_v3, mpl_token_metadata::types::DataV2, CreateMetadataAccountsV3,
    Metadata,
};
use crate::{
    constants::*,
    instructions::deposit::*,
};

/// Same as `deposit`, plus a Metaplex metadata account for the position
/// token. Metadata is written before the mint authority is dropped.
pub fn handler(ctx: Context<DepositWithMetadata>, params: DepositParams) -> Result<()> {
    let bump = ctx.bumps.common.user_position;
    ctx.accounts.common.deposit(params, bump)?;

    let common = &ctx.accounts.common;
    let mint = common.user_position_nft_mint.key();
    let vault_signer = common.vault.signer();
    let seeds = vault_signer.seeds();

    create_metadata_accounts_v3(
        CpiContext::new_with_signer(
            ctx.accounts.metadata_program.to_account_info(),
            CreateMetadataAccountsV3 {
                metadata: ctx.accounts.position_metadata_account.to_account_info(),
                mint: common.user_position_nft_mint.to_account_info(),
                mint_authority: common.vault.to_account_info(),
                payer: common.depositor.to_account_info(),
                update_authority: common.vault.to_account_info(),
                system_program: common.system_program.to_account_info(),
                rent: common.rent.to_account_info(),
            },
            &[&seeds[..]],
        ),
        DataV2 {
            name: POSITION_TOKEN_NAME.to_string(),
            symbol: POSITION_TOKEN_SYMBOL.to_string(),
            uri: format!("{POSITION_TOKEN_URI_PREFIX}{mint}/metadata"),
            seller_fee_basis_points: 0,
            creators: None,
            collection: None,
            uses: None,
        },
        false,
        true,
        None,
    )?;

    msg!("Position metadata: mint={}", mint);
    common.revoke_mint_authority()
}

#[derive(Accounts)]
pub struct DepositWithMetadata<'info> {
    pub common: DepositCommon<'info>,

    /// CHECK: created by the token-metadata program at its PDA
    #[account(
        mut,
        seeds = [
            b"metadata",
            metadata_program.key().as_ref(),
            common.user_position_nft_mint.key().as_ref(),
        ],
        bump,
        seeds::program = metadata_program.key(),
    )]
    pub position_metadata_account: UncheckedAccount<'info>,

    pub metadata_program: Program<'info, Metadata>,
}
