use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::{
    constants::*,
    error::DripError,
    instructions::drip_math::{split_withdrawal, WithdrawalSplit},
    state::{Position, Vault, VaultPeriod, VaultProtoConfig},
};

/// Token B owed to `position` for the window `(period_i, period_j)`, split
/// into user, treasury and referral shares. Fails before any funds move if
/// the position is closed or the window is not its current one.
pub fn withdrawal_split(
    vault_key: &Pubkey,
    vault: &Vault,
    proto_config: &VaultProtoConfig,
    position: &Position,
    period_i: &VaultPeriod,
    period_j: &VaultPeriod,
) -> Result<WithdrawalSplit> {
    position.check_withdrawal(vault_key, vault.last_drip_period, period_i, period_j)?;
    let gross = position.withdrawable_token_b(
        period_i,
        period_j,
        proto_config.token_a_drip_trigger_spread,
    )?;
    split_withdrawal(
        gross,
        proto_config.token_b_withdrawal_spread,
        proto_config.token_b_referral_spread,
        position.referrer.is_some(),
    )
}

/// `withdrawal_split` for `withdraw_b`, which refuses to pay nothing.
pub fn payable_withdrawal(
    vault_key: &Pubkey,
    vault: &Vault,
    proto_config: &VaultProtoConfig,
    position: &Position,
    period_i: &VaultPeriod,
    period_j: &VaultPeriod,
) -> Result<WithdrawalSplit> {
    let split = withdrawal_split(vault_key, vault, proto_config, position, period_i, period_j)?;
    require!(split.gross > 0, DripError::WithdrawableAmountIsZero);
    Ok(split)
}

/// Everything a close moves, computed up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseSettlement {
    pub withdrawal: WithdrawalSplit,
    /// Undripped token A returned to the owner
    pub refund_token_a: u64,
    /// The position still feeds the vault's drip amount and must be retired
    pub retire_drip: bool,
}

pub fn close_settlement(
    vault_key: &Pubkey,
    vault: &Vault,
    proto_config: &VaultProtoConfig,
    position: &Position,
    period_i: &VaultPeriod,
    period_j: &VaultPeriod,
    expiry_period: &VaultPeriod,
) -> Result<CloseSettlement> {
    let withdrawal = withdrawal_split(vault_key, vault, proto_config, position, period_i, period_j)?;

    position.check_expiry_period(expiry_period)?;

    Ok(CloseSettlement {
        withdrawal,
        refund_token_a: position.refundable_token_a(period_j.period_id)?,
        retire_drip: period_j.period_id < expiry_period.period_id,
    })
}

/// Apply a close to the ledger: record the final payout, pull the position
/// out of the pooled drip amount if it has not expired, and mark it closed.
pub fn apply_close(
    vault: &mut Vault,
    expiry_period: &mut VaultPeriod,
    position: &mut Position,
    settlement: &CloseSettlement,
) -> Result<()> {
    position.record_withdrawal(settlement.withdrawal.gross)?;
    if settlement.retire_drip {
        vault.decrease_drip_amount(position.periodic_drip_amount)?;
        expiry_period.decrease_dar(position.periodic_drip_amount)?;
    }
    position.close()
}

/// Who signed a withdrawal or close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settler {
    /// Owner of the position token account
    Holder,
    /// Proto config admin closing for the holder
    Admin,
}

/// The position token's holder may always settle. On a close the proto
/// config admin may act for them.
pub fn settler(signer: &Pubkey, holder: &Pubkey, admin: &Pubkey, admin_may_close: bool) -> Result<Settler> {
    if signer == holder {
        Ok(Settler::Holder)
    } else if admin_may_close && signer == admin {
        Ok(Settler::Admin)
    } else {
        err!(DripError::InvalidOwner)
    }
}

/// A position with a referrer must be settled with that referrer account.
pub fn check_referrer(expected: Option<Pubkey>, supplied: Option<Pubkey>) -> Result<()> {
    if expected.is_some() {
        require!(supplied == expected, DripError::InvalidReferrer);
    }
    Ok(())
}

impl<'info> WithdrawCommon<'info> {
    /// The position must be open and held in `user_position_nft_account`,
    /// the signer must be allowed to settle it, and every payout account
    /// (token B plus `destinations`) must belong to the holder.
    pub fn check_holder(&self, admin_may_close: bool, destinations: &[Pubkey]) -> Result<Settler> {
        require!(!self.user_position.is_closed, DripError::PositionAlreadyClosed);
        require!(
            self.user_position_nft_account.amount == 1,
            DripError::PositionBalanceIsZero
        );
        check_referrer(
            self.user_position.referrer,
            self.referrer.as_ref().map(|account| account.key()),
        )?;

        let holder = self.user_position_nft_account.owner;
        let settler = settler(
            &self.withdrawer.key(),
            &holder,
            &self.vault_proto_config.admin,
            admin_may_close,
        )?;
        require_keys_eq!(self.user_token_b_account.owner, holder, DripError::InvalidOwner);
        for owner in destinations {
            require_keys_eq!(*owner, holder, DripError::InvalidOwner);
        }
        Ok(settler)
    }

    /// Transfer a withdrawal's shares out of the vault's token B account.
    pub fn pay_out(&self, split: &WithdrawalSplit, signer: &[&[&[u8]]]) -> Result<()> {
        self.transfer_token_b(&self.user_token_b_account.to_account_info(), split.user, signer)?;
        self.transfer_token_b(
            &self.vault_treasury_token_b_account.to_account_info(),
            split.treasury_fee,
            signer,
        )?;
        if let Some(referrer) = self.referrer.as_ref() {
            self.transfer_token_b(&referrer.to_account_info(), split.referral_fee, signer)?;
        }
        Ok(())
    }

    fn transfer_token_b(
        &self,
        to: &AccountInfo<'info>,
        amount: u64,
        signer: &[&[&[u8]]],
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.vault_token_b_account.to_account_info(),
                    to: to.clone(),
                    authority: self.vault.to_account_info(),
                },
                signer,
            ),
            amount,
        )
    }
}

/// Accounts shared by `withdraw_b` and `close_position`.
#[derive(Accounts)]
pub struct WithdrawCommon<'info> {
    /// Holder of the position token, or the proto config admin on a close.
    /// Receives the rent of the closed position token account.
    #[account(mut)]
    pub withdrawer: Signer<'info>,

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

    #[account(
        constraint = vault_proto_config.key() == vault.proto_config
            @ DripError::InvalidVaultProtoConfigReference,
    )]
    pub vault_proto_config: Box<Account<'info, VaultProtoConfig>>,

    /// Window start: the period the position was deposited after
    pub vault_period_i: Box<Account<'info, VaultPeriod>>,

    /// Window end: min(last drip period, position expiry)
    pub vault_period_j: Box<Account<'info, VaultPeriod>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, user_position.position_authority.as_ref()],
        bump = user_position.bump,
    )]
    pub user_position: Box<Account<'info, Position>>,

    #[account(
        mut,
        constraint = user_position_nft_account.mint == user_position.position_authority
            @ DripError::InvalidMint,
    )]
    pub user_position_nft_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = vault.token_b_account @ DripError::IncorrectVaultTokenAccount,
    )]
    pub vault_token_b_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = vault.treasury_token_b_account @ DripError::IncorrectVaultTokenAccount,
    )]
    pub vault_treasury_token_b_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = user_token_b_account.mint == vault.token_b_mint @ DripError::InvalidMint,
    )]
    pub user_token_b_account: Box<Account<'info, TokenAccount>>,

    /// Must match the position's referrer when it has one
    #[account(
        mut,
        constraint = referrer.mint == vault.token_b_mint @ DripError::InvalidMint,
    )]
    pub referrer: Option<Box<Account<'info, TokenAccount>>>,

    pub token_program: Program<'info, Token>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    struct Fixture {
        vault_key: Pubkey,
        vault: Vault,
        proto_config: VaultProtoConfig,
        position: Position,
        periods: Vec<VaultPeriod>,
    }

    /// 1000 token A over 4 swaps, deposited at period 0, with `dripped`
    /// periods at price 2 already on the ledger.
    fn fixture(dripped: u64) -> Fixture {
        let vault_key = Pubkey::new_unique();
        let mut proto_config = VaultProtoConfig::default();
        proto_config.init(1, 0, 100, 2_500, Pubkey::new_unique()).unwrap();

        let mut position = Position::default();
        position
            .init(vault_key, Pubkey::new_unique(), None, 1_000, 0, 4, 0, 1)
            .unwrap();

        let mut vault = Vault { drip_amount: 250, ..Vault::default() };
        let mut periods: Vec<VaultPeriod> = (0..=4)
            .map(|id| VaultPeriod { vault: vault_key, period_id: id, ..VaultPeriod::default() })
            .collect();
        periods[4].dar = 250;

        for id in 1..=dripped as usize {
            let previous = periods[id - 1].twap;
            let current = periods[id].clone();
            vault.process_drip(&current, 1, id as i64).unwrap();
            periods[id].record_drip(previous, 250, 500, id as i64).unwrap();
        }
        Fixture { vault_key, vault, proto_config, position, periods }
    }

    #[test]
    fn withdrawal_pays_fee_to_treasury_without_referrer() {
        let f = fixture(2);
        let split = withdrawal_split(
            &f.vault_key, &f.vault, &f.proto_config, &f.position, &f.periods[0], &f.periods[2],
        )
        .unwrap();
        assert_eq!(split.gross, 1_000);
        assert_eq!(split.treasury_fee, 10);
        assert_eq!(split.referral_fee, 0);
        assert_eq!(split.user, 990);
    }

    #[test]
    fn withdrawal_shares_fee_with_referrer() {
        let mut f = fixture(2);
        f.position.referrer = Some(Pubkey::new_unique());
        let split = withdrawal_split(
            &f.vault_key, &f.vault, &f.proto_config, &f.position, &f.periods[0], &f.periods[2],
        )
        .unwrap();
        assert_eq!(split.referral_fee, 2);
        assert_eq!(split.treasury_fee, 8);
    }

    #[test]
    fn withdrawal_rejects_stale_window() {
        let f = fixture(2);
        let err = withdrawal_split(
            &f.vault_key, &f.vault, &f.proto_config, &f.position, &f.periods[0], &f.periods[1],
        )
        .unwrap_err();
        assert_eq!(err, Error::from(DripError::InvalidVaultPeriod));
    }

    #[test]
    fn withdrawing_twice_pays_once() {
        let mut f = fixture(2);
        let split = payable_withdrawal(
            &f.vault_key, &f.vault, &f.proto_config, &f.position, &f.periods[0], &f.periods[2],
        )
        .unwrap();
        f.position.record_withdrawal(split.gross).unwrap();

        let err = payable_withdrawal(
            &f.vault_key, &f.vault, &f.proto_config, &f.position, &f.periods[0], &f.periods[2],
        )
        .unwrap_err();
        assert_eq!(err, Error::from(DripError::WithdrawableAmountIsZero));
    }

    #[test]
    fn close_mid_window_refunds_and_retires() {
        let mut f = fixture(1);
        let settlement = close_settlement(
            &f.vault_key, &f.vault, &f.proto_config, &f.position,
            &f.periods[0], &f.periods[1], &f.periods[4],
        )
        .unwrap();
        assert_eq!(settlement.withdrawal.gross, 500);
        assert_eq!(settlement.refund_token_a, 750);
        assert!(settlement.retire_drip);

        let mut expiry = f.periods[4].clone();
        apply_close(&mut f.vault, &mut expiry, &mut f.position, &settlement).unwrap();
        assert_eq!(f.vault.drip_amount, 0);
        assert_eq!(expiry.dar, 0);
        assert!(f.position.is_closed);
        assert_eq!(f.position.withdrawn_token_b_amount, 500);
    }

    #[test]
    fn close_after_expiry_leaves_drip_bookkeeping_alone() {
        let mut f = fixture(4);
        assert_eq!(f.vault.drip_amount, 0);

        let settlement = close_settlement(
            &f.vault_key, &f.vault, &f.proto_config, &f.position,
            &f.periods[0], &f.periods[4], &f.periods[4],
        )
        .unwrap();
        assert_eq!(settlement.withdrawal.gross, 2_000);
        assert_eq!(settlement.refund_token_a, 0);
        assert!(!settlement.retire_drip);

        let mut expiry = f.periods[4].clone();
        apply_close(&mut f.vault, &mut expiry, &mut f.position, &settlement).unwrap();
        assert_eq!(expiry.dar, 250);
    }

    #[test]
    fn only_holder_withdraws_but_admin_may_close() {
        let (holder, admin, stranger) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        assert_eq!(settler(&holder, &holder, &admin, false).unwrap(), Settler::Holder);
        assert_eq!(settler(&holder, &holder, &admin, true).unwrap(), Settler::Holder);
        assert_eq!(settler(&admin, &holder, &admin, true).unwrap(), Settler::Admin);

        let expected = Error::from(DripError::InvalidOwner);
        assert_eq!(settler(&admin, &holder, &admin, false).unwrap_err(), expected);
        assert_eq!(settler(&stranger, &holder, &admin, true).unwrap_err(), expected);
    }

    #[test]
    fn referred_position_needs_its_referrer() {
        let referrer = Pubkey::new_unique();
        check_referrer(None, None).unwrap();
        check_referrer(None, Some(Pubkey::new_unique())).unwrap();
        check_referrer(Some(referrer), Some(referrer)).unwrap();

        let expected = Error::from(DripError::InvalidReferrer);
        assert_eq!(check_referrer(Some(referrer), None).unwrap_err(), expected);
        assert_eq!(check_referrer(Some(referrer), Some(Pubkey::new_unique())).unwrap_err(), expected);
    }

    #[test]
    fn close_requires_the_expiry_period() {
        let f = fixture(1);
        let err = close_settlement(
            &f.vault_key, &f.vault, &f.proto_config, &f.position,
            &f.periods[0], &f.periods[1], &f.periods[3],
        )
        .unwrap_err();
        assert_eq!(err, Error::from(DripError::InvalidVaultPeriod));
    }
}
