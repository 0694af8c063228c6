//! End-to-end vault lifecycles driven through the program's state types.
//!
//! `Harness` performs the same ledger steps as the instruction handlers,
//! with token balances kept in plain counters and a venue that pays
//! 2 token B per token A less a 0.3 % pool fee.

use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use drip::{
    error::DripError,
    instructions::{
        drip_math::{spread_amount, WithdrawalSplit},
        settlement::{apply_close, check_referrer, close_settlement, payable_withdrawal, CloseSettlement},
    },
    state::{Position, Vault, VaultPeriod, VaultProtoConfig},
};

const PERIODS: u64 = 8;

#[derive(Debug, Default)]
struct Balances {
    vault_a: u64,
    vault_b: u64,
    user_a: u64,
    user_b: u64,
    treasury_b: u64,
    trigger_a: u64,
}

struct Harness {
    vault_key: Pubkey,
    swap: Pubkey,
    proto: VaultProtoConfig,
    vault: Vault,
    periods: Vec<VaultPeriod>,
    balances: Balances,
}

fn venue_out(amount_in: u64) -> u64 {
    (amount_in as u128 * 2 * 997 / 1_000) as u64
}

impl Harness {
    /// Granularity 1 and spreads (10, 10, 10), the vault created at t = 0.
    fn new() -> Self {
        let mut proto = VaultProtoConfig::default();
        proto.init(1, 10, 10, 10, Pubkey::new_unique()).unwrap();

        let vault_key = Pubkey::new_unique();
        let mut vault = Vault::default();
        vault
            .init(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                &[],
                100,
                100,
                proto.granularity,
                0,
                255,
            )
            .unwrap();

        let periods = (0..=PERIODS)
            .map(|id| {
                vault.check_new_period(id).unwrap();
                let mut period = VaultPeriod::default();
                period.init(vault_key, id, 255);
                period
            })
            .collect();

        Harness {
            vault_key,
            swap: Pubkey::new_unique(),
            proto,
            vault,
            periods,
            balances: Balances { user_a: 10_000, ..Balances::default() },
        }
    }

    fn deposit(&mut self, amount: u64, swaps: u64, now: i64) -> Result<Position> {
        let end_period = self.vault.last_drip_period + swaps;
        self.deposit_into(amount, swaps, end_period, now)
    }

    /// Deposit with the caller's choice of end period account.
    fn deposit_into(&mut self, amount: u64, swaps: u64, end_period: u64, now: i64) -> Result<Position> {
        let mut position = Position::default();
        position.init(
            self.vault_key,
            Pubkey::new_unique(),
            None,
            amount,
            self.vault.last_drip_period,
            swaps,
            now,
            255,
        )?;
        let end_period = end_period as usize;
        position.check_expiry_period(&self.periods[end_period])?;
        self.vault.increase_drip_amount(position.periodic_drip_amount)?;
        self.periods[end_period].increase_dar(position.periodic_drip_amount)?;

        self.balances.user_a -= amount;
        self.balances.vault_a += amount;
        Ok(position)
    }

    fn drip(&mut self, now: i64) -> Result<()> {
        let last = self.vault.last_drip_period;
        self.drip_pair(last, last + 1, now)
    }

    fn drip_pair(&mut self, last: u64, current: u64, now: i64) -> Result<()> {
        let (last, current) = (last as usize, current as usize);
        self.vault.check_drip(
            &self.vault_key,
            &self.periods[last],
            &self.periods[current],
            &self.swap,
            None,
            now,
        )?;

        let drip_amount = self.vault.drip_amount;
        let trigger_fee = spread_amount(drip_amount, self.proto.token_a_drip_trigger_spread)?;
        let swap_amount = drip_amount - trigger_fee;
        let current_period = self.periods[current].clone();
        self.vault.process_drip(&current_period, self.proto.granularity, now)?;

        let received = venue_out(swap_amount);
        self.balances.vault_a -= drip_amount;
        self.balances.trigger_a += trigger_fee;
        self.balances.vault_b += received;

        let previous_twap = self.periods[last].twap;
        self.periods[current].record_drip(previous_twap, swap_amount, received, now)
    }

    fn window(&self, position: &Position) -> Result<(usize, usize)> {
        let (i, j) = position.withdrawal_window(self.vault.last_drip_period)?;
        Ok((i as usize, j as usize))
    }

    fn withdraw(&mut self, position: &mut Position) -> Result<WithdrawalSplit> {
        let (i, j) = self.window(position)?;
        let split = payable_withdrawal(
            &self.vault_key,
            &self.vault,
            &self.proto,
            position,
            &self.periods[i],
            &self.periods[j],
        )?;
        position.record_withdrawal(split.gross)?;
        self.pay(&split);
        Ok(split)
    }

    fn close(&mut self, position: &mut Position) -> Result<CloseSettlement> {
        let (i, j) = self.window(position)?;
        let expiry = position.expiry_period_id()? as usize;
        let settlement = close_settlement(
            &self.vault_key,
            &self.vault,
            &self.proto,
            position,
            &self.periods[i],
            &self.periods[j],
            &self.periods[expiry],
        )?;
        apply_close(&mut self.vault, &mut self.periods[expiry], position, &settlement)?;

        self.pay(&settlement.withdrawal);
        self.balances.vault_a -= settlement.refund_token_a;
        self.balances.user_a += settlement.refund_token_a;
        Ok(settlement)
    }

    fn pay(&mut self, split: &WithdrawalSplit) {
        self.balances.vault_b -= split.gross;
        self.balances.user_b += split.user;
        self.balances.treasury_b += split.treasury_fee + split.referral_fee;
    }
}

#[test]
fn first_drip_swaps_one_slice() {
    let mut h = Harness::new();
    let position = h.deposit(1_000, 4, 0).unwrap();
    assert_eq!(position.periodic_drip_amount, 250);
    assert_eq!(h.vault.drip_amount, 250);

    h.drip(1).unwrap();

    assert_eq!(h.balances.vault_a, 750);
    assert_eq!(h.balances.vault_b, 498);
    assert_eq!(h.vault.last_drip_period, 1);
    assert!(h.periods[1].twap > 0);
    assert_eq!(h.periods[1].drip_timestamp, 1);
    assert_eq!(h.vault.drip_activation_timestamp, 2);
}

#[test]
fn withdrawal_after_one_drip_leaves_rounding_dust() {
    let mut h = Harness::new();
    let mut position = h.deposit(1_000, 4, 0).unwrap();
    h.drip(1).unwrap();

    let split = h.withdraw(&mut position).unwrap();
    assert_eq!(split.gross, 497);
    assert_eq!(split.user, 497);
    assert_eq!(h.balances.vault_b, 1);
    assert_eq!(position.withdrawn_token_b_amount, 497);

    let err = h.withdraw(&mut position).unwrap_err();
    assert_eq!(err, Error::from(DripError::WithdrawableAmountIsZero));
}

#[test]
fn drip_after_expiry_has_nothing_to_swap() {
    let mut h = Harness::new();
    h.deposit(1_000, 4, 0).unwrap();
    for now in 1..=4 {
        h.drip(now).unwrap();
    }
    assert_eq!(h.vault.last_drip_period, 4);
    assert_eq!(h.vault.drip_amount, 0);
    assert_eq!(h.balances.vault_a, 0);

    let err = h.drip(5).unwrap_err();
    assert_eq!(err, Error::from(DripError::PeriodicDripAmountIsZero));
}

#[test]
fn deposit_against_the_wrong_end_period_is_rejected() {
    let mut h = Harness::new();
    let err = h.deposit_into(1_000, 4, 5, 0).unwrap_err();
    assert_eq!(err, Error::from(DripError::InvalidVaultPeriod));
    assert_eq!(h.vault.drip_amount, 0);
    assert!(h.periods.iter().all(|period| period.dar == 0));
    assert_eq!(h.balances.user_a, 10_000);
}

#[test]
fn empty_vault_reports_nothing_to_swap_before_activation() {
    let mut h = Harness::new();
    h.deposit(1_000, 1, 0).unwrap();
    h.drip(1).unwrap();
    assert_eq!(h.vault.drip_amount, 0);
    assert_eq!(h.vault.drip_activation_timestamp, 2);

    // Still inside period 1, but an empty vault is the first thing reported
    let err = h.drip(1).unwrap_err();
    assert_eq!(err, Error::from(DripError::PeriodicDripAmountIsZero));
}

#[test]
fn drip_through_an_unlisted_pool_is_rejected() {
    let mut h = Harness::new();
    h.deposit(1_000, 4, 0).unwrap();
    h.vault.set_whitelisted_swaps(&[Pubkey::new_unique()]).unwrap();

    let err = h.drip(1).unwrap_err();
    assert_eq!(err, Error::from(DripError::InvalidSwapAccount));
    assert_eq!(h.vault.last_drip_period, 0);
    assert_eq!(h.balances.vault_a, 1_000);

    let listed = h.swap;
    h.vault.set_whitelisted_swaps(&[Pubkey::new_unique(), listed]).unwrap();
    h.drip(1).unwrap();
    assert_eq!(h.vault.last_drip_period, 1);
}

#[test]
fn referred_position_settles_only_with_its_referrer() {
    let mut h = Harness::new();
    let mut position = h.deposit(1_000, 4, 0).unwrap();
    let referrer = Pubkey::new_unique();
    position.referrer = Some(referrer);
    h.drip(1).unwrap();

    let err = check_referrer(position.referrer, Some(Pubkey::new_unique())).unwrap_err();
    assert_eq!(err, Error::from(DripError::InvalidReferrer));
    let err = check_referrer(position.referrer, None).unwrap_err();
    assert_eq!(err, Error::from(DripError::InvalidReferrer));

    check_referrer(position.referrer, Some(referrer)).unwrap();
    let split = h.withdraw(&mut position).unwrap();
    assert_eq!(split.gross, 497);
}

#[test]
fn replayed_drip_is_rejected_without_moving_funds() {
    let mut h = Harness::new();
    h.deposit(1_000, 4, 0).unwrap();
    h.drip_pair(0, 1, 1).unwrap();
    let (vault_a, vault_b) = (h.balances.vault_a, h.balances.vault_b);

    let err = h.drip_pair(0, 1, 2).unwrap_err();
    assert_eq!(err, Error::from(DripError::DuplicateDrip));
    assert_eq!((h.balances.vault_a, h.balances.vault_b), (vault_a, vault_b));
    assert_eq!(h.vault.last_drip_period, 1);
}

#[test]
fn out_of_sequence_drip_is_rejected() {
    let mut h = Harness::new();
    h.deposit(1_000, 4, 0).unwrap();

    let err = h.drip_pair(1, 2, 1).unwrap_err();
    assert_eq!(err, Error::from(DripError::InvalidVaultPeriod));
    assert_eq!(h.vault.last_drip_period, 0);
    assert_eq!(h.vault.drip_amount, 250);
}

#[test]
fn drip_waits_for_the_next_period_boundary() {
    let mut h = Harness::new();
    h.deposit(1_000, 4, 0).unwrap();
    h.drip(1).unwrap();

    let err = h.drip(1).unwrap_err();
    assert_eq!(err, Error::from(DripError::DuplicateDrip));
    h.drip(2).unwrap();
}

#[test]
fn withdrawing_an_empty_window_fails() {
    let mut h = Harness::new();
    let mut position = h.deposit(1_000, 4, 0).unwrap();
    assert_eq!(h.window(&position).unwrap(), (0, 0));

    let err = h.withdraw(&mut position).unwrap_err();
    assert_eq!(err, Error::from(DripError::WithdrawableAmountIsZero));
}

#[test]
fn close_before_any_drip_refunds_everything() {
    let mut h = Harness::new();
    let mut position = h.deposit(1_000, 4, 0).unwrap();

    let settlement = h.close(&mut position).unwrap();
    assert_eq!(settlement.refund_token_a, 1_000);
    assert_eq!(settlement.withdrawal.gross, 0);
    assert!(position.is_closed);
    assert_eq!(h.vault.drip_amount, 0);
    assert_eq!(h.periods[4].dar, 0);
    assert_eq!(h.balances.user_a, 10_000);

    let err = h.close(&mut position).unwrap_err();
    assert_eq!(err, Error::from(DripError::PositionAlreadyClosed));
}

#[test]
fn close_mid_window_settles_both_tokens() {
    let mut h = Harness::new();
    let mut position = h.deposit(1_000, 4, 0).unwrap();
    h.drip(1).unwrap();

    let settlement = h.close(&mut position).unwrap();
    assert_eq!(settlement.withdrawal.gross, 497);
    assert_eq!(settlement.refund_token_a, 750);
    assert!(settlement.retire_drip);
    assert_eq!(h.vault.drip_amount, 0);
    assert_eq!(h.balances.vault_a, 0);

    // Retired positions no longer feed later drips
    let err = h.drip(2).unwrap_err();
    assert_eq!(err, Error::from(DripError::PeriodicDripAmountIsZero));
}

#[test]
fn deposit_dust_stays_in_the_vault() {
    let mut h = Harness::new();
    let mut position = h.deposit(1_003, 4, 0).unwrap();
    for now in 1..=4 {
        h.drip(now).unwrap();
    }

    let settlement = h.close(&mut position).unwrap();
    assert_eq!(settlement.refund_token_a, 0);
    assert!(!settlement.retire_drip);
    assert_eq!(h.balances.vault_a, 3);
}

#[test]
fn staggered_positions_keep_drip_amount_consistent() {
    let mut h = Harness::new();
    let mut first = h.deposit(1_000, 4, 0).unwrap();
    h.drip(1).unwrap();

    let mut second = h.deposit(600, 2, 1).unwrap();
    assert_eq!(second.drip_period_id_before_deposit, 1);
    assert_eq!(second.expiry_period_id().unwrap(), 3);
    assert_eq!(h.vault.drip_amount, 550);

    h.drip(2).unwrap();
    assert_eq!(h.vault.drip_amount, 550);
    h.drip(3).unwrap();
    assert_eq!(h.vault.drip_amount, 250);
    h.drip(4).unwrap();
    assert_eq!(h.vault.drip_amount, 0);
    assert_eq!(h.balances.vault_a, 0);

    // The second position's window stops at its expiry
    assert_eq!(h.window(&second).unwrap(), (1, 3));
    let second_out = h.withdraw(&mut second).unwrap();
    let first_out = h.withdraw(&mut first).unwrap();
    assert!(second_out.gross > 0 && first_out.gross > 0);
    assert_eq!(
        h.balances.user_b + h.balances.treasury_b + h.balances.vault_b,
        venue_out(250) * 2 + venue_out(550) * 2
    );
}
