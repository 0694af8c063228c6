//! Withdrawal quote math.
//!
//! Mirrors the on-chain arithmetic exactly so off-chain quotes match what
//! `withdraw_b` and `close_position` pay out.

use crate::error::{Error, Result};
use crate::state::{PositionState, ProtoConfigState, VaultPeriodState};
use crate::types::WithdrawalQuote;

// ─── Constants ────────────────────────────────────────────────────────────────

/// Basis-point denominator for every spread.
pub const BPS_DENOMINATOR: u128 = 10_000;
/// Fractional bits of the TWAP fixed-point representation.
pub const Q64_SHIFT: u32 = 64;

// ─── Primitives ───────────────────────────────────────────────────────────────

/// Basis-point share of `amount`, rounded down.
pub fn spread_amount(amount: u64, spread_bps: u16) -> Result<u64> {
    let spread = (amount as u128)
        .checked_mul(spread_bps as u128)
        .ok_or(Error::MathOverflow)?
        / BPS_DENOMINATOR;
    Ok(spread as u64)
}

/// Token B earned over `(i, j)` before fees and before netting past payouts.
pub fn earned_token_b(
    period_i:             &VaultPeriodState,
    period_j:             &VaultPeriodState,
    periodic_drip_amount: u64,
    drip_trigger_spread:  u16,
) -> Result<u64> {
    let elapsed = period_j
        .period_id
        .checked_sub(period_i.period_id)
        .ok_or_else(|| Error::InvalidArgument("period j precedes period i".into()))?;
    if elapsed == 0 {
        return Ok(0);
    }

    let twap_delta = period_j.twap.checked_sub(period_i.twap).ok_or(Error::MathOverflow)?;
    let average_price = twap_delta / elapsed as u128;

    let dripped = periodic_drip_amount.checked_mul(elapsed).ok_or(Error::MathOverflow)?;
    let swapped = dripped - spread_amount(dripped, drip_trigger_spread)?;

    let hi = average_price >> Q64_SHIFT;
    let lo = average_price & (u64::MAX as u128);
    let amount = hi
        .checked_mul(swapped as u128)
        .and_then(|whole| whole.checked_add((lo * swapped as u128) >> Q64_SHIFT))
        .ok_or(Error::MathOverflow)?;
    u64::try_from(amount).map_err(|_| Error::MathOverflow)
}

/// Undripped token A a close would refund at window end `period_id_j`.
pub fn refundable_token_a(position: &PositionState, period_id_j: u64) -> u64 {
    let elapsed = period_id_j.saturating_sub(position.drip_period_id_before_deposit);
    position
        .number_of_swaps
        .saturating_sub(elapsed)
        .saturating_mul(position.periodic_drip_amount)
}

/// Average realized price over `(i, j)` as a float, token B per token A.
pub fn average_price(period_i: &VaultPeriodState, period_j: &VaultPeriodState) -> f64 {
    let elapsed = period_j.period_id.saturating_sub(period_i.period_id);
    if elapsed == 0 {
        return 0.0;
    }
    let delta = period_j.twap.saturating_sub(period_i.twap) as f64;
    delta / (1u128 << Q64_SHIFT) as f64 / elapsed as f64
}

// ─── Quote ────────────────────────────────────────────────────────────────────

/// Everything a withdrawal (or close) of `position` would move right now.
///
/// `period_i` / `period_j` must be the periods of the position's current
/// window, see [`PositionState::withdrawal_window`].
pub fn quote_withdrawal(
    position: &PositionState,
    proto:    &ProtoConfigState,
    period_i: &VaultPeriodState,
    period_j: &VaultPeriodState,
) -> Result<WithdrawalQuote> {
    let earned = earned_token_b(
        period_i,
        period_j,
        position.periodic_drip_amount,
        proto.token_a_drip_trigger_spread,
    )?;
    let gross = earned.saturating_sub(position.withdrawn_token_b_amount);

    let fee = spread_amount(gross, proto.token_b_withdrawal_spread)?;
    let referral_fee = if position.referrer.is_some() {
        spread_amount(fee, proto.token_b_referral_spread)?
    } else {
        0
    };

    Ok(WithdrawalQuote {
        period_id_i:       period_i.period_id,
        period_id_j:       period_j.period_id,
        gross_token_b:     gross,
        treasury_fee:      fee - referral_fee,
        referral_fee,
        user_token_b:      gross - fee,
        refundable_token_a: refundable_token_a(position, period_j.period_id),
        average_price:     average_price(period_i, period_j),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    fn period(period_id: u64, twap: u128) -> VaultPeriodState {
        VaultPeriodState { vault: Pubkey::default(), period_id, dar: 0, twap, drip_timestamp: 1 }
    }

    fn position(referrer: Option<Pubkey>) -> PositionState {
        PositionState {
            vault:                         Pubkey::default(),
            position_authority:            Pubkey::default(),
            referrer,
            deposited_token_a_amount:      1_000,
            withdrawn_token_b_amount:      0,
            deposit_timestamp:             0,
            drip_period_id_before_deposit: 0,
            number_of_swaps:               4,
            periodic_drip_amount:          250,
            is_closed:                     false,
        }
    }

    fn proto() -> ProtoConfigState {
        ProtoConfigState {
            granularity:                 60,
            token_a_drip_trigger_spread: 0,
            token_b_withdrawal_spread:   100,
            token_b_referral_spread:     2_500,
            admin:                       Pubkey::default(),
        }
    }

    #[test]
    fn quote_after_two_drips_at_price_two() {
        let quote = quote_withdrawal(&position(None), &proto(), &period(0, 0), &period(2, 4u128 << 64))
            .unwrap();
        assert_eq!(quote.gross_token_b, 1_000);
        assert_eq!(quote.treasury_fee, 10);
        assert_eq!(quote.referral_fee, 0);
        assert_eq!(quote.user_token_b, 990);
        assert_eq!(quote.refundable_token_a, 500);
        assert!((quote.average_price - 2.0).abs() < 1e-9);
    }

    #[test]
    fn referrer_takes_share_of_fee() {
        let quote = quote_withdrawal(
            &position(Some(Pubkey::new_unique())),
            &proto(),
            &period(0, 0),
            &period(2, 4u128 << 64),
        )
        .unwrap();
        assert_eq!(quote.referral_fee, 2);
        assert_eq!(quote.treasury_fee, 8);
        assert_eq!(quote.user_token_b, 990);
    }

    #[test]
    fn quote_nets_previous_withdrawals() {
        let mut p = position(None);
        p.withdrawn_token_b_amount = 1_000;
        let quote = quote_withdrawal(&p, &proto(), &period(0, 0), &period(2, 4u128 << 64)).unwrap();
        assert_eq!(quote.gross_token_b, 0);
    }

    #[test]
    fn trigger_spread_reduces_swapped_amount() {
        let mut config = proto();
        config.token_a_drip_trigger_spread = 100;
        // 500 dripped, 5 paid to triggers, 495 swapped at price 1
        let earned = earned_token_b(&period(0, 0), &period(2, 2u128 << 64), 250, 100).unwrap();
        assert_eq!(earned, 495);
        let quote = quote_withdrawal(&position(None), &config, &period(0, 0), &period(2, 2u128 << 64))
            .unwrap();
        assert_eq!(quote.gross_token_b, 495);
    }

    #[test]
    fn empty_window_earns_nothing() {
        assert_eq!(earned_token_b(&period(3, 9), &period(3, 9), 250, 0).unwrap(), 0);
        assert!(earned_token_b(&period(4, 0), &period(3, 0), 250, 0).is_err());
    }
}
