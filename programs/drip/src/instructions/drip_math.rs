use anchor_lang::prelude::*;
use crate::{constants::*, error::DripError};

/// Basis-point share of `amount`, rounded down.
pub fn spread_amount(amount: u64, spread_bps: u16) -> Result<u64> {
    let spread = (amount as u128)
        .checked_mul(spread_bps as u128)
        .ok_or(DripError::MathOverflow)?
        / BPS_DENOMINATOR;
    Ok(spread as u64) // spread_bps < 10_000 keeps this below amount
}

/// `floor(deposit / number_of_swaps)`. The remainder stays in the vault.
pub fn periodic_drip_amount(deposit: u64, number_of_swaps: u64) -> Result<u64> {
    deposit
        .checked_div(number_of_swaps)
        .ok_or_else(|| error!(DripError::NumSwapsIsZero))
}

/// Realized price of a drip as Q64.64: `(token_b << 64) / token_a`.
pub fn compute_price(token_a_amount: u64, token_b_amount: u64) -> Result<u128> {
    require!(token_a_amount > 0, DripError::IncompleteSwap);
    // u64 << 64 always fits in u128
    Ok(((token_b_amount as u128) << Q64_SHIFT) / token_a_amount as u128)
}

/// Extend the cumulative TWAP series by one period.
pub fn next_twap(previous_twap: u128, price: u128) -> Result<u128> {
    previous_twap
        .checked_add(price)
        .ok_or_else(|| error!(DripError::MathOverflow))
}

/// First timestamp at which a vault may drip.
///
/// Snaps `now` down to the granularity boundary; with `next` set, the
/// following boundary is returned instead.
pub fn drip_activation_timestamp(now: i64, granularity: u64, next: bool) -> Result<i64> {
    let granularity = i64::try_from(granularity).map_err(|_| DripError::MathOverflow)?;
    require!(granularity > 0, DripError::InvalidGranularity);
    let boundary = now
        .checked_div(granularity)
        .and_then(|periods| periods.checked_mul(granularity))
        .ok_or(DripError::MathOverflow)?;
    if next {
        boundary
            .checked_add(granularity)
            .ok_or_else(|| error!(DripError::MathOverflow))
    } else {
        Ok(boundary)
    }
}

/// Token A still owed to a position that has run `j - i` of its swaps.
pub fn withdraw_token_a_amount(
    period_id_i: u64,
    period_id_j: u64,
    number_of_swaps: u64,
    periodic_drip_amount: u64,
) -> Result<u64> {
    let elapsed = period_id_j
        .checked_sub(period_id_i)
        .ok_or(DripError::InvalidVaultPeriod)?;
    if number_of_swaps <= elapsed {
        return Ok(0);
    }
    (number_of_swaps - elapsed)
        .checked_mul(periodic_drip_amount)
        .ok_or_else(|| error!(DripError::MathOverflow))
}

/// Total token B a position has earned over the window `(i, j)`.
///
/// The TWAP is cumulative, so the window's average price is
/// `(twap_j - twap_i) / (j - i)`. The token A that actually reached the venue
/// is the dripped amount minus the trigger spread paid out of each drip.
pub fn withdraw_token_b_amount(
    period_id_i: u64,
    period_id_j: u64,
    twap_i: u128,
    twap_j: u128,
    periodic_drip_amount: u64,
    drip_trigger_spread: u16,
) -> Result<u64> {
    let elapsed = period_id_j
        .checked_sub(period_id_i)
        .ok_or(DripError::InvalidVaultPeriod)?;
    if elapsed == 0 {
        return Ok(0);
    }

    let twap_delta = twap_j.checked_sub(twap_i).ok_or(DripError::MathOverflow)?;
    let average_price = twap_delta / elapsed as u128;

    let dripped = periodic_drip_amount
        .checked_mul(elapsed)
        .ok_or(DripError::MathOverflow)?;
    let swapped = dripped - spread_amount(dripped, drip_trigger_spread)?;

    // Split the Q64.64 price so the product never exceeds u128:
    // (hi << 64 | lo) * x >> 64 == hi * x + (lo * x) >> 64
    let hi = average_price >> Q64_SHIFT;
    let lo = average_price & (u64::MAX as u128);
    let amount = hi
        .checked_mul(swapped as u128)
        .and_then(|whole| whole.checked_add((lo * swapped as u128) >> Q64_SHIFT))
        .ok_or(DripError::MathOverflow)?;

    u64::try_from(amount).map_err(|_| error!(DripError::MathOverflow))
}

/// How a token B withdrawal is divided between user, treasury and referrer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalSplit {
    /// Gross amount released from the vault; added to `withdrawn_token_b_amount`.
    pub gross: u64,
    pub treasury_fee: u64,
    pub referral_fee: u64,
    /// Sent to the position owner (gross − both fees).
    pub user: u64,
}

/// Apply the withdrawal fee and carve the referral share out of it.
pub fn split_withdrawal(
    gross: u64,
    withdrawal_spread: u16,
    referral_spread: u16,
    has_referrer: bool,
) -> Result<WithdrawalSplit> {
    let fee = spread_amount(gross, withdrawal_spread)?;
    let referral_fee = if has_referrer {
        spread_amount(fee, referral_spread)?
    } else {
        0
    };
    Ok(WithdrawalSplit {
        gross,
        treasury_fee: fee - referral_fee,
        referral_fee,
        user: gross - fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;
    use test_case::test_case;

    fn q64(x: u128) -> u128 {
        x << 64
    }

    #[test_case(0, 10, 0; "zero deposit")]
    #[test_case(10, 10, 1; "one per swap")]
    #[test_case(10, 100, 0; "more swaps than tokens")]
    #[test_case(3, 2, 1; "odd remainder")]
    #[test_case(19, 10, 1; "large remainder")]
    #[test_case(160, 20, 8; "even split")]
    #[test_case(1_000, 4, 250; "lifecycle deposit")]
    fn periodic_drip_amount_rounds_down(total: u64, swaps: u64, expected: u64) {
        assert_eq!(periodic_drip_amount(total, swaps).unwrap(), expected);
    }

    #[test]
    fn periodic_drip_amount_rejects_zero_swaps() {
        let err = periodic_drip_amount(100, 0).unwrap_err();
        assert_eq!(err, Error::from(DripError::NumSwapsIsZero));
    }

    #[test_case(10_000, 9, 9; "exact")]
    #[test_case(9_999, 10, 9; "floors")]
    #[test_case(1, 4_999, 0; "dust")]
    #[test_case(u64::MAX, 4_999, (u64::MAX as u128 * 4_999 / 10_000) as u64; "no overflow at max")]
    fn spread_amount_floors(amount: u64, spread_bps: u16, expected: u64) {
        assert_eq!(spread_amount(amount, spread_bps).unwrap(), expected);
    }

    #[test]
    fn price_is_q64_ratio() {
        assert_eq!(compute_price(250, 500).unwrap(), q64(2));
        assert_eq!(compute_price(4, 1).unwrap(), q64(1) / 4);
        assert_eq!(compute_price(0, 1).unwrap_err(), Error::from(DripError::IncompleteSwap));
    }

    #[test]
    fn twap_accumulates() {
        let mut twap = 0;
        for price in [q64(2), q64(3), q64(1)] {
            twap = next_twap(twap, price).unwrap();
        }
        assert_eq!(twap, q64(6));
        assert!(next_twap(u128::MAX, 1).is_err());
    }

    #[test_case(1_000, 60, false, 960; "current boundary")]
    #[test_case(1_000, 60, true, 1_020; "next boundary")]
    #[test_case(1_020, 60, true, 1_080; "next from a boundary")]
    #[test_case(7, 1, true, 8; "one second periods")]
    fn activation_snaps_to_granularity(now: i64, granularity: u64, next: bool, expected: i64) {
        assert_eq!(drip_activation_timestamp(now, granularity, next).unwrap(), expected);
    }

    #[test]
    fn activation_rejects_zero_granularity() {
        assert_eq!(
            drip_activation_timestamp(1_000, 0, true).unwrap_err(),
            Error::from(DripError::InvalidGranularity)
        );
    }

    #[test_case(2, 6, 8, 5, 20; "middle of a position")]
    #[test_case(2, 10, 8, 5, 0; "end of a position")]
    #[test_case(2, 11, 8, 5, 0; "past the end of a position")]
    #[test_case(0, 0, 4, 250, 1_000; "nothing dripped yet")]
    fn token_a_remaining(i: u64, j: u64, swaps: u64, periodic: u64, expected: u64) {
        assert_eq!(withdraw_token_a_amount(i, j, swaps, periodic).unwrap(), expected);
    }

    #[test]
    fn token_a_rejects_reversed_window() {
        assert_eq!(
            withdraw_token_a_amount(3, 2, 4, 250).unwrap_err(),
            Error::from(DripError::InvalidVaultPeriod)
        );
    }

    #[test_case(0, 4, 0, q64(100), 4, 400; "four periods at price 25")]
    #[test_case(1, 3, q64(5), q64(11), 10, 60; "average of 2 and 4")]
    #[test_case(2, 2, q64(5), q64(5), 10, 0; "empty window")]
    fn token_b_from_cumulative_twap(
        i: u64,
        j: u64,
        twap_i: u128,
        twap_j: u128,
        periodic: u64,
        expected: u64,
    ) {
        assert_eq!(withdraw_token_b_amount(i, j, twap_i, twap_j, periodic, 0).unwrap(), expected);
    }

    #[test]
    fn token_b_excludes_trigger_spread() {
        // dripped 1000, spread 10 bps → 999 reached the venue, at price 2
        assert_eq!(withdraw_token_b_amount(0, 1, 0, q64(2), 1_000, 10).unwrap(), 1_998);
    }

    #[test]
    fn token_b_keeps_fractional_prices() {
        // price 0.5 over 3 periods of 7
        let twap = q64(3) / 2;
        assert_eq!(withdraw_token_b_amount(0, 3, 0, twap, 7, 0).unwrap(), 10);
    }

    #[test]
    fn split_routes_referral_share_of_fee() {
        let split = split_withdrawal(10_000, 100, 2_500, true).unwrap();
        assert_eq!(
            split,
            WithdrawalSplit { gross: 10_000, treasury_fee: 75, referral_fee: 25, user: 9_900 }
        );

        let split = split_withdrawal(10_000, 100, 2_500, false).unwrap();
        assert_eq!(split.treasury_fee, 100);
        assert_eq!(split.referral_fee, 0);
        assert_eq!(split.user, 9_900);
    }
}
