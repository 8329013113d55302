//! Integer money math. Amounts are `i128` in the pool asset's smallest unit;
//! every derived quantity floors, so rounding dust stays with the protocol.

/// Seconds in the 365-day reward year.
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

/// Basis-point denominator (10_000 bp = 100%).
pub const BPS_DENOMINATOR: i128 = 10_000;

/// `floor(amount * bps / 10_000)`. Used for the deposit fee and the
/// duration-rate origination fee.
pub fn bps_share(amount: i128, bps: u32) -> Option<i128> {
    amount
        .checked_mul(bps as i128)?
        .checked_div(BPS_DENOMINATOR)
}

/// Linear (non-compounding) reward accrued on `amount` at `apr_bps` over
/// `elapsed` seconds: `floor(amount * apr_bps * elapsed / (10_000 * year))`.
/// A single final division, so truncation happens exactly once.
pub fn accrued_reward(amount: i128, apr_bps: u32, elapsed: u64) -> Option<i128> {
    amount
        .checked_mul(apr_bps as i128)?
        .checked_mul(elapsed as i128)?
        .checked_div(BPS_DENOMINATOR.checked_mul(SECONDS_PER_YEAR as i128)?)
}

/// Maximum principal a collateral valuation supports:
/// `floor(value * ltv / 100)` with `ltv` a whole percentage.
pub fn max_principal(collateral_value: i128, ltv: u32) -> Option<i128> {
    collateral_value.checked_mul(ltv as i128)?.checked_div(100)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bps_share_floors_in_protocol_favor() {
        // 25 bp of 100.000000 units (6 decimals) is exactly 0.250000
        assert_eq!(bps_share(100_000_000, 25), Some(250_000));
        // 33 bp of 101 smallest units truncates the dust
        assert_eq!(bps_share(101, 33), Some(0));
        assert_eq!(bps_share(10_001, 33), Some(33));
        assert_eq!(bps_share(0, 500), Some(0));
    }

    #[test]
    fn reward_is_zero_at_deposit_instant() {
        assert_eq!(accrued_reward(5_000, 1_200, 0), Some(0));
    }

    #[test]
    fn reward_after_a_full_year_is_exact() {
        // 5000 units at 12% APR for 365 days
        assert_eq!(accrued_reward(5_000, 1_200, SECONDS_PER_YEAR), Some(600));
    }

    #[test]
    fn reward_truncates_partial_periods() {
        // 5000 * 1200 * 100d / (10_000 * 365d) = 164.38... -> 164
        assert_eq!(accrued_reward(5_000, 1_200, 100 * 86_400), Some(164));
        // sub-unit accrual floors to zero rather than minting dust
        assert_eq!(accrued_reward(1, 1_200, 3_600), Some(0));
    }

    #[test]
    fn reward_scales_with_token_decimals() {
        // 5000.000000 units at 12% for a year
        assert_eq!(
            accrued_reward(5_000_000_000, 1_200, SECONDS_PER_YEAR),
            Some(600_000_000)
        );
    }

    #[test]
    fn max_principal_floors() {
        assert_eq!(max_principal(100, 70), Some(70));
        assert_eq!(max_principal(100_000_000, 70), Some(70_000_000));
        assert_eq!(max_principal(99, 70), Some(69));
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        assert_eq!(bps_share(i128::MAX, 2), None);
        assert_eq!(accrued_reward(i128::MAX, 10_000, SECONDS_PER_YEAR), None);
        assert_eq!(max_principal(i128::MAX, 99), None);
    }
}
