use super::EPSILON;
use crate::settings::Rounding;

/// Apply the organization's rounding policy and clamp at zero.
pub fn finalize_amount(amount: f64, policy: Rounding) -> f64 {
    let rounded = match policy {
        Rounding::None => amount,
        Rounding::UpTo10 => round_up_to_10(amount),
    };
    rounded.max(0.0)
}

/// Ceiling to the next multiple of 10; values within `EPSILON` of a multiple stay put.
pub fn round_up_to_10(amount: f64) -> f64 {
    ((amount - EPSILON) / 10.0).ceil() * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_to_the_next_ten() {
        assert_eq!(round_up_to_10(1755.0), 1760.0);
        assert_eq!(round_up_to_10(1751.2), 1760.0);
        assert_eq!(round_up_to_10(1760.0), 1760.0);
    }

    #[test]
    fn rounding_is_idempotent() {
        for v in [0.0, 3.0, 999.99, 1755.0, 2001.0] {
            let once = round_up_to_10(v);
            assert_eq!(round_up_to_10(once), once);
        }
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        assert_eq!(finalize_amount(-120.0, Rounding::UpTo10), 0.0);
        assert_eq!(finalize_amount(-0.5, Rounding::None), 0.0);
    }
}
