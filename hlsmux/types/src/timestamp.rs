/*!
    Presentation timestamps and time-base conversion.
*/

use std::time::Duration;

use crate::Rational;

/**
    Presentation timestamp in time_base units.

    This is the raw timestamp value of a frame or packet. To convert to
    a meaningful duration, or to another stream's clock, you need the
    time base the value was stamped in.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

impl Pts {
    /**
        Convert this timestamp from one time base to another.

        Computes `self * from / to` as a single operation with one
        rounding step (half away from zero), using 128-bit intermediates
        so the multiplication cannot overflow. Converting through an
        intermediate base with two calls compounds rounding error;
        convert directly instead.
    */
    #[inline]
    #[must_use]
    pub fn rescale(self, from: Rational, to: Rational) -> Self {
        let num = i128::from(self.0) * i128::from(from.num) * i128::from(to.den);
        let den = i128::from(from.den) * i128::from(to.num);
        Self(div_round_nearest(num, den) as i64)
    }

    /**
        Convert this PTS to a Duration using the given time base.

        Negative values are clamped to zero.
    */
    #[inline]
    pub fn to_duration(self, time_base: Rational) -> Duration {
        if self.0 <= 0 {
            return Duration::ZERO;
        }
        let seconds = self.0 as f64 * time_base.to_f64();
        Duration::from_secs_f64(seconds.max(0.0))
    }
}

impl From<i64> for Pts {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Pts> for i64 {
    fn from(pts: Pts) -> Self {
        pts.0
    }
}

/// Quotient rounded to nearest, halves away from zero. `den` must be positive,
/// which holds for any product of time-base terms.
#[inline]
fn div_round_nearest(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    if num >= 0 {
        (num + den / 2) / den
    } else {
        (num - den / 2) / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MICROS: Rational = Rational::MICROSECONDS;

    #[test]
    fn rescale_zero_is_zero() {
        assert_eq!(Pts(0).rescale(MICROS, Rational::new(1, 30)), Pts(0));
    }

    #[test]
    fn rescale_microseconds_to_video_ticks() {
        // One second of microseconds is 30 ticks at 1/30.
        let pts = Pts(1_000_000).rescale(MICROS, Rational::new(1, 30));
        assert_eq!(pts, Pts(30));
    }

    #[test]
    fn rescale_microseconds_to_audio_ticks() {
        // Half a second at 48 kHz.
        let pts = Pts(500_000).rescale(MICROS, Rational::per_second(48000));
        assert_eq!(pts, Pts(24000));
    }

    #[test]
    fn rescale_rounds_to_nearest() {
        // 49999 us at 1/30 is 1.49997 ticks -> 1; 50001 us is 1.50003 -> 2.
        let tb = Rational::new(1, 30);
        assert_eq!(Pts(49_999).rescale(MICROS, tb), Pts(1));
        assert_eq!(Pts(50_001).rescale(MICROS, tb), Pts(2));
    }

    #[test]
    fn rescale_negative_rounds_away_from_zero() {
        let tb = Rational::new(1, 30);
        assert_eq!(Pts(-50_001).rescale(MICROS, tb), Pts(-2));
        assert_eq!(Pts(-49_999).rescale(MICROS, tb), Pts(-1));
    }

    #[test]
    fn rescale_large_pts_does_not_overflow() {
        // ~292 years of microseconds still rescales without overflow.
        let pts = Pts(i64::MAX / 1000).rescale(MICROS, Rational::new(1, 90000));
        assert!(pts.0 > 0);
    }

    #[test]
    fn rescale_round_trip_within_one_tick() {
        // Microseconds -> sample ticks -> microseconds stays within one
        // sample tick of the original, for every rate and offset tried.
        for rate in [8000, 44100, 48000] {
            let tb = Rational::per_second(rate);
            let tick_us = 1_000_000 / i64::from(rate);
            for pts in [0i64, 1, 567, 22_675, 1_000_000, 3_600_000_000] {
                let there = Pts(pts).rescale(MICROS, tb);
                let back = there.rescale(tb, MICROS);
                let drift = (back.0 - pts).abs();
                assert!(
                    drift <= tick_us,
                    "rate {rate}: {pts} -> {} -> {} (drift {drift})",
                    there.0,
                    back.0
                );
            }
        }
    }

    #[test]
    fn to_duration() {
        assert_eq!(
            Pts(44100).to_duration(Rational::per_second(44100)),
            Duration::from_secs(1)
        );
        assert_eq!(Pts(-5).to_duration(Rational::MICROSECONDS), Duration::ZERO);
    }

    #[test]
    fn pts_ordering() {
        assert!(Pts(100) < Pts(200));
        assert_eq!(Pts(100), Pts(100));
    }
}
