/*!
    Rational number type for time bases.
*/

use std::fmt;

/**
    A rational number represented as a numerator and denominator.

    Used for stream time bases — e.g. 1/30 for 30 fps video ticks,
    1/44100 for audio sample ticks, 1/1000000 for a microsecond clock.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /// Microsecond clock, the time base encoders stamp frames in.
    pub const MICROSECONDS: Self = Self::new(1, 1_000_000);

    /**
        Create a new rational number.

        # Panics

        Panics if `den` is zero.
    */
    #[inline]
    pub const fn new(num: i32, den: i32) -> Self {
        assert!(den != 0, "denominator cannot be zero");
        Self { num, den }
    }

    /**
        Time base of a stream ticking `rate` times per second,
        i.e. `1/rate`. Audio streams use this with their sample rate.

        # Panics

        Panics if `rate` is zero.
    */
    #[inline]
    pub const fn per_second(rate: i32) -> Self {
        Self::new(1, rate)
    }

    /**
        Invert the rational (swap numerator and denominator).

        # Panics

        Panics if the numerator is zero.
    */
    #[inline]
    pub const fn invert(self) -> Self {
        assert!(self.num != 0, "cannot invert zero");
        Self {
            num: self.den,
            den: self.num,
        }
    }

    /**
        Convert to f64.
    */
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl From<(i32, i32)> for Rational {
    fn from((num, den): (i32, i32)) -> Self {
        Self::new(num, den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rational() {
        let r = Rational::new(1, 30);
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 30);
    }

    #[test]
    #[should_panic(expected = "denominator cannot be zero")]
    fn zero_denominator_panics() {
        Rational::new(1, 0);
    }

    #[test]
    fn per_second_is_one_over_rate() {
        let r = Rational::per_second(44100);
        assert_eq!(r, Rational::new(1, 44100));
    }

    #[test]
    fn microseconds_constant() {
        assert_eq!(Rational::MICROSECONDS, Rational::new(1, 1_000_000));
    }

    #[test]
    fn invert() {
        assert_eq!(Rational::new(1, 30).invert(), Rational::new(30, 1));
    }

    #[test]
    #[should_panic(expected = "cannot invert zero")]
    fn invert_zero_panics() {
        Rational::new(0, 1).invert();
    }

    #[test]
    fn to_f64_conversion() {
        assert_eq!(Rational::new(1, 2).to_f64(), 0.5);
        assert_eq!(Rational::new(1, 1000).to_f64(), 0.001);
    }

    #[test]
    fn from_tuple() {
        let r: Rational = (1, 90000).into();
        assert_eq!(r, Rational::new(1, 90000));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Rational::new(1, 44100)), "1/44100");
    }
}
