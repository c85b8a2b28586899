// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

/// Two decimal digits as the RTC and the time signals carry them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitPair {
    pub tens: u8,
    pub units: u8,
}

impl DigitPair {
    pub const fn new(tens: u8, units: u8) -> Self {
        Self { tens, units }
    }

    /// Splits `value` into digits. Values above 99 keep only their last two digits.
    pub const fn from_value(value: u8) -> Self {
        let value = value % 100;
        Self {
            tens: value / 10,
            units: value % 10,
        }
    }

    pub const fn value(&self) -> u8 {
        self.tens * 10 + self.units
    }

    pub const fn is_decimal(&self) -> bool {
        self.tens <= 9 && self.units <= 9
    }
}

/// Calendar date and time of day as decoded from a sentence or a frame.
///
/// Calendar validity is not checked here, a decoder only guarantees every digit is 0-9.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedTime {
    pub second: DigitPair,
    pub minute: DigitPair,
    pub hour: DigitPair,
    pub day: DigitPair,
    pub month: DigitPair,
    /// Two-digit year, century 2000 assumed.
    pub year: DigitPair,
}

impl DecodedTime {
    pub fn is_decimal(&self) -> bool {
        [self.second, self.minute, self.hour, self.day, self.month, self.year]
            .iter()
            .all(DigitPair::is_decimal)
    }
}

/// A fully verified [`DecodedTime`] waiting to be committed.
///
/// `settle_ticks` counts down in 10 ms ticks; the value may only be committed once it reaches zero so
/// the write to the clock lands on the second boundary the receiver reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingTime {
    pub time: DecodedTime,
    pub settle_ticks: u8,
}

impl PendingTime {
    pub const fn new(time: DecodedTime, settle_ticks: u8) -> Self {
        Self { time, settle_ticks }
    }

    pub const fn is_settled(&self) -> bool {
        self.settle_ticks == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_pair_value_conversions() {
        assert_eq!(DigitPair::from_value(47), DigitPair::new(4, 7));
        assert_eq!(DigitPair::new(2, 3).value(), 23);
        assert_eq!(DigitPair::from_value(123), DigitPair::new(2, 3));
    }

    #[test]
    fn out_of_range_digit_is_not_decimal() {
        let mut time = DecodedTime::default();
        assert!(time.is_decimal());
        time.month.units = 10;
        assert!(!time.is_decimal());
    }
}
