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

//! Byte-driven decoder for RMC sentences from a satellite receiver.
//!
//! Only the time field, the date field and the trailing checksum are consumed:
//!
//! ```text
//! $GPRMC,hhmmss.ss,V,,,,,,,ddmmyy,,,N*CS
//! ```
//!
//! The checksum is the XOR of every byte between `$` and `*`, both exclusive.

use crate::digits::{DecodedTime, DigitPair, PendingTime};
use log::{debug, trace};

const ALLOWED_BYTES: &[u8] = b"$*.,0123456789ABCDEFGMNPRSVW";

const SENTENCE_START: u8 = b'$';
const CHECKSUM_MARKER: u8 = b'*';
const FIELD_SEPARATOR: u8 = b',';

const HEADER_LEN: u8 = 6;
const ACCEPTED_HEADERS: [&[u8; HEADER_LEN as usize]; 2] = [b"GPRMC,", b"GNRMC,"];

const DIGIT_FIELD_LEN: u8 = 6;
/// Separators between the end of the time digits and the start of the date digits.
const SEPARATORS_BEFORE_DATE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SentenceState {
    /// Waiting for the next `$`.
    IdleError,
    Name,
    Time,
    Between,
    Date,
    Tail,
    Checksum,
}

pub struct SentenceDecoder {
    state: SentenceState,
    position: u8,
    checksum: u8,
    expected_checksum: u8,
    scratch: DecodedTime,
    settle_ticks: u8,
}

fn decimal_digit(byte: u8) -> Option<u8> {
    byte.is_ascii_digit().then(|| byte - b'0')
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn set_digit(pairs: [&mut DigitPair; 3], position: u8, digit: u8) {
    let [first, second, third] = pairs;
    match position {
        0 => first.tens = digit,
        1 => first.units = digit,
        2 => second.tens = digit,
        3 => second.units = digit,
        4 => third.tens = digit,
        _ => third.units = digit,
    }
}

impl SentenceDecoder {
    /// `settle_ticks` is attached to every decoded time to compensate for receiver and parse latency.
    pub const fn new(settle_ticks: u8) -> Self {
        Self {
            state: SentenceState::IdleError,
            position: 0,
            checksum: 0,
            expected_checksum: 0,
            scratch: DecodedTime {
                second: DigitPair::new(0, 0),
                minute: DigitPair::new(0, 0),
                hour: DigitPair::new(0, 0),
                day: DigitPair::new(0, 0),
                month: DigitPair::new(0, 0),
                year: DigitPair::new(0, 0),
            },
            settle_ticks,
        }
    }

    pub fn state(&self) -> SentenceState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = SentenceState::IdleError;
    }

    fn fail(&mut self) {
        trace!("sentence discarded in state {:?} at position {}", self.state, self.position);
        self.state = SentenceState::IdleError;
    }

    fn advance(&mut self, next: SentenceState) {
        self.state = next;
        self.position = 0;
    }

    /// Consumes one received byte. Returns the decoded time when this byte completes a sentence with
    /// a matching checksum.
    pub fn feed(&mut self, byte: u8) -> Option<PendingTime> {
        if !ALLOWED_BYTES.contains(&byte) {
            self.state = SentenceState::IdleError;
            return None;
        }

        if byte == SENTENCE_START {
            self.advance(SentenceState::Name);
            self.checksum = 0;
            return None;
        }

        match self.state {
            SentenceState::IdleError => {}
            SentenceState::Name => {
                self.checksum ^= byte;
                let position = usize::from(self.position);
                if !ACCEPTED_HEADERS.iter().any(|header| header[position] == byte) {
                    self.fail();
                    return None;
                }
                self.position += 1;
                if self.position == HEADER_LEN {
                    self.advance(SentenceState::Time);
                }
            }
            SentenceState::Time | SentenceState::Date => {
                self.checksum ^= byte;
                let Some(digit) = decimal_digit(byte) else {
                    self.fail();
                    return None;
                };
                let time = &mut self.scratch;
                if self.state == SentenceState::Time {
                    set_digit([&mut time.hour, &mut time.minute, &mut time.second], self.position, digit);
                } else {
                    set_digit([&mut time.day, &mut time.month, &mut time.year], self.position, digit);
                }
                self.position += 1;
                if self.position == DIGIT_FIELD_LEN {
                    let next = if self.state == SentenceState::Time {
                        SentenceState::Between
                    } else {
                        SentenceState::Tail
                    };
                    self.advance(next);
                }
            }
            SentenceState::Between => {
                self.checksum ^= byte;
                if byte == FIELD_SEPARATOR {
                    self.position += 1;
                    if self.position == SEPARATORS_BEFORE_DATE {
                        self.advance(SentenceState::Date);
                    }
                }
            }
            SentenceState::Tail => {
                if byte == CHECKSUM_MARKER {
                    self.advance(SentenceState::Checksum);
                    self.expected_checksum = 0;
                } else {
                    self.checksum ^= byte;
                }
            }
            SentenceState::Checksum => {
                let Some(nibble) = hex_digit(byte) else {
                    self.fail();
                    return None;
                };
                if self.position == 0 {
                    self.expected_checksum = nibble << 4;
                    self.position += 1;
                    return None;
                }

                self.expected_checksum |= nibble;
                self.state = SentenceState::IdleError;
                if self.expected_checksum != self.checksum {
                    debug!(
                        "sentence checksum mismatch, computed {:02X} received {:02X}",
                        self.checksum, self.expected_checksum
                    );
                    return None;
                }
                trace!("sentence decoded: {:?}", self.scratch);
                debug_assert!(self.scratch.is_decimal());
                return Some(PendingTime::new(self.scratch, self.settle_ticks));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &[u8] = b"$GPRMC,182600.00,V,,,,,,,210916,,,N*7D\r\n";

    fn feed_all(decoder: &mut SentenceDecoder, bytes: &[u8]) -> Option<PendingTime> {
        let mut decoded = None;
        for &byte in bytes {
            if let Some(pending) = decoder.feed(byte) {
                decoded = Some(pending);
            }
        }
        decoded
    }

    fn expected() -> DecodedTime {
        DecodedTime {
            second: DigitPair::new(0, 0),
            minute: DigitPair::new(2, 6),
            hour: DigitPair::new(1, 8),
            day: DigitPair::new(2, 1),
            month: DigitPair::new(0, 9),
            year: DigitPair::new(1, 6),
        }
    }

    #[test]
    fn decodes_reference_sentence() {
        let mut decoder = SentenceDecoder::new(80);
        let pending = feed_all(&mut decoder, SENTENCE).expect("sentence should decode");
        assert_eq!(pending.time, expected());
        assert!(pending.time.is_decimal());
        assert_eq!(pending.settle_ticks, 80);
        assert_eq!(decoder.state(), SentenceState::IdleError);
    }

    #[test]
    fn commit_happens_on_last_checksum_digit() {
        let mut decoder = SentenceDecoder::new(0);
        let checksum_end = SENTENCE.iter().position(|&b| b == b'*').unwrap() + 2;
        for &byte in &SENTENCE[..checksum_end] {
            assert_eq!(decoder.feed(byte), None);
        }
        assert!(decoder.feed(SENTENCE[checksum_end]).is_some());
    }

    #[test]
    fn corrupted_checksum_is_discarded() {
        let mut decoder = SentenceDecoder::new(80);
        let corrupted = b"$GPRMC,182600.00,V,,,,,,,210916,,,N*7E";
        assert_eq!(feed_all(&mut decoder, corrupted), None);
        assert_eq!(decoder.state(), SentenceState::IdleError);
    }

    #[test]
    fn corrupted_payload_is_discarded() {
        let mut decoder = SentenceDecoder::new(80);
        let corrupted = b"$GPRMC,182700.00,V,,,,,,,210916,,,N*7D";
        assert_eq!(feed_all(&mut decoder, corrupted), None);
    }

    #[test]
    fn byte_outside_alphabet_resets_and_next_sentence_decodes() {
        let mut decoder = SentenceDecoder::new(80);
        assert_eq!(feed_all(&mut decoder, b"$GPRMC,1826"), None);
        assert_eq!(decoder.state(), SentenceState::Time);
        assert_eq!(decoder.feed(b'x'), None);
        assert_eq!(decoder.state(), SentenceState::IdleError);
        // the rest of the broken sentence must not resume decoding
        assert_eq!(feed_all(&mut decoder, b"00.00,V,,,,,,,210916,,,N*7D"), None);

        let pending = feed_all(&mut decoder, SENTENCE).expect("next sentence should decode");
        assert_eq!(pending.time, expected());
    }

    #[test]
    fn sentence_start_restarts_mid_sentence() {
        let mut decoder = SentenceDecoder::new(80);
        let mut bytes = b"$GPRMC,1826".to_vec();
        bytes.extend_from_slice(SENTENCE);
        let pending = feed_all(&mut decoder, &bytes).expect("restarted sentence should decode");
        assert_eq!(pending.time, expected());
    }

    #[test]
    fn other_sentence_types_are_ignored() {
        let mut decoder = SentenceDecoder::new(80);
        assert_eq!(feed_all(&mut decoder, b"$GPGSV,1,1,00*79"), None);
        assert_eq!(decoder.state(), SentenceState::IdleError);
        // right third character, wrong type
        assert_eq!(feed_all(&mut decoder, b"$GPRMA,182600.00,V,,,,,,,210916,,,N*7F"), None);
    }

    #[test]
    fn combined_talker_is_accepted() {
        let mut decoder = SentenceDecoder::new(80);
        let pending = feed_all(&mut decoder, b"$GNRMC,182600.00,V,,,,,,,210916,,,N*63").expect("GN talker");
        assert_eq!(pending.time, expected());
    }

    #[test]
    fn non_digit_in_time_field_is_discarded() {
        let mut decoder = SentenceDecoder::new(80);
        assert_eq!(feed_all(&mut decoder, b"$GPRMC,18A600.00,V,,,,,,,210916,,,N*0E"), None);
        assert_eq!(decoder.state(), SentenceState::IdleError);
    }

    #[test]
    fn non_hex_checksum_digit_is_discarded() {
        let mut decoder = SentenceDecoder::new(80);
        assert_eq!(feed_all(&mut decoder, b"$GPRMC,182600.00,V,,,,,,,210916,,,N*7G"), None);
        assert_eq!(decoder.state(), SentenceState::IdleError);
    }

    #[test]
    fn fix_data_between_time_and_date_is_skipped() {
        let mut decoder = SentenceDecoder::new(5);
        let sentence = b"$GPRMC,092750.000,A,5321.6802,N,00630.3372,W,0.02,31.66,280511,,,A*43";
        let pending = feed_all(&mut decoder, sentence).expect("full fix sentence");
        assert_eq!(pending.time.hour, DigitPair::new(0, 9));
        assert_eq!(pending.time.minute, DigitPair::new(2, 7));
        assert_eq!(pending.time.second, DigitPair::new(5, 0));
        assert_eq!(pending.time.day, DigitPair::new(2, 8));
        assert_eq!(pending.time.month, DigitPair::new(0, 5));
        assert_eq!(pending.time.year, DigitPair::new(1, 1));
        assert_eq!(pending.settle_ticks, 5);
    }
}
