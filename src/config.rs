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

use crate::calendar::ZoneOffset;

/// Receiver latency compensation for RMC sentences, in 10 ms ticks.
pub const DEFAULT_SENTENCE_SETTLE_TICKS: u8 = 80;

/// How long a successful sync is trusted, in ~100 ms main cycles (24 hours).
pub const DEFAULT_FRESHNESS_CYCLES: u32 = 10 * 60 * 60 * 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    ZoneOffsetOutOfRange(i8),
    ZeroFreshnessWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncConfig {
    pub zone_offset: ZoneOffset,
    pub freshness_cycles: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            zone_offset: ZoneOffset::UTC,
            freshness_cycles: DEFAULT_FRESHNESS_CYCLES,
        }
    }
}

impl SyncConfig {
    pub fn with_zone_offset_hours(self, hours: i8) -> Result<Self, ConfigError> {
        Ok(Self {
            zone_offset: ZoneOffset::new(hours)?,
            ..self
        })
    }

    pub fn with_freshness_cycles(self, cycles: u32) -> Result<Self, ConfigError> {
        if cycles == 0 {
            return Err(ConfigError::ZeroFreshnessWindow);
        }
        Ok(Self {
            freshness_cycles: cycles,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_values() {
        let config = SyncConfig::default().with_zone_offset_hours(-5).unwrap();
        assert_eq!(config.zone_offset.hours(), -5);
        assert_eq!(config.freshness_cycles, DEFAULT_FRESHNESS_CYCLES);

        assert_eq!(
            SyncConfig::default().with_zone_offset_hours(30),
            Err(ConfigError::ZoneOffsetOutOfRange(30))
        );
        assert_eq!(
            SyncConfig::default().with_freshness_cycles(0),
            Err(ConfigError::ZeroFreshnessWindow)
        );
    }
}
