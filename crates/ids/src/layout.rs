//! Bit layout of a snowflake identifier.
//!
//! ```text
//!  63   62 ........ 22   21 .. 17   16 .. 12   11 ....... 0
//! [0 ][ timestamp (41) ][ dc (5)  ][ wk (5)  ][ seq (12)   ]
//! ```

use cairn_types::Identifier;

pub const TIMESTAMP_BITS: u32 = 41;
pub const DATACENTER_BITS: u32 = 5;
pub const WORKER_BITS: u32 = 5;
pub const SEQUENCE_BITS: u32 = 12;

pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;
pub const MAX_DATACENTER_ID: u8 = (1 << DATACENTER_BITS) - 1;
pub const MAX_WORKER_ID: u8 = (1 << WORKER_BITS) - 1;
pub const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;

/// Number of distinct worker ids (modulus for derived workers).
pub const WORKER_ID_SPACE: u32 = 1 << WORKER_BITS;

const WORKER_SHIFT: u32 = SEQUENCE_BITS;
const DATACENTER_SHIFT: u32 = SEQUENCE_BITS + WORKER_BITS;
const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + WORKER_BITS + DATACENTER_BITS;

/// Decomposed fields of an [`Identifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnowflakeParts {
    /// Milliseconds since the generator epoch.
    pub timestamp_ms: u64,
    pub datacenter_id: u8,
    pub worker_id: u8,
    pub sequence: u16,
}

impl SnowflakeParts {
    /// Pack into an identifier. Fields wider than their slot are masked.
    pub fn compose(&self) -> Identifier {
        let value = ((self.timestamp_ms & MAX_TIMESTAMP) << TIMESTAMP_SHIFT)
            | (u64::from(self.datacenter_id & MAX_DATACENTER_ID) << DATACENTER_SHIFT)
            | (u64::from(self.worker_id & MAX_WORKER_ID) << WORKER_SHIFT)
            | u64::from(self.sequence & MAX_SEQUENCE);
        Identifier::new(value)
    }

    /// Split an identifier into its fields.
    pub fn decompose(id: Identifier) -> Self {
        let value = id.get();
        SnowflakeParts {
            timestamp_ms: (value >> TIMESTAMP_SHIFT) & MAX_TIMESTAMP,
            datacenter_id: ((value >> DATACENTER_SHIFT) & u64::from(MAX_DATACENTER_ID)) as u8,
            worker_id: ((value >> WORKER_SHIFT) & u64::from(MAX_WORKER_ID)) as u8,
            sequence: (value & u64::from(MAX_SEQUENCE)) as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_land_in_their_slots() {
        let parts = SnowflakeParts {
            timestamp_ms: 1,
            datacenter_id: 1,
            worker_id: 1,
            sequence: 1,
        };
        let expected = (1u64 << 22) | (1 << 17) | (1 << 12) | 1;
        assert_eq!(parts.compose().get(), expected);
        assert_eq!(SnowflakeParts::decompose(parts.compose()), parts);
    }

    #[test]
    fn sign_bit_stays_clear() {
        let parts = SnowflakeParts {
            timestamp_ms: MAX_TIMESTAMP,
            datacenter_id: MAX_DATACENTER_ID,
            worker_id: MAX_WORKER_ID,
            sequence: MAX_SEQUENCE,
        };
        assert_eq!(parts.compose().get(), u64::MAX >> 1);
    }

    #[test]
    fn decomposes_known_identifier() {
        let parts = SnowflakeParts::decompose(Identifier::new(27826800289787904));
        assert_eq!(parts.timestamp_ms, 6_634_426_186);
        assert_eq!(parts.datacenter_id, 1);
        assert_eq!(parts.worker_id, 3);
        assert_eq!(parts.sequence, 0);
    }
}
