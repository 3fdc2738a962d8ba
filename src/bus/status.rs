//! Decoding of the two-wire status register.

/// Masked status register value reported after each bus phase.
///
/// A status is only meaningful immediately after the phase that produced it;
/// the engine reads it once per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiStatus {
    /// Illegal START/STOP detected (`0x00`).
    BusError,
    /// START transmitted (`0x08`).
    Start,
    /// Repeated START transmitted (`0x10`).
    RepeatedStart,
    /// SLA+W transmitted, ACK received (`0x18`).
    SlaWriteAck,
    /// SLA+W transmitted, NACK received (`0x20`).
    SlaWriteNack,
    /// Data transmitted, ACK received (`0x28`).
    DataSentAck,
    /// Data transmitted, NACK received (`0x30`).
    DataSentNack,
    /// Arbitration lost (`0x38`).
    ArbitrationLost,
    /// SLA+R transmitted, ACK received (`0x40`).
    SlaReadAck,
    /// SLA+R transmitted, NACK received (`0x48`).
    SlaReadNack,
    /// Data received, ACK returned (`0x50`).
    DataReceivedAck,
    /// Data received, NACK returned (`0x58`).
    DataReceivedNack,
    /// No relevant state information (`0xF8`).
    NoInfo,
    /// Any other code, kept verbatim.
    Other(u8),
}

impl TwiStatus {
    /// Decodes a masked status value.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Self::BusError,
            0x08 => Self::Start,
            0x10 => Self::RepeatedStart,
            0x18 => Self::SlaWriteAck,
            0x20 => Self::SlaWriteNack,
            0x28 => Self::DataSentAck,
            0x30 => Self::DataSentNack,
            0x38 => Self::ArbitrationLost,
            0x40 => Self::SlaReadAck,
            0x48 => Self::SlaReadNack,
            0x50 => Self::DataReceivedAck,
            0x58 => Self::DataReceivedNack,
            0xF8 => Self::NoInfo,
            other => Self::Other(other),
        }
    }

    /// Returns the masked register value.
    pub const fn raw(self) -> u8 {
        match self {
            Self::BusError => 0x00,
            Self::Start => 0x08,
            Self::RepeatedStart => 0x10,
            Self::SlaWriteAck => 0x18,
            Self::SlaWriteNack => 0x20,
            Self::DataSentAck => 0x28,
            Self::DataSentNack => 0x30,
            Self::ArbitrationLost => 0x38,
            Self::SlaReadAck => 0x40,
            Self::SlaReadNack => 0x48,
            Self::DataReceivedAck => 0x50,
            Self::DataReceivedNack => 0x58,
            Self::NoInfo => 0xF8,
            Self::Other(raw) => raw,
        }
    }
}

impl From<u8> for TwiStatus {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}
