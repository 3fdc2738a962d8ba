//! Bus failure taxonomy.

use embedded_hal::i2c::{Error as I2cError, ErrorKind, NoAcknowledgeSource};

/// Legacy numeric code reported for an expired wait.
pub const TIMEOUT_CODE: u8 = 1;

/// Code reported for the hardware bus-error status `0x00`.
///
/// Masked status values are multiples of eight, so this never aliases one,
/// and it keeps every failure code distinct from the zero success code.
pub const BUS_FAULT_CODE: u8 = 0xFF;

/// Failure of a single bus primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// A blocking wait exceeded the timeout budget. The controller was
    /// recovered.
    Timeout,
    /// The device declined its address. A STOP was issued.
    AddressNack(u8),
    /// The device declined a data byte. A STOP was issued.
    DataNack(u8),
    /// Another master won the bus. The controller was recovered.
    ArbitrationLost,
    /// Any other controller status, surfaced verbatim.
    Unclassified(u8),
}

impl BusError {
    /// Numeric status: [`TIMEOUT_CODE`] for timeouts, [`BUS_FAULT_CODE`] for
    /// the bus-error status, the raw controller status otherwise. Never zero.
    pub const fn status_code(self) -> u8 {
        match self {
            Self::Timeout => TIMEOUT_CODE,
            Self::ArbitrationLost => 0x38,
            Self::Unclassified(0x00) => BUS_FAULT_CODE,
            Self::AddressNack(raw) | Self::DataNack(raw) | Self::Unclassified(raw) => raw,
        }
    }
}

impl I2cError for BusError {
    fn kind(&self) -> ErrorKind {
        match *self {
            Self::AddressNack(_) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Self::DataNack(_) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Self::ArbitrationLost => ErrorKind::ArbitrationLoss,
            Self::Unclassified(0x00) => ErrorKind::Bus,
            Self::Timeout | Self::Unclassified(_) => ErrorKind::Other,
        }
    }
}

/// Phase of a composite transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Initial START.
    Start,
    /// SLA+W.
    Address,
    /// Register pointer byte.
    Register,
    /// Payload byte of a register write.
    Data,
    /// Repeated START before the read.
    RepeatedStart,
    /// SLA+R.
    ReadAddress,
    /// Clocking in data bytes.
    Receive,
    /// Final STOP.
    Stop,
}

impl Phase {
    /// Phase attribution code, `None` for the initial START whose failure is
    /// reported through the primitive status code.
    pub const fn code(self) -> Option<u8> {
        match self {
            Self::Start => None,
            Self::Address => Some(2),
            Self::Register | Self::Data => Some(3),
            Self::RepeatedStart => Some(4),
            Self::ReadAddress => Some(5),
            Self::Receive => Some(6),
            Self::Stop => Some(7),
        }
    }
}

/// Failure of a composite register read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransactionError {
    /// Phase that failed.
    pub phase: Phase,
    /// Primitive failure observed in that phase.
    pub cause: BusError,
}

impl TransactionError {
    /// Creates an error for `cause` observed during `phase`.
    pub const fn new(phase: Phase, cause: BusError) -> Self {
        Self { phase, cause }
    }

    /// Caller-facing code: the phase code (2..=7), or the primitive status
    /// code when the initial START failed.
    pub const fn code(self) -> u8 {
        match self.phase.code() {
            Some(code) => code,
            None => self.cause.status_code(),
        }
    }
}

impl I2cError for TransactionError {
    fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_keep_hardware_values() {
        assert_eq!(BusError::Timeout.status_code(), 1);
        assert_eq!(BusError::AddressNack(0x20).status_code(), 0x20);
        assert_eq!(BusError::DataNack(0x30).status_code(), 0x30);
        assert_eq!(BusError::ArbitrationLost.status_code(), 0x38);
        assert_eq!(BusError::Unclassified(0xF8).status_code(), 0xF8);
    }

    #[test]
    fn bus_fault_status_never_reports_zero() {
        assert_eq!(BusError::Unclassified(0x00).status_code(), BUS_FAULT_CODE);

        let start = TransactionError::new(Phase::Start, BusError::Unclassified(0x00));
        assert_eq!(start.code(), BUS_FAULT_CODE);
        assert_ne!(start.code(), 0);
    }

    #[test]
    fn transaction_codes_attribute_the_phase() {
        let timeout = TransactionError::new(Phase::Start, BusError::Timeout);
        assert_eq!(timeout.code(), 1);

        let address = TransactionError::new(Phase::Address, BusError::AddressNack(0x20));
        assert_eq!(address.code(), 2);

        let register = TransactionError::new(Phase::Register, BusError::DataNack(0x30));
        let data = TransactionError::new(Phase::Data, BusError::Timeout);
        assert_eq!(register.code(), 3);
        assert_eq!(data.code(), 3);

        assert_eq!(TransactionError::new(Phase::RepeatedStart, BusError::Timeout).code(), 4);
        assert_eq!(TransactionError::new(Phase::ReadAddress, BusError::AddressNack(0x48)).code(), 5);
        assert_eq!(TransactionError::new(Phase::Receive, BusError::ArbitrationLost).code(), 6);
        assert_eq!(TransactionError::new(Phase::Stop, BusError::Timeout).code(), 7);
    }

    #[test]
    fn errors_map_onto_embedded_hal_kinds() {
        assert_eq!(
            BusError::AddressNack(0x20).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );
        assert_eq!(
            TransactionError::new(Phase::Data, BusError::DataNack(0x30)).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
        );
        assert_eq!(BusError::ArbitrationLost.kind(), ErrorKind::ArbitrationLoss);
        assert_eq!(BusError::Unclassified(0x00).kind(), ErrorKind::Bus);
        assert_eq!(BusError::Timeout.kind(), ErrorKind::Other);
    }
}
