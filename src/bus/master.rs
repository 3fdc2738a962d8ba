//! Phase-by-phase master transactions with lock-up recovery.

use super::buffer::{RECEIVE_CAPACITY, ReceiveBuffer};
use super::error::{BusError, Phase, TransactionError};
use super::status::TwiStatus;
use super::{BusAddress, TwiRegisters};
use crate::clock::Millis;
use crate::log::{debug, warning};
use crate::params::TwiPrescaler;
use crate::registers::Control;

/// Blocking two-wire master.
///
/// Every wait on the controller is a busy-spin bounded by the timeout budget
/// (milliseconds, `0` disables enforcement). On expiry, or when arbitration is
/// lost, the controller is cleared and re-enabled so the next [`start`]
/// begins from a clean state.
///
/// All bus traffic must originate from a single execution context; the
/// engine is not reentrant.
///
/// [`start`]: TwoWireMaster::start
pub struct TwoWireMaster<HW, CLK> {
    hw: HW,
    clock: CLK,
    timeout_ms: u16,
    buffer: ReceiveBuffer,
    recoveries: u32,
}

impl<HW, CLK> TwoWireMaster<HW, CLK>
where
    HW: TwiRegisters,
    CLK: Millis,
{
    // ==================================================================
    // == Construction & Lifecycle ======================================
    // ==================================================================
    /// Creates an engine around the peripheral and time base.
    pub fn new(hw: HW, clock: CLK, timeout_ms: u16) -> Self {
        Self {
            hw,
            clock,
            timeout_ms,
            buffer: ReceiveBuffer::new(),
            recoveries: 0,
        }
    }

    /// Programs the bit rate (prescaler 1) and enables the peripheral with
    /// acknowledge.
    ///
    /// The peripheral does not pull the lines up. Either fit external
    /// resistors on SDA and SCL or enable the pin pull-ups before calling
    /// this (`PORTC4`/`PORTC5` on the ATmega328P). The internal pull-ups are
    /// weak and only suit short wiring at 100 kHz.
    pub fn begin(&mut self, bit_rate: u8) {
        self.hw.set_bit_rate(bit_rate, TwiPrescaler::Div1);
        self.hw.set_control(Control::enabled());
    }

    /// Disables the peripheral, releasing both bus lines.
    pub fn end(&mut self) {
        self.hw.set_control(Control::new());
    }

    /// Consumes the engine and returns the peripheral and time base.
    pub fn release(self) -> (HW, CLK) {
        (self.hw, self.clock)
    }

    /// Provides mutable access to the underlying peripheral.
    pub fn hardware_mut(&mut self) -> &mut HW {
        &mut self.hw
    }

    /// Timeout budget in milliseconds.
    pub fn timeout(&self) -> u16 {
        self.timeout_ms
    }

    /// Replaces the timeout budget; `0` disables enforcement.
    pub fn set_timeout(&mut self, timeout_ms: u16) {
        self.timeout_ms = timeout_ms;
    }

    /// Number of lock-up recoveries performed so far.
    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    // ==================================================================
    // == Primitives ====================================================
    // ==================================================================
    /// Issues a START or repeated START condition.
    pub fn start(&mut self) -> Result<(), BusError> {
        self.hw.set_control(Control::start());
        self.wait_for(|control| control.twint())?;

        match TwiStatus::from_raw(self.hw.status()) {
            TwiStatus::Start | TwiStatus::RepeatedStart => Ok(()),
            TwiStatus::ArbitrationLost => {
                self.recover();
                Err(BusError::ArbitrationLost)
            }
            other => Err(BusError::Unclassified(other.raw())),
        }
    }

    /// Clocks out an address byte (7-bit address plus direction bit).
    pub fn send_address(&mut self, address_byte: u8) -> Result<(), BusError> {
        self.hw.set_data(address_byte);
        self.hw.set_control(Control::transfer());
        self.wait_for(|control| control.twint())?;

        match TwiStatus::from_raw(self.hw.status()) {
            TwiStatus::SlaWriteAck | TwiStatus::SlaReadAck => Ok(()),
            status @ (TwiStatus::SlaWriteNack | TwiStatus::SlaReadNack) => {
                self.stop_after_nack();
                Err(BusError::AddressNack(status.raw()))
            }
            other => Err(self.recover_from(other)),
        }
    }

    /// Clocks out one data byte.
    pub fn send_byte(&mut self, byte: u8) -> Result<(), BusError> {
        self.hw.set_data(byte);
        self.hw.set_control(Control::transfer());
        self.wait_for(|control| control.twint())?;

        match TwiStatus::from_raw(self.hw.status()) {
            TwiStatus::DataSentAck => Ok(()),
            TwiStatus::DataSentNack => {
                self.stop_after_nack();
                Err(BusError::DataNack(TwiStatus::DataSentNack.raw()))
            }
            other => Err(self.recover_from(other)),
        }
    }

    /// Clocks in one byte, acknowledging it when `ack` is set.
    ///
    /// The last byte of a read must be received with `ack == false` so the
    /// slave releases the data line before the STOP.
    pub fn receive_byte(&mut self, ack: bool) -> Result<u8, BusError> {
        let control = if ack {
            Control::transfer_ack()
        } else {
            Control::transfer()
        };
        self.hw.set_control(control);
        self.wait_for(|control| control.twint())?;

        match (TwiStatus::from_raw(self.hw.status()), ack) {
            (TwiStatus::DataReceivedAck, true) | (TwiStatus::DataReceivedNack, false) => {
                Ok(self.hw.data())
            }
            (TwiStatus::ArbitrationLost, _) => {
                self.recover();
                Err(BusError::ArbitrationLost)
            }
            (other, _) => Err(BusError::Unclassified(other.raw())),
        }
    }

    /// Issues a STOP condition and waits for the controller to finish it.
    pub fn stop(&mut self) -> Result<(), BusError> {
        self.hw.set_control(Control::stop());
        self.wait_for(|control| !control.twsto())
    }

    // ==================================================================
    // == Register Transactions =========================================
    // ==================================================================
    /// Writes one byte to a device register:
    /// `S [SLA+W] [register] [data] P`.
    pub fn write(
        &mut self,
        address: BusAddress,
        register: u8,
        data: u8,
    ) -> Result<(), TransactionError> {
        self.start().map_err(at(Phase::Start))?;
        self.send_address(address.write_byte())
            .map_err(at(Phase::Address))?;
        self.send_byte(register).map_err(at(Phase::Register))?;
        self.send_byte(data).map_err(at(Phase::Data))?;
        self.stop().map_err(at(Phase::Stop))
    }

    /// Reads `count` consecutive registers into the receive buffer:
    /// `S [SLA+W] [register] Sr [SLA+R] [data..] P`.
    ///
    /// `count` is clamped to `1..=RECEIVE_CAPACITY`. Bytes are appended as
    /// they arrive, so a failed read leaves the bytes received before the
    /// failure in the buffer.
    pub fn read(
        &mut self,
        address: BusAddress,
        register: u8,
        count: u8,
    ) -> Result<(), TransactionError> {
        let count = count.clamp(1, RECEIVE_CAPACITY as u8);
        self.buffer.clear();

        self.start().map_err(at(Phase::Start))?;
        self.send_address(address.write_byte())
            .map_err(at(Phase::Address))?;
        self.send_byte(register).map_err(at(Phase::Register))?;
        self.start().map_err(at(Phase::RepeatedStart))?;
        self.send_address(address.read_byte())
            .map_err(at(Phase::ReadAddress))?;

        for index in 0..count {
            let last = index + 1 == count;
            let byte = self.receive_byte(!last).map_err(at(Phase::Receive))?;
            self.buffer.push(byte);
        }

        self.stop().map_err(at(Phase::Stop))
    }

    /// Next unread byte of the last read, `0` once exhausted.
    pub fn receive(&mut self) -> u8 {
        self.buffer.receive()
    }

    /// Number of unread bytes left from the last read.
    pub fn available(&self) -> u8 {
        self.buffer.available()
    }

    /// Everything the last read stored.
    pub fn received(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn wait_for(&mut self, done: fn(Control) -> bool) -> Result<(), BusError> {
        let started = self.clock.now_ms();
        while !done(self.hw.control()) {
            if self.timeout_ms == 0 {
                continue;
            }
            if self.clock.now_ms().wrapping_sub(started) >= u32::from(self.timeout_ms) {
                warning!("two-wire phase timed out after {=u16} ms", self.timeout_ms);
                self.recover();
                return Err(BusError::Timeout);
            }
        }
        Ok(())
    }

    // The NACK is the error reported to the caller; a STOP that then stalls
    // has already been recovered by `wait_for` and is only logged.
    fn stop_after_nack(&mut self) {
        if let Err(_err) = self.stop() {
            warning!("STOP after NACK failed: {}", _err);
        }
    }

    fn recover_from(&mut self, status: TwiStatus) -> BusError {
        self.recover();
        match status {
            TwiStatus::ArbitrationLost => BusError::ArbitrationLost,
            other => BusError::Unclassified(other.raw()),
        }
    }

    // Releases SDA/SCL, then re-enables the controller ready for a START.
    fn recover(&mut self) {
        self.hw.set_control(Control::new());
        self.hw.set_control(Control::enabled());
        self.recoveries = self.recoveries.wrapping_add(1);
        debug!("two-wire controller recovered ({=u32} total)", self.recoveries);
    }
}

fn at(phase: Phase) -> impl FnOnce(BusError) -> TransactionError {
    move |cause| TransactionError::new(phase, cause)
}
