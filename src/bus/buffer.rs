//! Receive buffer filled by burst reads.

/// Maximum number of bytes a single read transaction can buffer.
pub const RECEIVE_CAPACITY: usize = 32;

/// Fixed-capacity byte buffer with a read cursor.
///
/// `available() <= len() <= RECEIVE_CAPACITY` holds at all times. The buffer
/// is refilled by every read transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveBuffer {
    data: [u8; RECEIVE_CAPACITY],
    available: u8,
    total: u8,
}

impl ReceiveBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            data: [0; RECEIVE_CAPACITY],
            available: 0,
            total: 0,
        }
    }

    /// Discards all buffered bytes.
    pub fn clear(&mut self) {
        self.available = 0;
        self.total = 0;
    }

    /// Appends a byte, extending the fill extent. Returns `false` when full.
    pub fn push(&mut self, byte: u8) -> bool {
        let index = usize::from(self.total);
        if index >= RECEIVE_CAPACITY {
            return false;
        }
        self.data[index] = byte;
        self.total += 1;
        self.available += 1;
        true
    }

    /// Consumes the next unread byte; an exhausted buffer yields `0`.
    pub fn receive(&mut self) -> u8 {
        if self.available == 0 {
            return 0;
        }
        let index = usize::from(self.total - self.available);
        self.available -= 1;
        self.data[index]
    }

    /// Number of unread bytes.
    pub fn available(&self) -> u8 {
        self.available
    }

    /// Number of bytes stored by the last transaction.
    pub fn len(&self) -> usize {
        usize::from(self.total)
    }

    /// Whether the last transaction stored nothing.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Bytes stored by the last transaction, read or not.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len()]
    }
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receive_consumes_in_order_then_yields_zero() {
        let mut buffer = ReceiveBuffer::new();
        assert!(buffer.push(0x12));
        assert!(buffer.push(0x34));
        assert_eq!(buffer.available(), 2);

        assert_eq!(buffer.receive(), 0x12);
        assert_eq!(buffer.available(), 1);
        assert_eq!(buffer.receive(), 0x34);
        assert_eq!(buffer.receive(), 0);
        assert_eq!(buffer.available(), 0);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.as_slice(), &[0x12, 0x34]);
    }

    #[test]
    fn push_stops_at_capacity() {
        let mut buffer = ReceiveBuffer::new();
        for i in 0..RECEIVE_CAPACITY {
            assert!(buffer.push(i as u8));
        }
        assert!(!buffer.push(0xFF));
        assert_eq!(buffer.len(), RECEIVE_CAPACITY);
        assert_eq!(usize::from(buffer.available()), RECEIVE_CAPACITY);
    }

    #[test]
    fn clear_resets_cursor_and_extent() {
        let mut buffer = ReceiveBuffer::new();
        buffer.push(1);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.receive(), 0);
    }
}
