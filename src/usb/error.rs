use thiserror::Error;

pub type Result<T, E = DescriptorError> = std::result::Result<T, E>;

/// Errors produced while parsing or mutating a descriptor tree.
///
/// Unknown descriptor kinds are deliberately *not* represented here: a
/// vendor-specific record inside an interface's data area is skipped (and
/// logged), not treated as a failure.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("truncated descriptor: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A sub-descriptor declaring a length of zero. Advancing by the
    /// declared length would stall the parse loop forever, so it is rejected
    /// outright.
    #[error("zero-length descriptor at offset {at:#x}")]
    ZeroLength { at: usize },

    #[error("unexpected descriptor kind {found:#04x}, expected {expected:#04x}")]
    UnexpectedKind { expected: u8, found: u8 },

    /// Every endpoint slot of the interface is occupied and none matches the
    /// address of the endpoint being inserted.
    #[error("no free endpoint slot on interface {interface} ({slots} slots declared)")]
    EndpointSlotsFull { interface: u8, slots: u8 },
}
