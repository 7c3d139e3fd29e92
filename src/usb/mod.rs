//! The Universal Serial Bus (USB) descriptor module.
//!
//! The layouts here are common to all USB hosts and devices (though
//! individual records may be specific to only 2.0 or 3.2). Everything is
//! little endian on the wire; the `#[repr(C, packed)]` records below match
//! the wire layout byte for byte and are read and written through [plain].
//!
//! See the crate-level documentation for the acronyms used to refer to
//! specific documents.
pub use self::device::{DeviceStrings, US_ENGLISH};
pub use self::endpoint::{Endpoint, EndpointDescriptor, EndpointTy, ENDP_ATTR_TY_MASK};
pub use self::error::{DescriptorError, Result};
pub use self::hid::{Hid, HidDescriptor, HidReportReference, HID_DESC_TY_REPORT};
pub use self::interface::{Interface, InterfaceDescriptor};
pub use self::parse::DescriptorCursor;

/// Enumerates the descriptor kinds this crate knows how to navigate. (See
/// USB32 Sections 9.5 and 9.6)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum DescriptorKind {
    /// A Device Descriptor. (USB32 9.6.1)
    Device = 1,
    /// A Configuration Descriptor. (USB32 9.6.3)
    Configuration = 2,
    /// A String Descriptor. (USB32 9.6.9)
    String = 3,
    /// An Interface Descriptor. See [InterfaceDescriptor]
    Interface = 4,
    /// An Endpoint Descriptor. See [EndpointDescriptor]
    Endpoint = 5,
    /// A Human Interface Device Descriptor. See [HidDescriptor]
    Hid = 0x21,
}

impl DescriptorKind {
    pub fn from_value(value: u8) -> Option<Self> {
        Some(match value {
            1 => Self::Device,
            2 => Self::Configuration,
            3 => Self::String,
            4 => Self::Interface,
            5 => Self::Endpoint,
            0x21 => Self::Hid,
            _ => return None,
        })
    }
}

/// Space-separated lowercase hex, the form raw descriptors are logged and
/// rendered in.
pub(crate) fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) mod device;
pub(crate) mod endpoint;
pub(crate) mod error;
pub(crate) mod hid;
pub(crate) mod interface;
pub(crate) mod parse;
