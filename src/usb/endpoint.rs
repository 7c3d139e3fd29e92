use std::mem;

use plain::Plain;
use smallvec::SmallVec;

use super::error::{DescriptorError, Result};
use super::hex_bytes;

/// The descriptor for a USB Endpoint.
///
/// Each endpoint of a particular interface has its own descriptor. These are
/// returned as part of the configuration descriptor's data area and cannot
/// be requested individually.
///
/// See USB32 9.6.6; the field offsets are described in USB32 Table 9-26.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default)]
pub struct EndpointDescriptor {
    pub length: u8,
    pub kind: u8,
    pub address: u8,
    pub attributes: u8,
    pub max_packet_size: u16,
    pub interval: u8,
}

unsafe impl Plain for EndpointDescriptor {}

/// Mask ANDed with [EndpointDescriptor].attributes to get the endpoint type.
pub const ENDP_ATTR_TY_MASK: u8 = 0x3;

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EndpointTy {
    Ctrl = 0,
    Isoch = 1,
    Bulk = 2,
    Interrupt = 3,
}

/// One endpoint child of an interface tree.
///
/// Owns the standard 7-byte record plus any trailing bytes the device
/// appended past it (audio-class endpoints carry two), so re-serialization
/// reproduces the wire bytes exactly.
#[derive(Clone, Debug)]
pub struct Endpoint {
    descriptor: EndpointDescriptor,
    extra: SmallVec<[u8; 2]>,
}

impl Endpoint {
    pub fn new(descriptor: EndpointDescriptor) -> Self {
        Self {
            descriptor,
            extra: SmallVec::new(),
        }
    }

    /// Parses one endpoint sub-descriptor from `bytes`, which must span
    /// exactly the sub-descriptor (its declared length).
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let record_len = mem::size_of::<EndpointDescriptor>();
        if bytes.len() < record_len {
            return Err(DescriptorError::Truncated {
                needed: record_len,
                available: bytes.len(),
            });
        }
        let descriptor = *plain::from_bytes(&bytes[..record_len]).map_err(|_| {
            DescriptorError::Truncated {
                needed: record_len,
                available: bytes.len(),
            }
        })?;
        Ok(Self {
            descriptor,
            extra: SmallVec::from_slice(&bytes[record_len..]),
        })
    }

    pub fn descriptor(&self) -> EndpointDescriptor {
        self.descriptor
    }

    /// The endpoint address byte: number in the low nibble, direction in
    /// bit 7.
    pub fn address(&self) -> u8 {
        self.descriptor.address
    }

    pub fn ty(&self) -> EndpointTy {
        match self.descriptor.attributes & ENDP_ATTR_TY_MASK {
            0 => EndpointTy::Ctrl,
            1 => EndpointTy::Isoch,
            2 => EndpointTy::Bulk,
            3 => EndpointTy::Interrupt,
            _ => unreachable!(),
        }
    }

    pub fn is_in(&self) -> bool {
        self.descriptor.address & 0x80 != 0
    }

    /// Encoded length in bytes, as written by [Self::write_to].
    pub fn length(&self) -> usize {
        mem::size_of::<EndpointDescriptor>() + self.extra.len()
    }

    /// Appends this endpoint's wire bytes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(unsafe { plain::as_bytes(&self.descriptor) });
        out.extend_from_slice(&self.extra);
    }

    pub(crate) fn describe(&self, indent: usize) -> String {
        let mut bytes = Vec::with_capacity(self.length());
        self.write_to(&mut bytes);
        format!(
            "{}Endpoint({:#04x}): {}\n",
            "\t".repeat(indent),
            self.address(),
            hex_bytes(&bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_trailing_bytes() {
        // audio-class endpoint: 9 declared bytes, refresh + synch address
        let bytes = [0x09, 0x05, 0x01, 0x09, 0x00, 0x02, 0x01, 0x00, 0x81];
        let endpoint = Endpoint::parse(&bytes).unwrap();
        assert_eq!(endpoint.address(), 0x01);
        assert_eq!(endpoint.ty(), EndpointTy::Isoch);
        assert_eq!(endpoint.length(), 9);

        let mut out = Vec::new();
        endpoint.write_to(&mut out);
        assert_eq!(out, bytes);
    }

    #[test]
    fn parse_too_short() {
        assert!(matches!(
            Endpoint::parse(&[0x07, 0x05, 0x81]),
            Err(DescriptorError::Truncated {
                needed: 7,
                available: 3,
            })
        ));
    }
}
