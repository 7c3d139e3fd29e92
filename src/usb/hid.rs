use std::mem;

use plain::Plain;
use smallvec::SmallVec;

use super::error::{DescriptorError, Result};
use super::hex_bytes;

/// The fixed header of a HID descriptor, nested inside an interface's data
/// area between the interface record and its endpoints.
///
/// On the wire the header is followed by `num_descriptors` three-byte
/// [HidReportReference] entries. (HID11 6.2.1)
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default)]
pub struct HidDescriptor {
    pub length: u8,
    pub kind: u8,
    pub hid_spec_release: u16,
    pub country_code: u8,
    pub num_descriptors: u8,
}

unsafe impl Plain for HidDescriptor {}

/// Class descriptor type of a HID report descriptor. (HID11 7.1)
pub const HID_DESC_TY_REPORT: u8 = 0x22;

/// One `(bDescriptorType, wDescriptorLength)` entry of a HID descriptor,
/// referencing a class descriptor (report or physical) fetched separately.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default)]
pub struct HidReportReference {
    pub kind: u8,
    pub length: u16,
}

unsafe impl Plain for HidReportReference {}

/// The optional HID child of an interface tree. An interface carries at most
/// one.
#[derive(Clone, Debug)]
pub struct Hid {
    descriptor: HidDescriptor,
    reports: SmallVec<[HidReportReference; 1]>,
}

impl Hid {
    /// Parses one HID sub-descriptor from `bytes`, which must span exactly
    /// the sub-descriptor (its declared length).
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header_len = mem::size_of::<HidDescriptor>();
        if bytes.len() < header_len {
            return Err(DescriptorError::Truncated {
                needed: header_len,
                available: bytes.len(),
            });
        }
        let descriptor: HidDescriptor =
            *plain::from_bytes(&bytes[..header_len]).map_err(|_| DescriptorError::Truncated {
                needed: header_len,
                available: bytes.len(),
            })?;

        let entry_len = mem::size_of::<HidReportReference>();
        let needed = header_len + usize::from(descriptor.num_descriptors) * entry_len;
        if bytes.len() < needed {
            return Err(DescriptorError::Truncated {
                needed,
                available: bytes.len(),
            });
        }
        let reports = bytes[header_len..needed]
            .chunks_exact(entry_len)
            .map(|chunk| plain::from_bytes(chunk).copied())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| DescriptorError::Truncated {
                needed,
                available: bytes.len(),
            })?;

        Ok(Self { descriptor, reports })
    }

    pub fn descriptor(&self) -> HidDescriptor {
        self.descriptor
    }

    pub fn reports(&self) -> &[HidReportReference] {
        &self.reports
    }

    /// Length of the referenced report descriptor, if one is listed.
    pub fn report_descriptor_length(&self) -> Option<u16> {
        self.reports
            .iter()
            .find(|entry| entry.kind == HID_DESC_TY_REPORT)
            .map(|entry| entry.length)
    }

    /// Encoded length in bytes, as written by [Self::write_to].
    pub fn length(&self) -> usize {
        mem::size_of::<HidDescriptor>()
            + self.reports.len() * mem::size_of::<HidReportReference>()
    }

    /// Appends this descriptor's wire bytes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(unsafe { plain::as_bytes(&self.descriptor) });
        for entry in &self.reports {
            out.extend_from_slice(unsafe { plain::as_bytes(entry) });
        }
    }

    pub(crate) fn describe(&self, indent: usize) -> String {
        let mut bytes = Vec::with_capacity(self.length());
        self.write_to(&mut bytes);
        format!("{}HID: {}\n", "\t".repeat(indent), hex_bytes(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // boot keyboard: bcdHID 1.11, one report descriptor of 63 bytes
    const KEYBOARD_HID: [u8; 9] = [0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x3f, 0x00];

    #[test]
    fn parse_report_references() {
        let hid = Hid::parse(&KEYBOARD_HID).unwrap();
        assert_eq!(hid.reports().len(), 1);
        assert_eq!(hid.report_descriptor_length(), Some(0x3f));
        assert_eq!(hid.length(), 9);

        let mut out = Vec::new();
        hid.write_to(&mut out);
        assert_eq!(out, KEYBOARD_HID);
    }

    #[test]
    fn parse_entry_table_truncated() {
        // header claims two entries but only one fits
        let bytes = [0x0c, 0x21, 0x11, 0x01, 0x00, 0x02, 0x22, 0x3f, 0x00];
        assert!(matches!(
            Hid::parse(&bytes),
            Err(DescriptorError::Truncated {
                needed: 12,
                available: 9,
            })
        ));
    }
}
