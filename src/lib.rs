//! USB configuration-descriptor modeling.
//!
//! This crate parses the data area of a USB configuration descriptor into a
//! navigable tree and re-serializes that tree back into wire bytes. The unit
//! of modeling is the *interface*: an [usb::Interface] owns its fixed 9-byte
//! interface descriptor, the endpoint descriptors that follow it on the wire,
//! and an optional HID descriptor nested between them.
//!
//! Descriptors are self-describing binary records: the first byte is the
//! record's own length, the second its type tag. Records this crate does not
//! recognize are logged and skipped so that parsing survives
//! vendor-specific descriptors.
//!
//! This documentation refers directly to the relevant standards:
//!
//! - USB2  - [Universal Serial Bus Specification](https://www.usb.org/document-library/usb-20-specification)
//! - USB32 - [Universal Serial Bus 3.2 Specification Revision 1.1](https://usb.org/document-library/usb-32-revision-11-june-2022)
//! - HID11 - [Device Class Definition for Human Interface Devices 1.11](https://www.usb.org/document-library/device-class-definition-hid-111)
pub extern crate plain;

pub mod report;
pub mod usb;
