//! Structured, serializable snapshots of a parsed interface tree.
//!
//! These types carry the same information as [crate::usb::Interface::describe]
//! but in a form other processes can consume, with string indices already
//! resolved through the owning device.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::usb::{Endpoint, EndpointTy, Hid, Interface, ENDP_ATTR_TY_MASK};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IfDesc {
    pub kind: u8,
    pub number: u8,
    pub alternate_setting: u8,
    pub class: u8,
    pub sub_class: u8,
    pub protocol: u8,
    pub interface_str: Option<String>,
    pub endpoints: SmallVec<[EndpDesc; 2]>,
    pub hid_descs: SmallVec<[HidDesc; 1]>,
}

impl IfDesc {
    /// Snapshots `interface`, resolving its name for `language` through the
    /// attached device, if any.
    pub fn new(interface: &Interface, language: u16) -> Self {
        let desc = interface.descriptor();
        Self {
            kind: desc.kind,
            number: desc.number,
            alternate_setting: desc.alternate_setting,
            class: desc.class,
            sub_class: desc.sub_class,
            protocol: desc.protocol,
            interface_str: interface.interface_string(language),
            endpoints: interface.endpoints().map(EndpDesc::from).collect(),
            hid_descs: interface.hid().map(HidDesc::from).into_iter().collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EndpDesc {
    pub kind: u8,
    pub address: u8,
    pub attributes: u8,
    pub max_packet_size: u16,
    pub interval: u8,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EndpDirection {
    Out,
    In,
    Bidirectional,
}

impl EndpDesc {
    pub fn ty(self) -> EndpointTy {
        match self.attributes & ENDP_ATTR_TY_MASK {
            0 => EndpointTy::Ctrl,
            1 => EndpointTy::Isoch,
            2 => EndpointTy::Bulk,
            3 => EndpointTy::Interrupt,
            _ => unreachable!(),
        }
    }
    pub fn is_control(&self) -> bool {
        self.ty() == EndpointTy::Ctrl
    }
    pub fn is_interrupt(&self) -> bool {
        self.ty() == EndpointTy::Interrupt
    }
    pub fn is_bulk(&self) -> bool {
        self.ty() == EndpointTy::Bulk
    }
    pub fn is_isoch(&self) -> bool {
        self.ty() == EndpointTy::Isoch
    }
    pub fn direction(&self) -> EndpDirection {
        if self.is_control() {
            return EndpDirection::Bidirectional;
        }
        if self.address & 0x80 != 0 {
            EndpDirection::In
        } else {
            EndpDirection::Out
        }
    }
}

impl From<&Endpoint> for EndpDesc {
    fn from(endpoint: &Endpoint) -> Self {
        let desc = endpoint.descriptor();
        let max_packet_size = desc.max_packet_size;
        Self {
            kind: desc.kind,
            address: desc.address,
            attributes: desc.attributes,
            max_packet_size,
            interval: desc.interval,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HidDesc {
    pub kind: u8,
    pub hid_spec_release: u16,
    pub country: u8,
    pub desc_count: u8,
    pub descs: SmallVec<[HidClassDesc; 1]>,
}

/// One class-descriptor reference listed by a HID descriptor.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HidClassDesc {
    pub ty: u8,
    pub len: u16,
}

impl From<&Hid> for HidDesc {
    fn from(hid: &Hid) -> Self {
        let desc = hid.descriptor();
        let hid_spec_release = desc.hid_spec_release;
        Self {
            kind: desc.kind,
            hid_spec_release,
            country: desc.country_code,
            desc_count: desc.num_descriptors,
            descs: hid
                .reports()
                .iter()
                .map(|entry| {
                    let len = entry.length;
                    HidClassDesc {
                        ty: entry.kind,
                        len,
                    }
                })
                .collect(),
        }
    }
}
