use std::fmt::Write as _;
use std::mem;
use std::rc::Weak;

use log::warn;
use plain::Plain;
use smallvec::SmallVec;

use super::device::{DeviceStrings, US_ENGLISH};
use super::endpoint::Endpoint;
use super::error::{DescriptorError, Result};
use super::hex_bytes;
use super::hid::Hid;
use super::parse::DescriptorCursor;
use super::DescriptorKind;

/// The descriptor for a USB Interface.
///
/// See USB32 9.6.5; the field offsets are described in USB32 Table 9-22.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default)]
pub struct InterfaceDescriptor {
    pub length: u8,
    pub kind: u8,
    pub number: u8,
    pub alternate_setting: u8,
    /// The number of endpoints this alternate setting uses, and therefore
    /// the number of endpoint slots its [Interface] allocates.
    pub endpoints: u8,
    pub class: u8,
    pub sub_class: u8,
    pub protocol: u8,
    /// Index of the string descriptor naming this interface; 0 means no
    /// name.
    pub interface_str: u8,
}

unsafe impl Plain for InterfaceDescriptor {}

/// One interface of a configuration, parsed into a navigable tree.
///
/// The tree exclusively owns its children: a fixed array of endpoint slots
/// (sized once, from the record's declared endpoint count) and at most one
/// HID descriptor. The owning device is referenced weakly and only consulted
/// to resolve the interface's name.
pub struct Interface {
    descriptor: InterfaceDescriptor,
    endpoints: SmallVec<[Option<Endpoint>; 2]>,
    hid: Option<Hid>,
    device: Option<Weak<dyn DeviceStrings>>,
}

impl Interface {
    /// Parses an interface and its sub-descriptors from `cursor`.
    ///
    /// The cursor must sit on the interface's 9-byte record. Parsing then
    /// walks the sub-descriptors that follow: endpoint records fill the next
    /// empty slot, a HID record becomes the HID child (last one wins), and
    /// any other kind is logged as hex and skipped. The walk stops at the
    /// end of the region or at the next interface record, which is left
    /// unconsumed.
    pub fn parse(cursor: &mut DescriptorCursor<'_>) -> Result<Self> {
        let descriptor: InterfaceDescriptor = cursor.take_record()?;
        if descriptor.kind != DescriptorKind::Interface as u8 {
            return Err(DescriptorError::UnexpectedKind {
                expected: DescriptorKind::Interface as u8,
                found: descriptor.kind,
            });
        }

        let mut interface = Self::from_descriptor(descriptor);
        while let Some((length, kind)) = cursor.peek_header() {
            if kind == DescriptorKind::Interface as u8 {
                break;
            }
            if length == 0 {
                return Err(DescriptorError::ZeroLength {
                    at: cursor.position(),
                });
            }
            match DescriptorKind::from_value(kind) {
                Some(DescriptorKind::Endpoint) => {
                    let endpoint = Endpoint::parse(cursor.take(length.into())?)?;
                    match interface.endpoints.iter_mut().find(|slot| slot.is_none()) {
                        Some(slot) => *slot = Some(endpoint),
                        None => warn!(
                            "interface {}: dropping endpoint {:#04x}, more endpoint \
                             descriptors than the declared count {}",
                            descriptor.number,
                            endpoint.address(),
                            descriptor.endpoints
                        ),
                    }
                }
                Some(DescriptorKind::Hid) => {
                    interface.hid = Some(Hid::parse(cursor.take(length.into())?)?);
                }
                _ => {
                    let raw = cursor.take_at_most(length.into());
                    warn!(
                        "interface {}: skipping unknown descriptor kind {:#04x}: {}",
                        descriptor.number,
                        kind,
                        hex_bytes(raw)
                    );
                }
            }
        }
        Ok(interface)
    }

    /// Builds an interface around an already-parsed record, with every
    /// endpoint slot empty and no HID child.
    pub fn from_descriptor(descriptor: InterfaceDescriptor) -> Self {
        Self {
            endpoints: smallvec::smallvec![None; usize::from(descriptor.endpoints)],
            descriptor,
            hid: None,
            device: None,
        }
    }

    /// Builds an interface field by field, with every endpoint slot empty
    /// and no HID child.
    pub fn new(
        number: u8,
        alternate_setting: u8,
        endpoints: u8,
        class: u8,
        sub_class: u8,
        protocol: u8,
        interface_str: u8,
    ) -> Self {
        Self::from_descriptor(InterfaceDescriptor {
            length: mem::size_of::<InterfaceDescriptor>() as u8,
            kind: DescriptorKind::Interface as u8,
            number,
            alternate_setting,
            endpoints,
            class,
            sub_class,
            protocol,
            interface_str,
        })
    }

    pub fn descriptor(&self) -> InterfaceDescriptor {
        self.descriptor
    }

    /// The declared endpoint count, which is also the slot count. Slots may
    /// be empty; see [Self::endpoints] for the occupied ones.
    pub fn endpoint_count(&self) -> u8 {
        self.descriptor.endpoints
    }

    /// The contents of endpoint slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [Self::endpoint_count].
    pub fn endpoint(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints[index].as_ref()
    }

    pub fn endpoint_by_address(&self, address: u8) -> Option<&Endpoint> {
        self.endpoints()
            .find(|endpoint| endpoint.address() == address)
    }

    /// Iterates over the occupied endpoint slots in order.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter().flatten()
    }

    pub fn hid(&self) -> Option<&Hid> {
        self.hid.as_ref()
    }

    /// Installs `hid` as the HID child, returning the one it replaces.
    pub fn set_hid(&mut self, hid: Hid) -> Option<Hid> {
        self.hid.replace(hid)
    }

    /// Places `endpoint` in the first empty slot, or replaces the first
    /// occupied slot sharing its address.
    pub fn add_endpoint(&mut self, endpoint: Endpoint) -> Result<()> {
        for slot in self.endpoints.iter_mut() {
            match slot {
                None => {
                    *slot = Some(endpoint);
                    return Ok(());
                }
                Some(existing) if existing.address() == endpoint.address() => {
                    *slot = Some(endpoint);
                    return Ok(());
                }
                Some(_) => (),
            }
        }
        Err(DescriptorError::EndpointSlotsFull {
            interface: self.descriptor.number,
            slots: self.descriptor.endpoints,
        })
    }

    /// Encoded length of the record plus all present children, recomputed
    /// on every call. [Self::write_full_descriptor] writes exactly this many
    /// bytes.
    pub fn full_descriptor_length(&self) -> usize {
        let mut total = mem::size_of::<InterfaceDescriptor>();
        if let Some(hid) = &self.hid {
            total += hid.length();
        }
        total + self.endpoints().map(Endpoint::length).sum::<usize>()
    }

    /// Appends the interface's wire bytes to `out`: the record, then the
    /// HID child if present, then each present endpoint in slot order.
    pub fn write_full_descriptor(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(unsafe { plain::as_bytes(&self.descriptor) });
        if let Some(hid) = &self.hid {
            hid.write_to(out);
        }
        for endpoint in self.endpoints() {
            endpoint.write_to(out);
        }
    }

    /// Attaches the weak back-reference to the owning device, used to
    /// resolve this interface's name.
    pub fn attach_device(&mut self, device: Weak<dyn DeviceStrings>) {
        self.device = Some(device);
    }

    /// The interface's human-readable name, via the owning device's string
    /// table. `None` when no device is attached (or it is gone), when the
    /// record declares no string index, or when the lookup finds nothing.
    pub fn interface_string(&self, language: u16) -> Option<String> {
        if self.descriptor.interface_str == 0 {
            return None;
        }
        let device = self.device.as_ref()?.upgrade()?;
        device.get_string(self.descriptor.interface_str, language)
    }

    /// Renders the tree as indented text, one level per `indent` tab. The
    /// active alternate setting of an interface number is marked with `*`.
    pub fn describe(&self, indent: usize, active: bool) -> String {
        let tabs = "\t".repeat(indent);
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}{}Alt({}): {}",
            tabs,
            if active { "*" } else { "" },
            self.descriptor.alternate_setting,
            hex_bytes(unsafe { plain::as_bytes(&self.descriptor) })
        );
        if let Some(name) = self.interface_string(US_ENGLISH) {
            let _ = writeln!(out, "{}  Name: {}", tabs, name);
        }
        if let Some(hid) = &self.hid {
            out.push_str(&hid.describe(indent + 1));
        }
        for endpoint in self.endpoints() {
            out.push_str(&endpoint.describe(indent + 1));
        }
        out
    }
}
