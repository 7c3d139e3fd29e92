use std::rc::Rc;

use usb_descriptors::plain;
use usb_descriptors::report::IfDesc;
use usb_descriptors::usb::{DescriptorCursor, DeviceStrings, Interface, US_ENGLISH};

// The data area of a composite device's configuration descriptor: a HID boot
// keyboard interface followed by a two-endpoint vendor interface.
const CONFIG_DATA: &[u8] = &[
    // interface 0 alt 0: HID boot keyboard
    0x09, 0x04, 0x00, 0x00, 0x01, 0x03, 0x01, 0x01, 0x04, //
    0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x3f, 0x00, //
    0x07, 0x05, 0x81, 0x03, 0x08, 0x00, 0x0a, //
    // interface 1 alt 0: vendor specific, bulk in/out
    0x09, 0x04, 0x01, 0x00, 0x02, 0xff, 0x00, 0x00, 0x00, //
    0x07, 0x05, 0x82, 0x02, 0x40, 0x00, 0x00, //
    0x07, 0x05, 0x02, 0x02, 0x40, 0x00, 0x00,
];

fn parse_all(data: &[u8]) -> Vec<Interface> {
    let mut cursor = DescriptorCursor::new(data);
    let mut interfaces = Vec::new();
    while !cursor.is_empty() {
        interfaces.push(Interface::parse(&mut cursor).unwrap());
    }
    interfaces
}

#[test]
fn parses_every_interface_of_a_config() {
    let interfaces = parse_all(CONFIG_DATA);
    assert_eq!(interfaces.len(), 2);

    let keyboard = &interfaces[0];
    assert_eq!(keyboard.descriptor().class, 3);
    assert_eq!(keyboard.endpoint_count(), 1);
    assert_eq!(keyboard.hid().unwrap().report_descriptor_length(), Some(0x3f));

    let vendor = &interfaces[1];
    assert_eq!(vendor.descriptor().number, 1);
    assert_eq!(vendor.endpoints().count(), 2);
    assert!(vendor.hid().is_none());
    assert!(vendor.endpoint_by_address(0x82).is_some());
}

#[test]
fn config_roundtrip_is_byte_exact() {
    let interfaces = parse_all(CONFIG_DATA);

    let mut out = Vec::new();
    for interface in &interfaces {
        let before = out.len();
        interface.write_full_descriptor(&mut out);
        assert_eq!(out.len() - before, interface.full_descriptor_length());
    }
    assert_eq!(out, CONFIG_DATA);
}

#[test]
fn reparsing_written_bytes_preserves_the_tree() {
    let original = &parse_all(CONFIG_DATA)[0];
    let mut written = Vec::new();
    original.write_full_descriptor(&mut written);

    let reparsed = &parse_all(&written)[0];
    let orig_desc = original.descriptor();
    let re_desc = reparsed.descriptor();
    assert_eq!(
        unsafe { plain::as_bytes(&orig_desc) },
        unsafe { plain::as_bytes(&re_desc) }
    );
    assert_eq!(
        original.endpoints().count(),
        reparsed.endpoints().count()
    );
    for (a, b) in original.endpoints().zip(reparsed.endpoints()) {
        let (mut left, mut right) = (Vec::new(), Vec::new());
        a.write_to(&mut left);
        b.write_to(&mut right);
        assert_eq!(left, right);
    }
}

struct TableStrings;

impl DeviceStrings for TableStrings {
    fn get_string(&self, index: u8, _language: u16) -> Option<String> {
        match index {
            4 => Some("Example Keyboard".to_string()),
            _ => None,
        }
    }
}

#[test]
fn report_serializes_resolved_names() {
    let mut interfaces = parse_all(CONFIG_DATA);
    let device: Rc<dyn DeviceStrings> = Rc::new(TableStrings);
    for interface in &mut interfaces {
        interface.attach_device(Rc::downgrade(&device));
    }

    let snapshot = IfDesc::new(&interfaces[0], US_ENGLISH);
    assert_eq!(snapshot.interface_str.as_deref(), Some("Example Keyboard"));

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: IfDesc = serde_json::from_str(&json).unwrap();
    assert_eq!(back.interface_str.as_deref(), Some("Example Keyboard"));
    assert_eq!(back.endpoints.len(), 1);
    assert_eq!(back.hid_descs[0].descs[0].len, 0x3f);

    // interface 1 declares no string index
    assert_eq!(IfDesc::new(&interfaces[1], US_ENGLISH).interface_str, None);
}
