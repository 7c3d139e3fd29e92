/// The default language id used for descriptive renderings. (USB32 9.6.9
/// leaves language ids to Microsoft's LCID tables; 0x0409 is US English.)
pub const US_ENGLISH: u16 = 0x0409;

/// The string-table contract exposed by the device object that owns an
/// interface.
///
/// An [super::Interface] never owns its device; it keeps at most a weak
/// handle to it and resolves string indices through this trait when asked
/// for a human-readable name.
pub trait DeviceStrings {
    /// Looks up string descriptor `index` for `language`. `None` when the
    /// device carries no such string.
    fn get_string(&self, index: u8, language: u16) -> Option<String>;
}
