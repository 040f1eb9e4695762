/*!
 * Information Classes
 * Selectors for the output shape of key and value queries
 */

/// `KEY_INFORMATION_CLASS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum KeyInformationClass {
    Basic = 0,
    Node = 1,
    Full = 2,
    Name = 3,
    Cached = 4,
    Flags = 5,
    Virtualization = 6,
    HandleTags = 7,
    Trust = 8,
    Layer = 9,
}

impl KeyInformationClass {
    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::Basic,
            1 => Self::Node,
            2 => Self::Full,
            3 => Self::Name,
            4 => Self::Cached,
            5 => Self::Flags,
            6 => Self::Virtualization,
            7 => Self::HandleTags,
            8 => Self::Trust,
            9 => Self::Layer,
            _ => return None,
        })
    }
}

/// `KEY_VALUE_INFORMATION_CLASS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum KeyValueInformationClass {
    Basic = 0,
    Full = 1,
    Partial = 2,
    FullAlign64 = 3,
    PartialAlign64 = 4,
    Layer = 5,
}

impl KeyValueInformationClass {
    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::Basic,
            1 => Self::Full,
            2 => Self::Partial,
            3 => Self::FullAlign64,
            4 => Self::PartialAlign64,
            5 => Self::Layer,
            _ => return None,
        })
    }
}
