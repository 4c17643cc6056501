use std::fmt::{Display, Formatter};

#[derive(Default, PartialEq, Eq, Debug, Clone, Copy)]
pub enum DNSClass {
    #[default]
    IN, // 1
    CS,
    CH,
    HS,
    NONE, // 254
    ASTERISK,
    UNKNOWN(u16),
}

impl DNSClass {
    pub fn from(value: u16) -> Self {
        match value {
            1 => DNSClass::IN,
            2 => DNSClass::CS,
            3 => DNSClass::CH,
            4 => DNSClass::HS,
            254 => DNSClass::NONE,
            255 => DNSClass::ASTERISK,
            other => DNSClass::UNKNOWN(other),
        }
    }

    pub fn to_num(&self) -> u16 {
        match *self {
            DNSClass::IN => 1,
            DNSClass::CS => 2,
            DNSClass::CH => 3,
            DNSClass::HS => 4,
            DNSClass::NONE => 254,
            DNSClass::ASTERISK => 255,
            DNSClass::UNKNOWN(n) => n,
        }
    }
}

impl Display for DNSClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DNSClass::ASTERISK => write!(f, "*"),
            DNSClass::UNKNOWN(n) => write!(f, "CLASS{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}
