#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResultCode {
    NOERROR = 0,
    FORMERR = 1,
    SERVFAIL = 2,
    NXDOMAIN = 3,
    NOTIMP = 4,
    REFUSED = 5,
}

impl ResultCode {
    pub fn from(value: u8) -> Option<ResultCode> {
        match value & 0x0F {
            0 => Some(ResultCode::NOERROR),
            1 => Some(ResultCode::FORMERR),
            2 => Some(ResultCode::SERVFAIL),
            3 => Some(ResultCode::NXDOMAIN),
            4 => Some(ResultCode::NOTIMP),
            5 => Some(ResultCode::REFUSED),
            _ => None,
        }
    }

    pub fn to_u8(&self) -> u8 {
        *self as u8
    }

    /// Only standard queries are forwarded as-is, every other opcode is
    /// answered with NOTIMP.
    pub fn for_opcode(opcode: u8) -> ResultCode {
        match opcode {
            0 => ResultCode::NOERROR,
            _ => ResultCode::NOTIMP,
        }
    }
}
