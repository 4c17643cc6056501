use crate::error::{DnsError, Result};
use crate::result_code::ResultCode;

pub const HEADER_LEN: usize = 12;

/// The fixed 12 byte DNS header.
///
/// A header is a plain value: code that needs a variation of it (a forwarded
/// sub-query, the merged reply) copies it and adjusts the copy.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncation: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub reserved: u8,
    pub code: u8,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    #[cfg(test)]
    pub fn new_with_id(id: u16) -> Header {
        Header {
            id,
            ..Default::default()
        }
    }

    pub fn with_query_res_indicator(mut self) -> Self {
        self.response = true;

        self
    }

    pub fn with_question_count(mut self, n: u16) -> Self {
        self.question_count = n;

        self
    }

    pub fn with_answer_count(mut self, n: u16) -> Self {
        self.answer_count = n;

        self
    }

    pub fn with_code(mut self, code: ResultCode) -> Self {
        self.code = code.to_u8();

        self
    }

    /// Header of a forwarded single-question query: same id and flags,
    /// exactly one question and nothing else.
    pub fn for_question(&self) -> Self {
        Header {
            authority_count: 0,
            additional_count: 0,
            ..*self
        }
        .with_question_count(1)
        .with_answer_count(0)
    }

    /// Header of the merged reply sent back to the client.
    pub fn for_reply(&self, question_count: u16, answer_count: u16) -> Self {
        Header {
            authority_count: 0,
            additional_count: 0,
            ..*self
        }
        .with_query_res_indicator()
        .with_code(ResultCode::for_opcode(self.opcode))
        .with_question_count(question_count)
        .with_answer_count(answer_count)
    }

    pub fn parse(buf: &[u8]) -> Result<Header> {
        if buf.len() < HEADER_LEN {
            return Err(DnsError::truncated(0, HEADER_LEN, buf.len()));
        }

        let (first, second) = (buf[2], buf[3]);

        Ok(Header {
            id: u16::from_be_bytes([buf[0], buf[1]]),
            response: first & (1 << 7) != 0,
            opcode: (first >> 3) & 0x0F,
            authoritative: first & (1 << 2) != 0,
            truncation: first & (1 << 1) != 0,
            recursion_desired: first & 1 != 0,
            recursion_available: second & (1 << 7) != 0,
            reserved: (second >> 4) & 0x07,
            code: second & 0x0F,
            question_count: u16::from_be_bytes([buf[4], buf[5]]),
            answer_count: u16::from_be_bytes([buf[6], buf[7]]),
            authority_count: u16::from_be_bytes([buf[8], buf[9]]),
            additional_count: u16::from_be_bytes([buf[10], buf[11]]),
        })
    }

    pub fn write(&self) -> [u8; HEADER_LEN] {
        let mut res = [0u8; HEADER_LEN];

        res[0..2].copy_from_slice(&self.id.to_be_bytes());
        (res[2], res[3]) = self.write_flags();
        res[4..6].copy_from_slice(&self.question_count.to_be_bytes());
        res[6..8].copy_from_slice(&self.answer_count.to_be_bytes());
        res[8..10].copy_from_slice(&self.authority_count.to_be_bytes());
        res[10..12].copy_from_slice(&self.additional_count.to_be_bytes());

        res
    }

    fn write_flags(&self) -> (u8, u8) {
        let first = self.recursion_desired as u8
            | (self.truncation as u8) << 1
            | (self.authoritative as u8) << 2
            | (self.opcode & 0x0F) << 3
            | (self.response as u8) << 7;

        let second = self.code & 0x0F
            | (self.reserved & 0x07) << 4
            | (self.recursion_available as u8) << 7;

        (first, second)
    }
}
