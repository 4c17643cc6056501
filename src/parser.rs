use crate::dns_class::DNSClass;
use crate::error::{DnsError, Result};
use crate::header::{Header, HEADER_LEN};
use crate::name::DomainName;
use crate::packet::Packet;
use crate::query_type::QueryType;
use crate::question::Question;
use crate::record::Record;

/// Maximum number of compression pointers followed while decoding one name.
pub const DEFAULT_MAX_JUMPS: usize = 16;

/// Largest message the parser accepts unless told otherwise.
pub const DEFAULT_MAX_SIZE: usize = u16::MAX as usize;

pub struct PacketParser<'a> {
    buf: &'a [u8],
    offset: usize,
    max_jumps: usize,
    max_size: usize,
}

impl<'a> PacketParser<'a> {
    pub fn new(data: &'a [u8]) -> PacketParser<'a> {
        PacketParser {
            buf: data,
            offset: 0,
            max_jumps: DEFAULT_MAX_JUMPS,
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    pub fn with_max_jumps(mut self, n: usize) -> Self {
        self.max_jumps = n;

        self
    }

    pub fn with_max_size(mut self, n: usize) -> Self {
        self.max_size = n;

        self
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn seek(&mut self, n: usize) {
        self.offset = n;
    }

    pub fn next_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;

        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn next_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;

        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Returns the next `len` bytes and moves the cursor past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let res = self.range(self.offset, len)?;
        self.offset += len;

        Ok(res)
    }

    pub fn get(&self, n: usize) -> Result<u8> {
        self.buf
            .get(n)
            .copied()
            .ok_or_else(|| DnsError::truncated(n, 1, self.buf.len()))
    }

    pub fn range(&self, start: usize, len: usize) -> Result<&'a [u8]> {
        start
            .checked_add(len)
            .and_then(|end| self.buf.get(start..end))
            .ok_or_else(|| DnsError::truncated(start, len, self.buf.len()))
    }

    /// Decodes a whole message. The header counts drive how many questions
    /// and answers are read; authority and additional records are left
    /// unparsed.
    pub fn parse(&mut self) -> Result<Packet> {
        if self.buf.len() > self.max_size {
            return Err(DnsError::MessageTooLarge {
                size: self.buf.len(),
                max: self.max_size,
            });
        }

        let mut packet = Packet::new();

        packet.header = self.parse_header()?;

        for _ in 0..packet.header.question_count {
            packet.questions.push(self.parse_question()?);
        }

        for _ in 0..packet.header.answer_count {
            packet.answers.push(Record::parse(self)?);
        }

        Ok(packet)
    }

    pub fn parse_header(&mut self) -> Result<Header> {
        let header = Header::parse(self.buf)?;
        self.seek(HEADER_LEN);

        Ok(header)
    }

    pub fn parse_question(&mut self) -> Result<Question> {
        let name = self.parse_domain_name()?;
        let qtype = self.next_u16()?;
        let qclass = self.next_u16()?;

        Ok(Question::new(name, QueryType::from(qtype), DNSClass::from(qclass)))
    }

    /// Reads the name under the cursor and advances past its wire form.
    pub fn parse_domain_name(&mut self) -> Result<DomainName> {
        let (labels, next) = self.parse_labels(self.offset)?;
        self.seek(next);

        Ok(DomainName::new(labels))
    }

    /// Decodes the label sequence starting at `start`, following compression
    /// pointers. Returns the labels and the offset right after the name as it
    /// appears at `start`: a pointer always counts as exactly two bytes no
    /// matter how much data it refers to.
    ///
    /// Every pointer must refer to an offset before the segment it appears
    /// in, and no offset may be entered twice, so a chain of pointers can
    /// only move backwards through the buffer. Label bytes are copied as is.
    pub fn parse_labels(&self, start: usize) -> Result<(Vec<Vec<u8>>, usize)> {
        let mut labels = Vec::new();
        let mut visited = vec![start];
        let mut segment = start;
        let mut pos = start;
        let mut end = None;

        loop {
            let len = self.get(pos)?;

            match len & 0xC0 {
                0xC0 => {
                    let low = self.get(pos + 1)?;
                    let target = ((len as usize & 0x3F) << 8) | low as usize;

                    // the caller resumes after the first pointer
                    if end.is_none() {
                        end = Some(pos + 2);
                    }

                    if target >= segment || visited.contains(&target) {
                        return Err(DnsError::CompressionLoop { offset: target });
                    }

                    if visited.len() > self.max_jumps {
                        return Err(DnsError::CompressionDepthExceeded {
                            max: self.max_jumps,
                        });
                    }

                    visited.push(target);
                    segment = target;
                    pos = target;
                }
                0x00 => {
                    pos += 1;

                    if len == 0 {
                        break;
                    }

                    labels.push(self.range(pos, len as usize)?.to_vec());

                    pos += len as usize;
                }
                // 0x40 and 0x80 prefixes are not valid label lengths
                _ => return Err(DnsError::LabelTooLong { len: len as usize }),
            }
        }

        Ok((labels, end.unwrap_or(pos)))
    }
}
