use crate::dns_class::DNSClass;
use crate::error::{DnsError, Result};
use crate::name::DomainName;
use crate::parser::PacketParser;
use crate::query_type::QueryType;
use crate::writer::write_domain;

/// A resource record with opaque RDATA. RDLENGTH is never stored on its own,
/// it is always the length of `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub domain: DomainName,
    pub rtype: QueryType,
    pub rclass: DNSClass,
    pub ttl: u32,
    pub data: Vec<u8>,
}

impl Record {
    pub fn new(domain: impl Into<DomainName>, rtype: QueryType, rclass: DNSClass, ttl: u32, data: Vec<u8>) -> Record {
        Record {
            domain: domain.into(),
            rtype,
            rclass,
            ttl,
            data,
        }
    }

    pub fn rdlength(&self) -> usize {
        self.data.len()
    }

    pub fn parse(parser: &mut PacketParser) -> Result<Record> {
        let domain = parser.parse_domain_name()?;

        let rtype = QueryType::from(parser.next_u16()?);
        let rclass = DNSClass::from(parser.next_u16()?);
        let ttl = parser.next_u32()?;
        let len = parser.next_u16()?;
        let data = parser.take(len as usize)?.to_vec();

        Ok(Record {
            domain,
            rtype,
            rclass,
            ttl,
            data,
        })
    }

    /// Decodes the record at `offset`, returning it with the offset of
    /// whatever follows it.
    pub fn parse_at(buf: &[u8], offset: usize) -> Result<(Record, usize)> {
        let mut parser = PacketParser::new(buf);
        parser.seek(offset);

        let record = Record::parse(&mut parser)?;

        Ok((record, parser.offset()))
    }

    pub fn write(&self) -> Result<Vec<u8>> {
        let len = u16::try_from(self.rdlength()).map_err(|_| DnsError::MessageTooLarge {
            size: self.rdlength(),
            max: u16::MAX as usize,
        })?;

        let mut res = write_domain(&self.domain)?;

        res.extend_from_slice(&self.rtype.to_num().to_be_bytes());
        res.extend_from_slice(&self.rclass.to_num().to_be_bytes());
        res.extend_from_slice(&self.ttl.to_be_bytes());
        res.extend_from_slice(&len.to_be_bytes());
        res.extend_from_slice(&self.data);

        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn a_record() -> Record {
        Record::new(
            "example.com".to_string(),
            QueryType::A,
            DNSClass::IN,
            3600,
            vec![93, 184, 216, 34],
        )
    }

    #[test]
    fn write_layout() {
        let buf = a_record().write().unwrap();

        assert_eq!(buf.len(), 13 + 10 + 4);
        assert_eq!(&buf[13..], &[0, 1, 0, 1, 0, 0, 0x0E, 0x10, 0, 4, 93, 184, 216, 34]);
    }

    #[test]
    fn parse_inverts_write() {
        let record = Record::new(
            "".to_string(),
            QueryType::OPT,
            DNSClass::UNKNOWN(4096),
            u32::MAX,
            Vec::new(),
        );

        for record in [a_record(), record] {
            let buf = record.write().unwrap();
            let (parsed, next) = Record::parse_at(&buf, 0).unwrap();

            assert_eq!(parsed, record);
            assert_eq!(parsed.rdlength(), record.data.len());
            assert_eq!(next, buf.len());
        }
    }

    #[test]
    fn short_rdata() {
        let mut buf = a_record().write().unwrap();
        buf.pop();

        let err = Record::parse_at(&buf, 0).unwrap_err();
        assert!(matches!(err, DnsError::TruncatedInput { offset: 23, needed: 4, available: 26 }));
    }

    #[test]
    fn rdata_too_long() {
        let mut record = a_record();
        record.data = vec![0; u16::MAX as usize + 1];

        assert!(matches!(record.write().unwrap_err(), DnsError::MessageTooLarge { .. }));
    }
}
