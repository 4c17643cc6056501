use crate::dns_class::DNSClass;
use crate::error::Result;
use crate::name::DomainName;
use crate::parser::PacketParser;
use crate::query_type::QueryType;
use crate::writer::write_domain;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub domain: DomainName,
    pub qtype: QueryType,
    pub qclass: DNSClass,
}

impl Question {
    pub fn new(name: impl Into<DomainName>, qtype: QueryType, qclass: DNSClass) -> Question {
        Question {
            domain: name.into(),
            qtype,
            qclass,
        }
    }

    /// Decodes the question at `offset`, returning it with the offset of
    /// whatever follows it.
    pub fn parse_at(buf: &[u8], offset: usize) -> Result<(Question, usize)> {
        let mut parser = PacketParser::new(buf);
        parser.seek(offset);

        let question = parser.parse_question()?;

        Ok((question, parser.offset()))
    }

    pub fn write(&self) -> Result<Vec<u8>> {
        let mut res = write_domain(&self.domain)?;

        res.extend_from_slice(&self.qtype.to_num().to_be_bytes());
        res.extend_from_slice(&self.qclass.to_num().to_be_bytes());

        Ok(res)
    }
}
