use crate::error::{DnsError, Result};
use crate::name::DomainName;
use crate::packet::Packet;

const MAX_LABEL_LEN: usize = 63;

/// Default encoded size limit, the largest message a 16 bit length allows.
pub const DEFAULT_MAX_SIZE: usize = u16::MAX as usize;

pub struct PacketWriter {
    buf: Vec<u8>,
    max_size: usize,
}

impl Default for PacketWriter {
    fn default() -> Self {
        PacketWriter::new(DEFAULT_MAX_SIZE)
    }
}

impl PacketWriter {
    pub fn new(max_size: usize) -> PacketWriter {
        PacketWriter {
            buf: Vec::new(),
            max_size,
        }
    }

    /// Encodes header, questions and answers in that order. The header
    /// counts are written as given and must already match the lists.
    pub fn write(&mut self, packet: &Packet) -> Result<Vec<u8>> {
        // reset the buffer before any writes to the buf
        self.buf.clear();

        check_count("question", packet.header.question_count, packet.questions.len())?;
        check_count("answer", packet.header.answer_count, packet.answers.len())?;

        self.write_bytes(&packet.header.write())?;

        for question in &packet.questions {
            self.write_bytes(&question.write()?)?;
        }

        for answer in &packet.answers {
            self.write_bytes(&answer.write()?)?;
        }

        Ok(std::mem::take(&mut self.buf))
    }

    fn write_bytes(&mut self, values: &[u8]) -> Result<()> {
        let size = self.buf.len() + values.len();
        if size > self.max_size {
            return Err(DnsError::MessageTooLarge {
                size,
                max: self.max_size,
            });
        }

        self.buf.extend_from_slice(values);

        Ok(())
    }
}

/// Encodes a name as length-prefixed labels followed by the root label.
/// Label bytes go out unchanged; empty labels are skipped.
pub fn write_domain(domain: &DomainName) -> Result<Vec<u8>> {
    let mut res = Vec::new();

    for label in domain.labels().iter().filter(|label| !label.is_empty()) {
        if label.len() > MAX_LABEL_LEN {
            return Err(DnsError::LabelTooLong { len: label.len() });
        }

        res.push(label.len() as u8);
        res.extend_from_slice(label);
    }

    res.push(0x00);

    Ok(res)
}

fn check_count(section: &'static str, declared: u16, actual: usize) -> Result<()> {
    if declared as usize != actual {
        return Err(DnsError::CountMismatch {
            section,
            declared,
            actual,
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dns_class::DNSClass;
    use crate::header::Header;
    use crate::parser::PacketParser;
    use crate::query_type::QueryType;
    use crate::question::Question;
    use crate::record::Record;

    fn sample() -> Packet {
        let header = Header::new_with_id(7)
            .with_query_res_indicator()
            .with_question_count(2)
            .with_answer_count(1);

        Packet {
            header,
            questions: vec![
                Question::new("example.com".to_string(), QueryType::A, DNSClass::IN),
                Question::new("example.org".to_string(), QueryType::AAAA, DNSClass::IN),
            ],
            answers: vec![Record::new(
                "example.com".to_string(),
                QueryType::A,
                DNSClass::IN,
                60,
                vec![127, 0, 0, 1],
            )],
        }
    }

    #[test]
    fn domains() {
        assert_eq!(write_domain(&"".into()).unwrap(), vec![0]);
        assert_eq!(write_domain(&".".into()).unwrap(), vec![0]);
        assert_eq!(write_domain(&"a.bc.".into()).unwrap(), vec![1, b'a', 2, b'b', b'c', 0]);
        assert_eq!(write_domain(&"x".repeat(63).into()).unwrap().len(), 65);

        let err = write_domain(&format!("{}.com", "x".repeat(64)).into()).unwrap_err();
        assert!(matches!(err, DnsError::LabelTooLong { len: 64 }));
    }

    #[test]
    fn decoded_names_encode_to_the_same_bytes() {
        let mut binary: Vec<u8> = vec![63];
        binary.extend_from_slice(&[0xC3; 63]);
        binary.push(0);

        for buf in [
            vec![1, 0xFF, 0],
            vec![3, b'a', b'.', b'b', 0],
            vec![2, 0xC3, 0x28, 3, b'c', b'o', b'm', 0],
            binary,
        ] {
            let name = PacketParser::new(&buf).parse_domain_name().unwrap();

            assert_eq!(write_domain(&name).unwrap(), buf);
        }
    }

    #[test]
    fn counts_match_sections() {
        let packet = sample();
        let buf = PacketWriter::default().write(&packet).unwrap();

        assert_eq!(u16::from_be_bytes([buf[4], buf[5]]) as usize, packet.questions.len());
        assert_eq!(u16::from_be_bytes([buf[6], buf[7]]) as usize, packet.answers.len());
        assert_eq!(PacketParser::new(&buf).parse().unwrap(), packet);
    }

    #[test]
    fn count_mismatch() {
        let mut packet = sample();
        packet.header.answer_count = 3;

        let err = PacketWriter::default().write(&packet).unwrap_err();
        assert!(matches!(
            err,
            DnsError::CountMismatch { section: "answer", declared: 3, actual: 1 }
        ));
    }

    #[test]
    fn size_limit() {
        let packet = sample();
        let size = PacketWriter::default().write(&packet).unwrap().len();

        assert!(PacketWriter::new(size).write(&packet).is_ok());

        let err = PacketWriter::new(size - 1).write(&packet).unwrap_err();
        assert!(matches!(err, DnsError::MessageTooLarge { .. }));
    }

    #[test]
    fn writer_is_reusable() {
        let mut writer = PacketWriter::default();
        let first = writer.write(&sample()).unwrap();
        let second = writer.write(&sample()).unwrap();

        assert_eq!(first, second);
    }
}
