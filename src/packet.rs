use crate::header::Header;
use crate::question::Question;
use crate::record::Record;

/// A decoded DNS message. Only the question and answer sections are
/// modelled; authority and additional records are skipped on decode.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Record>,
}

impl Packet {
    pub fn new() -> Packet {
        Packet {
            ..Default::default()
        }
    }

    /// Single-question query forwarded upstream on behalf of `header`'s
    /// client.
    pub fn forwarded(header: &Header, question: Question) -> Packet {
        Packet {
            header: header.for_question(),
            questions: vec![question],
            answers: Vec::new(),
        }
    }
}
