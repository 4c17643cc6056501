use std::future::Future;
use tracing::{debug, trace, warn};
use crate::context::Context;
use crate::error::{DnsError, Result};
use crate::handler::{Handler, Session};
use crate::header::Header;
use crate::packet::Packet;
use crate::parser::PacketParser;
use crate::question::Question;
use crate::record::Record;
use crate::result_code::ResultCode;
use crate::writer::PacketWriter;

pub trait Resolver: Send + Sync {
    /// Turns one client datagram into the datagram to send back.
    fn resolve(&self, buf: &[u8]) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Forwards every question of a request upstream on its own and merges the
/// replies into a single answer for the client.
pub struct ForwardResolver<H> {
    handler: H,
    max_request_size: usize,
    max_upstream_size: usize,
    max_parse_jumps: usize,
}

impl<H: Handler> ForwardResolver<H> {
    pub fn new(handler: H, ctx: &Context) -> Self {
        Self {
            handler,
            max_request_size: ctx.listener.max_packet_buf,
            max_upstream_size: ctx.server.max_upstream_buf,
            max_parse_jumps: ctx.resolver.max_compression_depth,
        }
    }

    fn parse(&self, buf: &[u8], max_size: usize) -> Result<Packet> {
        PacketParser::new(buf)
            .with_max_jumps(self.max_parse_jumps)
            .with_max_size(max_size)
            .parse()
    }

    /// Resolves the questions of `req` one after another, in order. Any
    /// upstream failure aborts the whole request.
    pub async fn forward(&self, req: &Packet) -> Result<Packet> {
        let mut questions: Vec<Question> = Vec::new();
        let mut answers: Vec<Record> = Vec::new();

        if req.questions.is_empty() {
            return merge(&req.header, questions, answers);
        }

        let mut session = self.handler.open().await?;
        let mut writer = PacketWriter::new(self.max_upstream_size);

        for question in &req.questions {
            debug!("forwarding {} {} {}", question.domain, question.qtype, question.qclass);

            let query = writer.write(&Packet::forwarded(&req.header, question.clone()))?;
            let res_buf = session.send(&query).await?;
            let res = self.parse(&res_buf, self.max_upstream_size)?;

            if let Some(problem) = reply_mismatch(question, &res) {
                warn!("upstream reply for {} {}", question.domain, problem);
            }

            match ResultCode::from(res.header.code) {
                Some(code) => debug!("upstream answered {} with {:?}, {} answers", question.domain, code, res.answers.len()),
                None => debug!("upstream answered {} with rcode {}", question.domain, res.header.code),
            }

            questions.extend(res.questions);
            answers.extend(res.answers);
        }

        merge(&req.header, questions, answers)
    }
}

impl<H: Handler> Resolver for ForwardResolver<H> {
    async fn resolve(&self, buf: &[u8]) -> Result<Vec<u8>> {
        let req = self.parse(buf, self.max_request_size)?;
        let res = self.forward(&req).await?;

        let res_buf = PacketWriter::new(self.max_upstream_size).write(&res)?;
        trace!("reply for {} is {} bytes", req.header.id, res_buf.len());

        Ok(res_buf)
    }
}

/// Builds the client reply from the accumulated upstream sections. The
/// counts are recomputed here and nowhere else.
pub fn merge(header: &Header, questions: Vec<Question>, answers: Vec<Record>) -> Result<Packet> {
    let question_count = section_count(questions.len())?;
    let answer_count = section_count(answers.len())?;

    Ok(Packet {
        header: header.for_reply(question_count, answer_count),
        questions,
        answers,
    })
}

/// Describes how an upstream reply differs from what was asked, if it does.
/// Such replies are still merged.
fn reply_mismatch(question: &Question, res: &Packet) -> Option<&'static str> {
    if !res.header.response {
        return Some("is not marked as a response");
    }

    if res.questions.len() != 1 || res.questions[0] != *question {
        return Some("does not echo the forwarded question");
    }

    None
}

fn section_count(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| DnsError::MessageTooLarge {
        size: len,
        max: u16::MAX as usize,
    })
}
