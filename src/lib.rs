//! Forwarding DNS server: decodes client queries, sends each question to an
//! upstream resolver on its own and merges the answers into one reply.

pub mod args;
pub mod config;
pub mod context;
pub mod dns_class;
pub mod duration;
pub mod error;
pub mod fs;
pub mod handler;
pub mod header;
pub mod name;
pub mod packet;
pub mod parser;
pub mod query_type;
pub mod question;
pub mod record;
pub mod resolver;
pub mod result_code;
pub mod server;
pub mod writer;
