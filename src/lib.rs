#![deny(missing_debug_implementations)]
#![cfg_attr(test, deny(rust_2018_idioms))]

//! # httpcore
//!
//! `httpcore` is the core of an HTTP/1.1 message framing and connection I/O
//! engine: it models request and response messages as mutable,
//! header-indexed structures; serializes them to RFC 7230 wire form;
//! parses them incrementally from a bounded read buffer; and drives full
//! request/response exchanges over an abstract asynchronous byte transport,
//! including protocol-upgrade handoffs that preserve any bytes already
//! buffered past the message head.
//!
//! ## What this crate is not
//!
//! This is a framing and connection-I/O layer, not a full HTTP stack. It
//! does not speak HTTP/2 or HTTP/3, does not decode `Transfer-Encoding:
//! chunked` bodies, does not pipeline requests, does not negotiate content,
//! does not pool or keep connections alive across exchanges, and does not
//! terminate TLS or route requests. Those concerns belong one layer up, in
//! an application or a higher-level client/server crate built on top of
//! this one.
//!
//! ## Layout
//!
//! - [`header`] — the case-insensitive, order-preserving header multimap.
//! - [`message`] — [`Request`](message::Request) and
//!   [`Response`](message::Response) message types.
//! - [`buffer`] — the fixed-capacity Read Buffer.
//! - [`tokenizer`] — CRLF line extraction ahead of parsing.
//! - [`parse`] — request-line/status-line/header-line parsing.
//! - [`encode`] — two-pass dry-run/emit message-head serialization.
//! - [`transport`] — the abstract [`Transport`](transport::Transport) trait.
//! - [`builder`] — [`ConnectionBuilder`](builder::ConnectionBuilder).
//! - [`conn`] — the [`Connection`](conn::Connection) engine itself.
//! - [`upgrade`] — residual-byte-preserving protocol upgrade handoff.
//! - [`error`] — the crate-wide [`Error`] type.

pub mod builder;
pub mod conn;
pub mod encode;
pub mod error;
pub mod header;
pub mod message;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod parse;
pub mod buffer;
pub mod tokenizer;
pub mod transport;
pub mod upgrade;

pub use crate::builder::ConnectionBuilder;
pub use crate::conn::Connection;
pub use crate::error::{Error, Result};
pub use crate::header::{Header, HeaderTable};
pub use crate::message::{Request, Response};
pub use crate::transport::Transport;
