//! Transport layer for Maestro communication.
//!
//! This module provides the abstraction over the serial link. The device is
//! a half-duplex request/response peer: one command goes out, at most one
//! line comes back.

pub mod serial;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;

use crate::error::Result;

/// Trait for transport implementations.
pub trait Transport: Send + Sync {
    /// Opens the connection to the device.
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Closes the connection. Idempotent.
    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Writes a request to the device.
    fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Reads one response line.
    ///
    /// Accumulates bytes until a `\r\n` terminator or until `timeout`
    /// elapses, whichever comes first, and returns whatever arrived with the
    /// terminator stripped. An empty result is not a transport failure;
    /// callers that required data treat it as a protocol error.
    fn read_line(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>>;

    /// Drains and discards any bytes already buffered.
    ///
    /// Issued before every query so a stale reply to an earlier exchange is
    /// never mistaken for the answer to this one.
    fn discard_pending(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Returns true if connected.
    fn is_connected(&self) -> bool;
}

pub use serial::SerialTransport;
