//! Serial transport implementation.
//!
//! This module provides serial port communication for Maestro power meters
//! connected via USB or RS-232.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};

use crate::error::{Error, Result};
use crate::transport::Transport;

/// Baud rate the Maestro talks at.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default per-exchange read timeout.
///
/// Responses arrive well within this window; set commands produce nothing,
/// so the timeout elapsing with no bytes is a normal occurrence.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Slice granted to each read while draining stale input.
const DRAIN_READ_TIMEOUT: Duration = Duration::from_millis(5);

/// Configuration for serial transport.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0" or "COM3").
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Timeout for reading a response line.
    pub read_timeout: Duration,
}

impl SerialConfig {
    /// Creates a new serial configuration with default settings.
    #[must_use]
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Sets the baud rate.
    #[must_use]
    pub const fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

/// Serial transport for Maestro communication.
///
/// The protocol is strictly half-duplex, so the stream is kept whole rather
/// than split into read/write halves.
pub struct SerialTransport {
    config: SerialConfig,
    stream: Option<SerialStream>,
}

impl SerialTransport {
    /// Creates a new serial transport with the given configuration.
    #[must_use]
    pub fn new(config: SerialConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Creates a new serial transport for the given port with default settings.
    #[must_use]
    pub fn with_port(port: impl Into<String>) -> Self {
        Self::new(SerialConfig::new(port))
    }
}

impl Transport for SerialTransport {
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.stream.is_some() {
                return Ok(());
            }

            tracing::info!("connecting to serial port: {}", self.config.port);

            let stream = tokio_serial::new(&self.config.port, self.config.baud_rate)
                .data_bits(DataBits::Eight)
                .stop_bits(StopBits::One)
                .parity(Parity::None)
                .open_native_async()
                .map_err(Error::Serial)?;

            self.stream = Some(stream);

            tracing::info!("connected to serial port");
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.stream.is_some() {
                tracing::info!("disconnecting from serial port");
                self.stream = None;
            }
            Ok(())
        })
    }

    fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

            tracing::trace!("sending request: {:?}", data);

            stream.write_all(&data).await.map_err(Error::Io)?;
            stream.flush().await.map_err(Error::Io)?;

            Ok(())
        })
    }

    fn read_line(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
            let line = read_line_until(stream, timeout).await?;
            tracing::trace!("received line: {:?}", line);
            Ok(line)
        })
    }

    fn discard_pending(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
            let total_drained = drain_input(stream).await?;
            if total_drained > 0 {
                tracing::debug!("drained {} stale bytes from buffer", total_drained);
            }
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

/// Accumulates bytes until a line terminator or until `timeout` elapses.
///
/// Returns whatever arrived, with the trailing `\r\n` stripped; parsers
/// never see the terminator. Bytes trailing the terminator within one read
/// are stale input for the next exchange and are dropped here, since the
/// pre-query drain disposes of anything still buffered.
async fn read_line_until(
    reader: &mut (impl AsyncRead + Unpin + Send),
    timeout: Duration,
) -> Result<Bytes> {
    let deadline = tokio::time::Instant::now() + timeout;
    let mut line = BytesMut::new();
    let mut buf = [0u8; 256];

    loop {
        if let Some(pos) = line.iter().position(|&b| b == b'\n') {
            line.truncate(pos + 1);
            break;
        }
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break; // timeout elapsed, return what we have
        }
        match tokio::time::timeout(remaining, reader.read(&mut buf)).await {
            Ok(Ok(0)) => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "serial port closed",
                )));
            }
            Ok(Ok(n)) => line.extend_from_slice(&buf[..n]),
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => break,
        }
    }

    if line.ends_with(b"\n") {
        line.truncate(line.len() - 1);
    }
    if line.ends_with(b"\r") {
        line.truncate(line.len() - 1);
    }

    Ok(line.freeze())
}

/// Drains already-buffered input, returning the number of bytes dropped.
///
/// Each read gets a short slice of time; the first slice that passes with no
/// data ends the drain. Read errors propagate like any other transport
/// failure.
async fn drain_input(reader: &mut (impl AsyncRead + Unpin + Send)) -> Result<usize> {
    let mut buf = [0u8; 256];
    let mut total_drained = 0usize;

    loop {
        match tokio::time::timeout(DRAIN_READ_TIMEOUT, reader.read(&mut buf)).await {
            Ok(Ok(0)) | Err(_) => break,
            Ok(Ok(n)) => total_drained += n,
            Ok(Err(e)) => return Err(Error::Io(e)),
        }
    }

    Ok(total_drained)
}

/// Lists available serial ports.
///
/// # Errors
///
/// Returns an error if the port list cannot be retrieved.
pub fn list_ports() -> Result<Vec<String>> {
    let ports = tokio_serial::available_ports().map_err(Error::Serial)?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::task::{Context, Poll};

    use tokio::io::{ReadBuf, duplex};

    /// Reader whose every poll fails, standing in for a vanished port.
    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "port gone")))
        }
    }

    #[tokio::test]
    async fn test_read_line_strips_crlf_terminator() {
        let (mut device, mut host) = duplex(64);
        device.write_all(b"Range: 6\r\n").await.unwrap();

        let line = read_line_until(&mut host, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(line, "Range: 6");
    }

    #[tokio::test]
    async fn test_read_line_reassembles_split_reply() {
        let (mut device, mut host) = duplex(64);
        let writer = tokio::spawn(async move {
            device.write_all(b"Trigger Lev").await.unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
            device.write_all(b"el: 2.5\r\n").await.unwrap();
            device
        });

        let line = read_line_until(&mut host, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(line, "Trigger Level: 2.5");
        drop(writer.await.unwrap());
    }

    #[tokio::test]
    async fn test_read_line_timeout_returns_partial_bytes() {
        let (mut device, mut host) = duplex(64);
        device.write_all(b"3.14").await.unwrap();

        let line = read_line_until(&mut host, Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(line, "3.14");
    }

    #[tokio::test]
    async fn test_read_line_timeout_with_no_bytes_is_empty() {
        let (device, mut host) = duplex(64);

        let line = read_line_until(&mut host, Duration::from_millis(20))
            .await
            .unwrap();
        assert!(line.is_empty());
        drop(device);
    }

    #[tokio::test]
    async fn test_read_line_drops_bytes_after_terminator() {
        let (mut device, mut host) = duplex(64);
        device.write_all(b"Mode: 0\r\nRange: 6\r\n").await.unwrap();

        let line = read_line_until(&mut host, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(line, "Mode: 0");
    }

    #[tokio::test]
    async fn test_read_line_closed_peer_is_io_error() {
        let (device, mut host) = duplex(64);
        drop(device);

        let err = read_line_until(&mut host, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_drain_input_discards_buffered_bytes() {
        let (mut device, mut host) = duplex(64);
        device.write_all(b"stale\r\n").await.unwrap();
        drop(device);

        assert_eq!(drain_input(&mut host).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_drain_input_surfaces_read_errors() {
        let mut reader = FailingReader;
        let err = drain_input(&mut reader).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_serial_config_defaults() {
        let config = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(config.read_timeout, DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn test_serial_config_builder() {
        let config = SerialConfig::new("/dev/ttyUSB0")
            .baud_rate(9600)
            .read_timeout(Duration::from_secs(1));
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.read_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_disconnected_transport_reports_not_connected() {
        let transport = SerialTransport::with_port("/dev/ttyUSB0");
        assert!(!transport.is_connected());
    }

    #[test]
    #[ignore = "Requires /sys/class/tty - not available in sandboxed builds"]
    fn test_list_ports() {
        // Just verify it doesn't panic
        let _ = list_ports();
    }
}
