//! Main [`Maestro`] client implementation.
//!
//! This module provides the high-level [`Maestro`] session that combines the
//! transport, command encoding, and response parsing into the attribute
//! read/write interface consumed by a device server.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::protocol::{
    Command, parse_auto_scale, parse_measurement, parse_mode, parse_range, parse_trigger_level,
    parse_wavelength,
};
use crate::transport::{SerialTransport, Transport, serial::SerialConfig};
use crate::types::{MeterReading, Range, Unit};

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Transport not yet opened; `connect` may be called (or retried).
    Uninitialized,
    /// Handshake done, attribute operations accepted.
    Ready,
    /// Shut down; every further operation fails with `SessionClosed`.
    Closed,
}

/// Last-known attribute values.
///
/// Reads always hit the device and refresh these as a side effect. The one
/// exception is `wave_corr`: the device has no query for it, so the cached
/// boolean is authoritative and writes to it are optimistic.
#[derive(Debug, Clone, Copy)]
pub struct CachedState {
    /// Range from the last `read_range`.
    pub range: Range,
    /// Auto-range flag from the last `read_auto_range`.
    pub auto_range: bool,
    /// Trigger level from the last `read_trigger_level`.
    pub trigger_level: f64,
    /// Wavelength correction state from the last `write_wave_corr`.
    pub wave_corr: bool,
    /// Wavelength in nm from the last `read_wave_corr_value`.
    pub wave_corr_value: u32,
    /// Value from the last `read_meter_value`.
    pub meter_value: f64,
    /// Unit from the last `read_meter_value`.
    pub unit: Unit,
}

impl Default for CachedState {
    fn default() -> Self {
        Self {
            range: Range::Nano1,
            auto_range: false,
            trigger_level: 0.0,
            wave_corr: false,
            wave_corr_value: 0,
            meter_value: 0.0,
            unit: Unit::Watts,
        }
    }
}

/// Session with a Gentec-EO Maestro power meter.
///
/// The transport sits behind a mutex so exactly one exchange is in flight at
/// a time; the protocol has no request identifiers and cannot multiplex.
pub struct Maestro<T> {
    transport: Arc<Mutex<T>>,
    read_timeout: Duration,
    state: SessionState,
    cache: CachedState,
}

impl Maestro<SerialTransport> {
    /// Creates a new session for a serial port.
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port path (e.g., "/dev/ttyUSB0")
    ///
    /// # Returns
    ///
    /// A new session (not yet connected).
    #[must_use]
    pub fn serial(port: impl Into<String>) -> Self {
        let config = SerialConfig::new(port);
        Self::with_serial_config(config)
    }

    /// Creates a new session with custom serial configuration.
    #[must_use]
    pub fn with_serial_config(config: SerialConfig) -> Self {
        let read_timeout = config.read_timeout;
        let mut client = Self::new(SerialTransport::new(config));
        client.read_timeout = read_timeout;
        client
    }
}

impl<T: Transport> Maestro<T> {
    /// Creates a new session with the given transport.
    fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(Mutex::new(transport)),
            read_timeout: crate::transport::serial::DEFAULT_READ_TIMEOUT,
            state: SessionState::Uninitialized,
            cache: CachedState::default(),
        }
    }

    /// Sets the per-exchange read timeout.
    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = timeout;
    }

    /// Returns true once `connect` has completed and `shutdown` has not run.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Returns the last-known attribute values.
    ///
    /// Purely local; never triggers a wire exchange. Stale until the
    /// corresponding read has run at least once.
    #[must_use]
    pub fn cached_state(&self) -> CachedState {
        self.cache
    }

    /// Connects to the device and initializes the session.
    ///
    /// This will:
    /// 1. Open the transport
    /// 2. Query the firmware version (best-effort, returned and logged)
    /// 3. Reset the wavelength correction to a known-disabled state
    ///
    /// On failure the session stays uninitialized and `connect` may be
    /// called again on the same instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be opened, the handshake write
    /// fails, or the session was already shut down.
    pub async fn connect(&mut self) -> Result<Option<String>> {
        match self.state {
            SessionState::Closed => return Err(Error::SessionClosed),
            SessionState::Ready => return Ok(None),
            SessionState::Uninitialized => {}
        }

        let version = {
            let mut transport = self.transport.lock().await;
            transport.connect().await?;

            // Version reply framing varies across firmware; log it, never parse it.
            transport.discard_pending().await?;
            transport.send(Command::GetVersion.encode()?).await?;
            let line = transport.read_line(self.read_timeout).await?;
            let version = if line.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(&line).into_owned())
            };

            transport.send(Command::SetWavelength(0).encode()?).await?;
            version
        };

        if let Some(v) = &version {
            tracing::info!("device version: {}", v);
        }

        self.cache = CachedState::default();
        self.state = SessionState::Ready;
        tracing::info!("session ready");

        Ok(version)
    }

    /// Shuts the session down and releases the transport.
    ///
    /// Idempotent. Every operation after this fails with `SessionClosed`.
    ///
    /// # Errors
    ///
    /// Returns an error if closing the transport fails; the session is
    /// considered closed regardless.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        let mut transport = self.transport.lock().await;
        transport.disconnect().await
    }

    /// Reads the current measurement range.
    pub async fn read_range(&mut self) -> Result<Range> {
        let line = self.query(Command::GetRange).await?;
        let range = parse_range(&line)?;
        self.cache.range = range;
        Ok(range)
    }

    /// Selects a measurement range.
    pub async fn write_range(&mut self, range: Range) -> Result<()> {
        self.write(Command::SetRange(range)).await
    }

    /// Reads whether auto-range is enabled.
    pub async fn read_auto_range(&mut self) -> Result<bool> {
        let line = self.query(Command::GetAutoScale).await?;
        let enabled = parse_auto_scale(&line)?;
        self.cache.auto_range = enabled;
        Ok(enabled)
    }

    /// Enables or disables auto-range.
    pub async fn write_auto_range(&mut self, enabled: bool) -> Result<()> {
        self.write(Command::SetAutoScale(enabled)).await
    }

    /// Reads the trigger level percentage.
    pub async fn read_trigger_level(&mut self) -> Result<f64> {
        let line = self.query(Command::GetTriggerLevel).await?;
        let level = parse_trigger_level(&line)?;
        self.cache.trigger_level = level;
        Ok(level)
    }

    /// Sets the trigger level percentage.
    pub async fn write_trigger_level(&mut self, level: f64) -> Result<()> {
        self.write(Command::SetTriggerLevel(level)).await
    }

    /// Reads whether wavelength correction is enabled.
    ///
    /// The device has no query for this; the locally cached state from the
    /// last `write_wave_corr` is returned without touching the wire.
    #[allow(clippy::unused_async)] // async for interface uniformity with the other reads
    pub async fn read_wave_corr(&mut self) -> Result<bool> {
        self.ensure_ready()?;
        Ok(self.cache.wave_corr)
    }

    /// Enables or disables wavelength correction.
    ///
    /// Disabling sends the correction-reset command (a zero wavelength).
    /// Enabling only records the intent; a subsequent
    /// [`write_wave_corr_value`](Self::write_wave_corr_value) is required to
    /// take numeric effect. Both directions cache optimistically, as the
    /// device offers no acknowledgment to verify against.
    pub async fn write_wave_corr(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.ensure_ready()?;
        } else {
            self.write(Command::SetWavelength(0)).await?;
        }
        self.cache.wave_corr = enabled;
        Ok(())
    }

    /// Reads the wavelength correction value in nanometers.
    pub async fn read_wave_corr_value(&mut self) -> Result<u32> {
        let line = self.query(Command::GetWavelength).await?;
        let nm = parse_wavelength(&line)?;
        self.cache.wave_corr_value = nm;
        Ok(nm)
    }

    /// Sets the wavelength correction value in nanometers.
    ///
    /// # Errors
    ///
    /// Returns `Error::OperandOutOfRange` for values above 99 999; nothing
    /// reaches the wire in that case.
    pub async fn write_wave_corr_value(&mut self, nm: u32) -> Result<()> {
        self.write(Command::SetWavelength(nm)).await
    }

    /// Reads the current measured value together with its unit.
    ///
    /// The mode is queried first on every read because the device may switch
    /// between power and energy modes at any time; the unit of the returned
    /// reading is the one in effect for this measurement.
    pub async fn read_meter_value(&mut self) -> Result<MeterReading> {
        let line = self.query(Command::GetMode).await?;
        let unit = parse_mode(&line)?;
        if unit != self.cache.unit {
            tracing::debug!("measurement unit changed: {} -> {}", self.cache.unit, unit);
            self.cache.unit = unit;
        }

        let line = self.query(Command::GetCurrentValue).await?;
        let value = parse_measurement(&line)?;
        self.cache.meter_value = value;

        Ok(MeterReading { value, unit })
    }

    /// Rejects operations outside the `Ready` state.
    fn ensure_ready(&self) -> Result<()> {
        match self.state {
            SessionState::Ready => Ok(()),
            SessionState::Uninitialized => Err(Error::NotConnected),
            SessionState::Closed => Err(Error::SessionClosed),
        }
    }

    /// Runs one query exchange: drain stale input, send, read one line.
    ///
    /// The drain is mandatory; without it a slow caller could read the echo
    /// of a previous exchange as this command's answer.
    async fn query(&mut self, command: Command) -> Result<Bytes> {
        debug_assert!(command.expects_response(), "query with a set command");
        self.ensure_ready()?;
        let request = command.encode()?;
        let mut transport = self.transport.lock().await;
        transport.discard_pending().await?;
        transport.send(request).await?;
        transport.read_line(self.read_timeout).await
    }

    /// Sends a fire-and-forget set command.
    async fn write(&mut self, command: Command) -> Result<()> {
        debug_assert!(!command.expects_response(), "write with a query command");
        self.ensure_ready()?;
        let request = command.encode()?;
        let mut transport = self.transport.lock().await;
        transport.send(request).await
    }
}
