//! Interrupt-driven DHT11 / DHT22 humidity and temperature sensor.
//!
//! ## Wire protocol
//!
//! ```text
//!   host pulls low ≥18 ms, releases
//!   ──┐                 ┌──┐      ┌────┐    ┌──┐  ┌─────┐
//!     └─────────────────┘  └──────┘    └────┘  └──┘     └─ …
//!                          E0  response  E1  bit0  E2 bit1
//! ```
//!
//! Only falling edges are captured.  The GPIO ISR stamps each one (µs) into
//! a [`DhtLine`]; after 42 edges the frame is complete and the ISR raises a
//! signal.  Edge-to-edge deltas give one response interval (~160 µs) and 40
//! bit intervals (~78 µs for a `0`, ~120 µs for a `1`).
//!
//! The control loop never waits on any of this: [`DhtSensor`] advances
//! through `StartPulse → Capturing → Idle` one poll at a time.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::OutputPin;
use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::ClimateSensorPort;
use crate::error::SensorError;
use crate::timing::{TimeTick, elapsed};

/// Falling edges in a complete frame: response start, 40 bit starts, final.
pub const FRAME_EDGES: usize = 42;

/// Host start pulse, line held low (ms).
pub const START_PULSE_MS: u32 = 18;
/// Give up on a frame this long after releasing the line (ms).
pub const FRAME_TIMEOUT_MS: u32 = 10;

const RESPONSE_MIN_US: u32 = 120;
const RESPONSE_MAX_US: u32 = 200;
const BIT_MIN_US: u32 = 60;
const BIT_MAX_US: u32 = 155;
/// Bit intervals longer than this decode as `1`.
const BIT_ONE_US: u32 = 100;

// ── Sensor model ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhtModel {
    Dht11,
    /// Also sold as AM2302.
    Dht22,
}

impl DhtModel {
    /// Convert a checksummed frame to (°C, %RH).
    pub fn convert(self, frame: &[u8; 5]) -> (f32, f32) {
        match self {
            Self::Dht11 => {
                let humidity = f32::from(frame[0]) + f32::from(frame[1]) / 10.0;
                let celsius = f32::from(frame[2]) + f32::from(frame[3]) / 10.0;
                (celsius, humidity)
            }
            Self::Dht22 => {
                let humidity = f32::from(u16::from_be_bytes([frame[0], frame[1]])) / 10.0;
                let magnitude =
                    f32::from(u16::from_be_bytes([frame[2] & 0x7F, frame[3]])) / 10.0;
                let celsius = if frame[2] & 0x80 != 0 {
                    -magnitude
                } else {
                    magnitude
                };
                (celsius, humidity)
            }
        }
    }
}

pub fn celsius_to_fahrenheit(c: f32) -> f32 {
    c * 9.0 / 5.0 + 32.0
}

// ── Frame decoding ────────────────────────────────────────────

/// Decode captured falling-edge timestamps (µs) into a verified frame.
pub fn decode_frame(edges: &[u32]) -> Result<[u8; 5], SensorError> {
    if edges.is_empty() {
        return Err(SensorError::IsrTimeout);
    }
    if edges.len() < 2 {
        return Err(SensorError::ResponseTimeout);
    }

    let response = elapsed(edges[1], edges[0]);
    if !(RESPONSE_MIN_US..=RESPONSE_MAX_US).contains(&response) {
        return Err(SensorError::ResponseTimeout);
    }
    if edges.len() < FRAME_EDGES {
        return Err(SensorError::DataTimeout);
    }

    let mut frame = [0u8; 5];
    for (i, pair) in edges[1..FRAME_EDGES].windows(2).enumerate() {
        let delta = elapsed(pair[1], pair[0]);
        if !(BIT_MIN_US..=BIT_MAX_US).contains(&delta) {
            return Err(SensorError::Delta);
        }
        if delta > BIT_ONE_US {
            frame[i / 8] |= 0x80 >> (i % 8);
        }
    }

    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }
    Ok(frame)
}

/// Synthesize the falling-edge timestamps a sensor would produce for
/// `frame`, starting at `t0_us`.  Used by the host simulation and tests.
pub fn frame_edges(frame: &[u8; 5], t0_us: u32) -> [u32; FRAME_EDGES] {
    let mut edges = [0u32; FRAME_EDGES];
    let mut t = t0_us;
    edges[0] = t;
    t = t.wrapping_add(160);
    edges[1] = t;
    for bit in 0..40 {
        let one = frame[bit / 8] & (0x80 >> (bit % 8)) != 0;
        t = t.wrapping_add(if one { 120 } else { 78 });
        edges[bit + 2] = t;
    }
    edges
}

// ── ISR ↔ loop handoff ────────────────────────────────────────

#[derive(Debug)]
struct EdgeCapture {
    armed: bool,
    edges: Vec<u32, FRAME_EDGES>,
}

/// Edge buffer shared between the GPIO ISR and the control loop.
pub struct DhtLine {
    capture: Mutex<CriticalSectionRawMutex, RefCell<EdgeCapture>>,
    done: Signal<CriticalSectionRawMutex, ()>,
}

/// The board's single DHT line; the GPIO ISR feeds this.
pub static DHT_LINE: DhtLine = DhtLine::new();

impl DhtLine {
    pub const fn new() -> Self {
        Self {
            capture: Mutex::new(RefCell::new(EdgeCapture {
                armed: false,
                edges: Vec::new(),
            })),
            done: Signal::new(),
        }
    }

    /// ISR entry point.  Edges outside an armed capture are ignored,
    /// including the host's own start pulse.
    pub fn on_falling_edge(&self, now_us: u32) {
        let complete = self.capture.lock(|c| {
            let mut c = c.borrow_mut();
            if !c.armed || c.edges.push(now_us).is_err() {
                return false;
            }
            if c.edges.is_full() {
                c.armed = false;
                return true;
            }
            false
        });
        if complete {
            self.done.signal(());
        }
    }

    fn arm(&self) {
        self.done.reset();
        self.capture.lock(|c| {
            let mut c = c.borrow_mut();
            c.edges.clear();
            c.armed = true;
        });
    }

    fn frame_complete(&self) -> bool {
        self.done.signaled()
    }

    /// Stop capturing and hand back whatever arrived.
    fn take(&self) -> Vec<u32, FRAME_EDGES> {
        self.done.reset();
        self.capture.lock(|c| {
            let mut c = c.borrow_mut();
            c.armed = false;
            core::mem::take(&mut c.edges)
        })
    }
}

impl Default for DhtLine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Acquisition session ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    Idle,
    Acquiring,
    CompleteOk,
    CompleteError,
}

/// Lifecycle of one sensor transaction.
#[derive(Debug, Clone, Copy)]
pub struct AcquisitionSession {
    state: AcquisitionState,
    error: Option<SensorError>,
}

impl AcquisitionSession {
    pub const fn new() -> Self {
        Self {
            state: AcquisitionState::Idle,
            error: None,
        }
    }

    /// Begin a transaction.  Refused while one is already in flight.
    pub fn start(&mut self) -> Result<(), SensorError> {
        if self.state == AcquisitionState::Acquiring {
            return Err(SensorError::Busy);
        }
        self.state = AcquisitionState::Acquiring;
        self.error = None;
        Ok(())
    }

    /// Record the transaction outcome once it is known (`None` = still
    /// running).  Outcomes arriving outside `Acquiring` are ignored.
    pub fn poll(&mut self, outcome: Option<Result<(), SensorError>>) -> AcquisitionState {
        if self.state == AcquisitionState::Acquiring {
            match outcome {
                Some(Ok(())) => self.state = AcquisitionState::CompleteOk,
                Some(Err(e)) => {
                    self.state = AcquisitionState::CompleteError;
                    self.error = Some(e);
                }
                None => {}
            }
        }
        self.state
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn result(&self) -> Result<(), SensorError> {
        match self.state {
            AcquisitionState::Idle => Err(SensorError::NotStarted),
            AcquisitionState::Acquiring => Err(SensorError::Busy),
            AcquisitionState::CompleteOk => Ok(()),
            AcquisitionState::CompleteError => Err(self.error.unwrap_or(SensorError::DataTimeout)),
        }
    }

    /// Legacy numeric status: `0` on success, negative error code otherwise.
    pub fn result_code(&self) -> i8 {
        match self.result() {
            Ok(()) => 0,
            Err(e) => e.code(),
        }
    }
}

impl Default for AcquisitionSession {
    fn default() -> Self {
        Self::new()
    }
}

// ── Driver ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    StartPulse { since: TimeTick },
    Capturing { since: TimeTick },
}

/// Non-blocking DHT driver.
///
/// `P` drives the open-drain data line: `set_low` pulls it down,
/// `set_high` releases it to the pull-up.
pub struct DhtSensor<'a, P: OutputPin> {
    model: DhtModel,
    pin: P,
    line: &'a DhtLine,
    phase: Phase,
    session: AcquisitionSession,
    celsius: f32,
    humidity: f32,
}

impl<'a, P: OutputPin> DhtSensor<'a, P> {
    pub fn new(model: DhtModel, pin: P, line: &'a DhtLine) -> Self {
        Self {
            model,
            pin,
            line,
            phase: Phase::Idle,
            session: AcquisitionSession::new(),
            celsius: 0.0,
            humidity: 0.0,
        }
    }

    pub fn session(&self) -> &AcquisitionSession {
        &self.session
    }

    pub fn celsius(&self) -> f32 {
        self.celsius
    }

    fn fail(&mut self, error: SensorError) {
        self.phase = Phase::Idle;
        self.session.poll(Some(Err(error)));
    }

    fn finish_capture(&mut self) {
        let edges = self.line.take();
        self.phase = Phase::Idle;
        match decode_frame(&edges) {
            Ok(frame) => {
                let (c, h) = self.model.convert(&frame);
                self.celsius = c;
                self.humidity = h;
                debug!("dht: {:.1} C {:.1} %RH", c, h);
                self.session.poll(Some(Ok(())));
            }
            Err(e) => {
                debug!("dht: frame rejected after {} edges: {}", edges.len(), e);
                self.session.poll(Some(Err(e)));
            }
        }
    }
}

impl<P: OutputPin> ClimateSensorPort for DhtSensor<'_, P> {
    fn begin_acquisition(&mut self, now: TimeTick) {
        if let Err(e) = self.session.start() {
            warn!("dht: start refused: {}", e);
            return;
        }
        if self.pin.set_low().is_err() {
            warn!("dht: could not drive data line");
            self.fail(SensorError::NotStarted);
            return;
        }
        self.phase = Phase::StartPulse { since: now };
    }

    fn acquiring(&mut self, now: TimeTick) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::StartPulse { since } => {
                if elapsed(now, since) >= START_PULSE_MS {
                    self.line.arm();
                    if self.pin.set_high().is_err() {
                        warn!("dht: could not release data line");
                        self.line.take();
                        self.fail(SensorError::NotStarted);
                        return false;
                    }
                    self.phase = Phase::Capturing { since: now };
                }
                true
            }
            Phase::Capturing { since } => {
                if self.line.frame_complete() || elapsed(now, since) >= FRAME_TIMEOUT_MS {
                    self.finish_capture();
                    return false;
                }
                true
            }
        }
    }

    fn result(&self) -> Result<(), SensorError> {
        self.session.result()
    }

    fn fahrenheit(&self) -> f32 {
        celsius_to_fahrenheit(self.celsius)
    }

    fn humidity(&self) -> f32 {
        self.humidity
    }
}
