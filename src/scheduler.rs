//! Scheduler loop: heartbeat timing, order polling, brew dispatch.
//!
//! ```text
//! ┌──────────────────────────── tick (every 100 ms) ────────────────────────────┐
//! │                                                                             │
//! │  1. heartbeat due?  ──▶ RemotePort::heartbeat  (timestamp updated always)   │
//! │                                                                             │
//! │  2. idle and poll due? ──▶ RemotePort::fetch_order (timestamp updated)      │
//! │                               │                                             │
//! │                               └─ Some(order) ──▶ BrewSequencer::run         │
//! │                                                  (blocks for the brew)      │
//! │  3. sleep one tick                                                          │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single-threaded and cooperative.  While a brew runs, the loop is parked
//! inside the sequencer, so neither polls nor heartbeats happen until it
//! returns.  A stop request is honoured at the top of the next iteration.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use log::{debug, error, info};

use crate::app::events::AppEvent;
use crate::app::ports::{ClockPort, EventSink, LinePort, RemotePort};
use crate::app::session::HardwareSession;
use crate::brew::{BrewReport, BrewSequencer};
use crate::config::AgentConfig;
use crate::error::Error;

/// Loop granularity.
pub const TICK: Duration = Duration::from_millis(100);

/// What a single tick did.  Used by tests and debug logging.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub heartbeat_sent: bool,
    pub polled: bool,
    pub brew: Option<BrewReport>,
}

pub struct Scheduler {
    hardware_id: String,
    poll_interval: Duration,
    heartbeat_interval: Duration,
    session: HardwareSession,
    sequencer: BrewSequencer,
    /// `None` until the first poll; makes the first tick poll immediately.
    last_poll: Option<Duration>,
    /// `None` until the first heartbeat.
    last_heartbeat: Option<Duration>,
}

impl Scheduler {
    pub fn new(config: &AgentConfig) -> Self {
        Self::with_intervals(
            &config.hardware_id,
            Duration::from_millis(config.poll_interval_ms),
            Duration::from_millis(config.heartbeat_interval_ms),
        )
    }

    pub fn with_intervals(hardware_id: &str, poll_interval: Duration, heartbeat_interval: Duration) -> Self {
        Self {
            hardware_id: hardware_id.to_string(),
            poll_interval,
            heartbeat_interval,
            session: HardwareSession::new(),
            sequencer: BrewSequencer::new(hardware_id),
            last_poll: None,
            last_heartbeat: None,
        }
    }

    pub fn session(&self) -> &HardwareSession {
        &self.session
    }

    pub fn last_poll(&self) -> Option<Duration> {
        self.last_poll
    }

    pub fn last_heartbeat(&self) -> Option<Duration> {
        self.last_heartbeat
    }

    /// Run one scheduling pass.
    ///
    /// Network failures are absorbed by the remote port.  The only error is
    /// a brew whose teardown could not drive the actuators off: the machine
    /// is then in an unknown physical state and the loop must stop.
    pub fn tick(
        &mut self,
        hw: &mut impl LinePort,
        remote: &mut impl RemotePort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<TickReport, Error> {
        let now = clock.uptime();
        let mut report = TickReport::default();

        if is_due(self.last_heartbeat, now, self.heartbeat_interval) {
            debug!("Sending heartbeat...");
            if !remote.heartbeat(&self.hardware_id) {
                sink.emit(&AppEvent::HeartbeatMissed);
            }
            self.last_heartbeat = Some(now);
            report.heartbeat_sent = true;
        }

        if !self.session.is_brewing() && is_due(self.last_poll, now, self.poll_interval) {
            debug!("Polling for new orders...");
            let order = remote.fetch_order(&self.hardware_id);
            self.last_poll = Some(now);
            report.polled = true;

            if let Some(order) = order {
                sink.emit(&AppEvent::OrderReceived {
                    order_id: order.id.clone(),
                    drink_name: order.drink_name.clone(),
                });
                let brew = self
                    .sequencer
                    .run(&order, &mut self.session, hw, remote, clock, sink)?;
                if !brew.actuators_safe {
                    return Err(Error::UnsafeTeardown(brew.order_id));
                }
                report.brew = Some(brew);
            }
        }

        Ok(report)
    }

    /// Tick until `stop` is raised or a tick fails.
    ///
    /// `stop` is checked between ticks only, so a request that lands in a
    /// brewing tick waits for that tick to finish.  With the default
    /// script and a 10 s request timeout the worst case is about 88 s:
    /// heartbeat and poll (20 s), five status posts (50 s), step holds
    /// (15.5 s), completion blink (2 s).  Size the service stop timeout
    /// above that.
    pub fn run(
        &mut self,
        hw: &mut impl LinePort,
        remote: &mut impl RemotePort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
        stop: &AtomicBool,
    ) -> Result<(), Error> {
        info!("Starting TotoBin hardware service...");
        sink.emit(&AppEvent::Started {
            hardware_id: self.hardware_id.clone(),
        });

        let result = loop {
            if stop.load(Ordering::SeqCst) {
                info!("Shutting down...");
                break Ok(());
            }
            if let Err(e) = self.tick(hw, remote, clock, sink) {
                error!("Unrecoverable fault: {}", e);
                break Err(e);
            }
            clock.sleep(TICK);
        };

        sink.emit(&AppEvent::Stopped);
        result
    }
}

/// `true` if nothing has happened yet, or at least `interval` has passed.
fn is_due(last: Option<Duration>, now: Duration, interval: Duration) -> bool {
    last.is_none_or(|t| now.saturating_sub(t) >= interval)
}
