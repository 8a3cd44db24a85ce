//! Power watch: turns `PowerMonitor` polls into change notifications.
//!
//! The first successful poll is always delivered (it doubles as the initial
//! query); afterwards only differing statuses are sent. A failing monitor
//! produces nothing, which leaves the machine in Idle.
use crossbeam_channel as xch;
use std::time::Duration;
use thermo_traits::{PowerMonitor, PowerStatus};

use crate::error::MonitorError;
use crate::machine::Event;
use crate::status::ChargingState;

pub struct PowerWatch {
    rx: xch::Receiver<PowerStatus>,
    shutdown: Option<xch::Sender<()>>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl PowerWatch {
    pub fn spawn<P: PowerMonitor + Send + 'static>(mut monitor: P, poll: Duration) -> Self {
        let (tx, rx) = xch::bounded(4);
        let (shutdown_tx, shutdown_rx) = xch::bounded::<()>(0);

        let join_handle = std::thread::spawn(move || {
            let mut last: Option<PowerStatus> = None;
            let mut failing = false;
            loop {
                match monitor.poll() {
                    Ok(status) if last != Some(status) => {
                        if failing {
                            tracing::info!("power monitor recovered");
                            failing = false;
                        }
                        tracing::debug!(charging = status.charging, battery = ?status.battery_percent, "power status changed");
                        last = Some(status);
                        xch::select! {
                            send(tx, status) -> res => {
                                if res.is_err() {
                                    tracing::debug!("power consumer disconnected, exiting thread");
                                    break;
                                }
                            }
                            recv(shutdown_rx) -> _ => break,
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        let err = MonitorError::Power(e.to_string());
                        if failing {
                            tracing::debug!(error = %err, "power monitor still failing");
                        } else {
                            tracing::warn!(error = %err, "power monitor poll failed");
                            failing = true;
                        }
                    }
                }

                match shutdown_rx.recv_timeout(poll) {
                    Err(xch::RecvTimeoutError::Timeout) => {}
                    _ => break,
                }
            }
            tracing::trace!("power watch thread exiting cleanly");
        });

        Self {
            rx,
            shutdown: Some(shutdown_tx),
            join_handle: Some(join_handle),
        }
    }

    pub fn receiver(&self) -> &xch::Receiver<PowerStatus> {
        &self.rx
    }
}

impl Drop for PowerWatch {
    fn drop(&mut self) {
        drop(self.shutdown.take());
        if let Some(handle) = self.join_handle.take()
            && let Err(e) = handle.join()
        {
            tracing::warn!(?e, "power watch thread panicked during shutdown");
        }
    }
}

/// Machine events for one power status: battery first, then charging.
pub fn status_events(status: PowerStatus) -> Vec<Event> {
    let mut events = Vec::with_capacity(2);
    if let Some(pct) = status.battery_percent {
        events.push(Event::Battery(pct));
    }
    events.push(Event::Charging(ChargingState::from(status.charging)));
    events
}
