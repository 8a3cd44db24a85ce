pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Error type used at the collaborator trait boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Produces one temperature sample per call, in degrees Celsius.
///
/// Implementations may block briefly (a real sensor) or return immediately
/// (a simulator). Pacing is owned by the caller.
pub trait ReadingSource {
    fn read(&mut self) -> Result<f64, BoxError>;
}

/// Charging flag plus optional battery level, as seen by one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerStatus {
    pub charging: bool,
    /// Battery level in percent (0..=100), when the backend reports one.
    pub battery_percent: Option<u8>,
}

/// Reports the device's power state. The first poll doubles as the
/// initial query; later polls are turned into change events by the caller.
pub trait PowerMonitor {
    fn poll(&mut self) -> Result<PowerStatus, BoxError>;
}

impl<T: ReadingSource + ?Sized> ReadingSource for Box<T> {
    fn read(&mut self) -> Result<f64, BoxError> {
        (**self).read()
    }
}

impl<T: PowerMonitor + ?Sized> PowerMonitor for Box<T> {
    fn poll(&mut self) -> Result<PowerStatus, BoxError> {
        (**self).poll()
    }
}
