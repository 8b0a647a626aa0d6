use std::time::Duration;

/// Monotonic time source, measured from an arbitrary fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}
