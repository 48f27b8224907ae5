//! Reactor-backed clock.
//!
//! Implements [`Clock`] with `async-io-mini` timers, so a sleeping task
//! parks on the reactor instead of spinning. A zero duration is a plain
//! cooperative yield.

use core::time::Duration;

use crate::app::ports::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncIoClock;

impl AsyncIoClock {
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for AsyncIoClock {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            futures_lite::future::yield_now().await;
        } else {
            async_io_mini::Timer::after(duration).await;
        }
    }
}
