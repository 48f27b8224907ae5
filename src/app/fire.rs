//! Fire control: the single-shot latch and the firing task's wake-up.
//!
//! ```text
//!   executor ── try_launch ──▶ latch set ── signal ──▶ firing task
//!                   │                                      │
//!                   └─ Busy / SafetyEngaged          release()
//! ```
//!
//! At most one firing sequence is in flight. A fire order that arrives
//! while the latch is held is rejected, not queued.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use crate::error::FireRejected;

pub struct FireControl {
    latch: Cell<bool>,
    spin_hold: Cell<bool>,
    order: Signal<NoopRawMutex, ()>,
    shots: Cell<u32>,
}

impl Default for FireControl {
    fn default() -> Self {
        Self::new()
    }
}

impl FireControl {
    pub const fn new() -> Self {
        Self {
            latch: Cell::new(false),
            spin_hold: Cell::new(false),
            order: Signal::new(),
            shots: Cell::new(0),
        }
    }

    /// Take the latch and wake the firing task.
    pub fn try_launch(&self, safety_engaged: bool) -> Result<(), FireRejected> {
        if safety_engaged {
            return Err(FireRejected::SafetyEngaged);
        }
        if self.latch.replace(true) {
            return Err(FireRejected::Busy);
        }
        self.order.signal(());
        Ok(())
    }

    /// Wait for the next accepted fire order.
    pub async fn wait_order(&self) {
        self.order.wait().await;
    }

    /// Called by the firing task once the sequence has finished.
    pub fn release(&self) {
        self.shots.set(self.shots.get().wrapping_add(1));
        self.latch.set(false);
    }

    pub fn in_flight(&self) -> bool {
        self.latch.get()
    }

    /// Keep the flywheel spinning between shots.
    pub fn set_spin_hold(&self, on: bool) {
        self.spin_hold.set(on);
    }

    pub fn spin_hold(&self) -> bool {
        self.spin_hold.get()
    }

    /// Completed firing sequences since boot.
    pub fn shots_fired(&self) -> u32 {
        self.shots.get()
    }

    /// Whether an accepted order is waiting for the firing task.
    pub fn order_pending(&self) -> bool {
        self.order.signaled()
    }
}
