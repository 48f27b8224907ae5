//! Channel-keyed set of commands awaiting execution.
//!
//! One slot per [`Channel`]; inserting replaces whatever the channel held.
//! The reader task upserts, the executor takes a snapshot and removes
//! entries as it consumes them. Both run on the same cooperative thread,
//! so no lock is needed, only the snapshot.

use heapless::Vec;

use super::commands::{Channel, Command};

/// Copy of the set's entries, in channel order.
pub type Entries = Vec<Command, { Channel::COUNT }>;

#[derive(Debug, Default, Clone)]
pub struct ActiveCommandSet {
    slots: [Option<Command>; Channel::COUNT],
}

impl ActiveCommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `cmd`, replacing any entry on the same channel.
    /// Returns the superseded entry, if there was one.
    pub fn upsert(&mut self, cmd: Command) -> Option<Command> {
        self.slots[cmd.channel().index()].replace(cmd)
    }

    /// Remove and return the entry on `channel`.
    pub fn remove(&mut self, channel: Channel) -> Option<Command> {
        self.slots[channel.index()].take()
    }

    pub fn get(&self, channel: Channel) -> Option<&Command> {
        self.slots[channel.index()].as_ref()
    }

    /// Copy of the current entries, safe to iterate while the set mutates.
    pub fn snapshot_entries(&self) -> Entries {
        // Capacity equals the slot count, so push cannot fail.
        self.slots.iter().flatten().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots = [None; Channel::COUNT];
    }
}
