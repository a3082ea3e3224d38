//! Decoded session type.

use serde::{Deserialize, Serialize};

use super::Channel;

/// A fully decoded IMP archive.
///
/// Built once by the session assembler and never mutated afterwards. The
/// session owns its channels and lap times; writers either borrow them through
/// the accessors or take them with [`Session::into_parts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    driver: String,
    track: String,
    laps: Vec<u64>,
    channels: Vec<Channel>,
}

/// Owned contents of a [`Session`], for writers that consume it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParts {
    pub driver: String,
    pub track: String,
    pub laps: Vec<u64>,
    pub channels: Vec<Channel>,
}

impl Session {
    pub(crate) fn new(
        driver: String,
        track: String,
        laps: Vec<u64>,
        channels: Vec<Channel>,
    ) -> Self {
        Self { driver, track, laps, channels }
    }

    /// Driver name, empty when the exporter left it blank.
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Track name, empty when the exporter left it blank.
    pub fn track(&self) -> &str {
        &self.track
    }

    /// Lap durations in milliseconds, in file order.
    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    /// Channels in header order; `channels()[i].id() == i`.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Cumulative lap boundaries in milliseconds from session start.
    ///
    /// ```rust
    /// # use piexport::Session;
    /// # fn check(session: &Session) {
    /// // laps of 83_450 and 82_100 ms give markers at 83_450 and 165_550
    /// let markers = session.lap_markers();
    /// assert_eq!(markers.len(), session.laps().len());
    /// # }
    /// ```
    pub fn lap_markers(&self) -> Vec<u64> {
        self.laps
            .iter()
            .scan(0u64, |elapsed, lap| {
                *elapsed = elapsed.saturating_add(*lap);
                Some(*elapsed)
            })
            .collect()
    }

    /// Sum of all lap durations in milliseconds.
    pub fn total_lap_time(&self) -> u64 {
        self.laps.iter().fold(0u64, |total, lap| total.saturating_add(*lap))
    }

    /// Find a channel by its decoded name.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.name() == name)
    }

    /// Find a channel by its header position.
    pub fn channel_by_id(&self, id: usize) -> Option<&Channel> {
        self.channels.get(id).filter(|channel| channel.id() == id)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    pub fn into_parts(self) -> SessionParts {
        SessionParts {
            driver: self.driver,
            track: self.track,
            laps: self.laps,
            channels: self.channels,
        }
    }
}
