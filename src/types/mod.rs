//! Core types for decoded archive data.
//!
//! - [`Session`] is the decoded archive: identity, lap times and channels
//! - [`Channel`] is one named, unit-tagged stream of `f32` samples
//! - [`ChannelInfo`] and [`SampleBlock`] are the halves of a channel produced by
//!   the header decoder and the sample decoder respectively

mod channel;
mod session;

pub use channel::{Channel, ChannelInfo, SampleBlock};
pub use session::{Session, SessionParts};
