//! GazeTrace Session Model
//!
//! Defines the core data contracts for GazeTrace sessions:
//! - **Samples:** Timestamped viewport positions with zoom level and corners
//! - **Regions:** Annotated regions of interest with canonical ordering
//! - **Clicks:** Explicit annotation-click events, possibly unresolved
//! - **Traces:** Ordered per-(user, image) sample sequences with window
//!   search and summary statistics
//!
//! All coordinates are expressed in pixels of the rescaled image the viewer
//! displayed. Samples within a trace are chronological; timestamps are
//! milliseconds, non-decreasing, and may repeat.

pub mod region;
pub mod sample;
pub mod trace;

pub use region::*;
pub use sample::*;
pub use trace::*;
