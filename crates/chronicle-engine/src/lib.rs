//! # Chronicle Engine
//!
//! Temporal aggregation and ranking over personal activity logs.
//!
//! Raw export rows are normalized into [`ActivityRecord`]s, then fed to one of
//! three independent passes: top-N rankings by dimension, dense period
//! buckets, or a weekday by time-of-day heatmap. The range slider types map
//! positions to dates and report selection changes to subscribers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod aggregator;
pub mod dimension;
pub mod engine;
pub mod heatmap;
pub mod normalizer;
pub mod period;
pub mod range;
pub mod ranking;
pub mod record;
pub mod slider;

pub use aggregator::*;
pub use dimension::*;
pub use engine::*;
pub use heatmap::*;
pub use normalizer::*;
pub use period::*;
pub use range::*;
pub use ranking::*;
pub use record::*;
pub use slider::*;
