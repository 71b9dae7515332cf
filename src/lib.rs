//! Calendar heatmap and intraday timeline layouts for editor activity and
//! contribution history.
//!
//! Every builder is a pure function of its arguments: "today", palettes and
//! bucket widths are always passed in, never read from the environment.

pub mod aggregate;
pub mod color;
pub mod config;
pub mod date_key;
pub mod debug_log;
pub mod error;
pub mod grid;
pub mod render;
pub mod selection;
pub mod timeline;
pub mod types;
pub mod utils;

pub use color::{ActivityColorPolicy, ActivityPalettes, ContributionPalettes, Palette};
pub use error::GridError;
pub use grid::{GridSpan, build_activity_grid, build_contribution_grid};
pub use timeline::{build_timeline, build_timeline_from_records};
pub use types::{GridCell, GridLayout, TimelineCell, TimelineLayout};
