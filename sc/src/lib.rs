//! SchedCore - travel schedule normalization and calendar layout
//!
//! Pure, I/O-free core of the TravelGPT planner. Two cooperating pieces:
//!
//! - **Schedule normalizer** ([`parse_schedule`]): validates the planner's
//!   raw JSON output into a canonical `Vec<Activity>` with real UTC
//!   timestamps and a closed activity-type enumeration.
//! - **Calendar layout engine** ([`CalendarLayout`]): computes every
//!   placement decision once - covering day range, stacked Stay header
//!   rows (overlap depth), hourly merge spans, and per-type colors - so
//!   the interactive renderer and the Excel export
//!   ([`ExcelExporter`]) paint structurally identical output.
//!
//! Both are pure synchronous computations over immutable input; they can
//! be invoked concurrently for independent plans without coordination.
//!
//! # Example
//!
//! ```ignore
//! use schedcore::{parse_schedule, CalendarLayout, ExcelExporter};
//!
//! let plan = parse_schedule(llm_output)?;
//! let layout = CalendarLayout::compute(&plan);
//! let xlsx = ExcelExporter::to_buffer(&plan)?;
//! ```

pub mod activity;
pub mod color;
pub mod export;
pub mod layout;
pub mod listing;
pub mod parser;
pub mod range;
pub mod sample;

pub use activity::{Activity, ActivityType};
pub use export::{EXPORT_FILENAME, EXPORT_MIME, ExcelExporter, ExportError};
pub use layout::{CalendarLayout, Cell, HOURS_PER_DAY, StayPlacement};
pub use parser::{FormatError, parse_schedule, serialize_schedule};
pub use range::DayRange;
pub use sample::sample_schedule;
