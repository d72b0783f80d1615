//! The appointment scheduling grid.
//!
//! Pure time/pixel geometry, per-slot availability classification,
//! conflict validation, the drag interaction state machine, the layout
//! function consumed by the rendering surface, and the commit pipeline
//! that persists a finished drag.

pub mod commit;
pub mod conflict;
pub mod drag;
pub mod geometry;
pub mod layout;
pub mod slots;

pub use commit::{AppointmentStore, AuditSink, CommitError, ScheduleBoard};
pub use conflict::RejectionReason;
pub use drag::{CandidateInterval, DragController, DragMode, DragSession, PointerEvent};
pub use layout::{AppointmentBlock, GridLayout, HourSlot, StaffColumn};
pub use slots::{BreakSpan, DayAvailability, SlotClass};
