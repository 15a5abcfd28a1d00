//! podrow-core: the account picker pod row.
//!
//! [`PodRow`] owns one [`Pod`] per account or kiosk app, lays them out on a
//! grid, runs the focus and activation state machine and dispatches keyboard
//! and pointer events. Everything it wants from the outside world goes out
//! through a [`HostSink`](podrow_types::HostSink) as fire-and-forget
//! commands.

pub mod pod;
pub mod row;

pub use pod::{
    ActionBoxView, ActionMenu, DesktopPod, KioskAppPod, Pod, PodKind, PodRecord, PodView,
    PublicSessionPod, RowRequest, UserPod, UserTypeIcon,
};
pub use row::{DiagnosticPrompt, IconSnapshot, PodRow, PodSnapshot, RowSnapshot, VisibleArea};
