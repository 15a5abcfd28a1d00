//! Foundation types for the pod row.
//!
//! This crate contains the platform-agnostic types shared by every pod row
//! crate: input events, configuration, account records, the outbound host
//! command channel, the localization seam, and error types.

pub mod config;
pub mod error;
pub mod host;
pub mod input;
pub mod records;
pub mod strings;

pub use config::{DisplayType, LayoutConfig, PodRowConfig, TimingConfig};
pub use error::{PodRowError, Result};
pub use host::{HostCommand, HostSink};
pub use input::{EventTarget, Key, KeyEvent, Modifiers, PodElement};
pub use records::{
    AppRecord, AuthType, CustomIconSpec, IconId, KeyboardLayoutEntry, LocaleEntry,
    MultiProfilesPolicy, TooltipSpec, UserRecord,
};
pub use strings::{KeyEcho, Localizer, StringTable};
