//! podrow-ui: headless widgets the pod row is assembled from.
//!
//! Nothing here draws. Each widget holds the state a renderer would need and
//! the transitions between states; time is passed in explicitly.

pub mod bubble;
pub mod custom_icon;
pub mod input_field;
pub mod layout;
pub mod tab_order;
pub mod timer;

pub use bubble::{Attachment, Bubble, BubbleAnchor};
pub use custom_icon::{AutoshowState, CustomIcon, HoverState, IconAction, IconEnv};
pub use input_field::InputField;
pub use layout::{GridShape, LayoutEngine, PodPosition};
pub use tab_order::{TabOrder, TabStops};
pub use timer::{Completion, GuardedTransition, OneShot};
