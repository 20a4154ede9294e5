//! Frame and fixed-step dispatch
//!
//! This module provides:
//! - **TickRegistry**: ordered handler list with deferred registration and
//!   removal-safe dispatch
//! - **TickHandle**: owned registration that deregisters on drop
//! - **TickContext**: the pair of registries a host drives (frame + fixed)

mod context;
mod registry;


pub use context::TickContext;
pub use registry::{HandlerId, TickHandle, TickHandler, TickRegistry};

pub use hourglass_types::TickCadence as TickKind;
