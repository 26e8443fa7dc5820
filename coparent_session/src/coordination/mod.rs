//! Glue between the session manager and the host app: where to land on
//! launch, what to do on foreground, and entitlement-checked role selection.

mod launch;
mod role;

pub use launch::{
    AppState, LaunchDecision, LaunchRoute, handle_app_state_change, resolve_launch_route,
};
pub use role::select_role;
