//! Physical input sources feeding the router.

pub mod gamepad;
