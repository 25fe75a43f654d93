//! Gamepad input support using GilRs
//!
//! Provides gamepad sampling with hot-plug support, analog shaping, and a
//! frame channel feeding the router. On Windows, XInput is polled directly
//! so triggers and the full button set stay reliable over Bluetooth.

pub mod buttons;
pub mod frame;
pub mod normalize;
pub mod provider;
#[cfg(windows)]
pub mod xinput;

pub use buttons::{PadButton, UnknownButton};
pub use frame::{InputFrame, PadButtons};
pub use provider::{list_gamepads, PadProvider};
