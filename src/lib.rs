//! Twinstick GW - dual-analog gamepad gateway
//!
//! Turns the two analog sticks of an ordinary gamepad into touch, mouse,
//! and key surfaces. Each stick drives an independent direction tracker
//! that captures sectors, locks onto rails between sector anchors, and
//! feeds the router, which translates tracker signals into surface events
//! for the registered output sinks.

pub mod config;
pub mod engine;
pub mod input;
pub mod paths;
pub mod router;
pub mod sinks;
pub mod sniffer;
pub mod viz;
