//! Momentum — the decision core of a sales coaching assistant.
//!
//! Pure, synchronous state machines and scoring rules: onboarding
//! calibration, coaching mode and move selection, response policy
//! validation, and daily action planning. No I/O happens in the core;
//! callers own persistence and text generation.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;

pub mod signals;

pub mod calibration;
pub mod coaching;
pub mod daily;
