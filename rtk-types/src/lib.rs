//! # RTK Types
//!
//! Fundamental type definitions shared across the RTK trackball firmware:
//!
//! - [`mouse_button`] - Logical mouse button ids and button chord masks

#![cfg_attr(not(test), no_std)]

pub mod mouse_button;
