//! Core functionality for the gateway
//!
//! This module contains the core business logic and data structures.

pub mod gateway;
