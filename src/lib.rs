//! Stackgate - Entitlement-Gated Pro Content Delivery
//!
//! This crate implements the pro-content pipeline behind a component catalog:
//! a payment webhook that grants and revokes entitlements, and a gateway that
//! serves private source bundles to entitled identities.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
