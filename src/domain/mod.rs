//! Domain layer containing business entities and contracts.
//!
//! Defines entities, repository interfaces, and the click pipeline
//! independent of HTTP and storage details.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`clock`] - Injectable time source
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the short code
//! 2. A [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`click_worker::run_click_worker`] geolocates and persists it with retry
//! 4. Click rows are written via [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_worker;
pub mod clock;
pub mod entities;
pub mod repositories;
