// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! PlantVision: plant photo identification and health check
//!
//! A hash-bucketed mock classifier paired with a bounded local history of
//! analyses, exposed through a CLI and a local JSON API.

pub mod analysis;
pub mod app;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod random;
pub mod storage;
pub mod web;

pub use analysis::{Analysis, HealthStatus};
pub use app::PlantVision;
pub use config::AppConfig;
pub use error::{PlantVisionError, Result};
