// SPDX-License-Identifier: MIT

//! FemiVerse: women's-health symptom checker and FemiBot chat relay

pub mod assistant;
pub mod config;
pub mod error;
pub mod report;
pub mod server;
pub mod symptom;

pub use error::{FemiverseError, ModelError};
