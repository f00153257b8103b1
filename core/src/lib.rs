//! restock-core — deterministic restock prediction for a game's rotating
//! item shops.
//!
//! The core replicates the game engine's random-number stream bit-for-bit
//! and anchors the seed sequence to a calibration observation, so that the
//! contents of any future (or past) shop rotation can be computed offline,
//! with no network call, matching exactly what the live game will roll.
//!
//! Data flows one way:
//!   catalog + calibration (store) → StockPredictor → GameRng → results.

pub mod calibration;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod predictor;
pub mod rng;
pub mod store;
pub mod types;

pub use calibration::{CalibrationRecord, SeedReference};
pub use catalog::{ItemDefinition, StockAmount};
pub use predictor::{CatalogSource, StockPredictor};
pub use types::PredictionResult;
