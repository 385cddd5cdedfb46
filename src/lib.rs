//! SoulSync - compatibility prediction engine
//!
//! A local-first matchmaking pipeline that turns a dating profile into a
//! compatibility prediction: categorical encoding against a frozen mapping
//! table, z-score scaling from reference-dataset statistics, GBDT inference,
//! and heuristic post-processing (safety score, icebreakers, flags, timeline).

pub mod config;
pub mod models;
pub mod predictor;
