//! Naina - Conversational Shopping Assistant Backend
//!
//! This crate implements a stage-driven shopping assistant: per-session
//! dialogue orchestration over pluggable language-model vendors, backed by
//! a product catalog kept in sync with a live Shopify store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
