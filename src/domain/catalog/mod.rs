//! Catalog domain: locally stored product records with remote provenance.

mod product;

pub use product::{ProductRecord, ProductVariant, SyncSource};
