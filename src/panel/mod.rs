//! Reference variant panels.
//!
//! A panel is the set of canonical keys of a published variant collection
//! (EVS, 1000 Genomes, ...). Panels are built once from their source VCFs or
//! key lists with [`builder::PanelBuilder`] and stored as versioned snapshots
//! ([`store::ReferenceVariantSet`]) that load in a single read.

pub mod builder;
pub mod store;
