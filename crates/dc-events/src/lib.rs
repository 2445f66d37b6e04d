//! dc-events - OpenLineage event layer for dbt-correlator
//!
//! This crate owns the OpenLineage wire types, the builders that turn parsed
//! dbt artifacts into run events, and the batch emitter that delivers them to
//! a correlator backend over HTTP.

pub mod builder;
pub mod emitter;
pub mod event;

pub use builder::{lineage_events, map_test_status, quality_events, wrapping_event};
pub use emitter::{emit_events, EmitError};
pub use event::{
    Assertion, DataQualityAssertionsFacet, InputDataset, InputFacets, JobRef, OutputDataset,
    OutputFacets, OutputStatisticsFacet, RunEvent, RunEventType, RunRef, PRODUCER, SCHEMA_URL,
};
