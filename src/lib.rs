//! Circuitar is the engine behind a marker-driven augmented-reality circuit lab.
//!
//! A camera frame yields fiducial marker ids. Each marker selects an experiment: a simple DC
//! series circuit plus an ordered list of assembly steps. The engine solves the circuit,
//! walks the steps on user request and projects the result into a backend-agnostic
//! [`RenderPlan`] that a host draws over the live frame.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `MarkerId -> ExperimentId -> ExperimentDefinition` through an
//!    [`ExperimentCatalog`] and a [`DefinitionSource`] (loaded at most once per marker).
//! 2. **Solve**: `SeriesCircuit -> SolveResult` ([`solve`]), a pure function.
//! 3. **Progress**: [`ExperimentSession`] tracks the bound marker, the step cursor, revealed
//!    components and drawn connections.
//! 4. **Project**: `ExperimentSession -> RenderPlan` ([`project`]) with wires, sprites and text.
//! 5. **Composite** (optional): [`composite_plan`] rasterizes wires and sprites onto a frame.
//!
//! Experiment-level problems (unknown marker, missing or malformed file, unsolved circuit
//! kind) never fail a session; they surface as [`ExperimentOutcome::Unavailable`] or
//! [`ExperimentOutcome::Informational`] with a user-facing status line.
#![forbid(unsafe_code)]

mod assets;
mod circuit;
mod composite;
mod config;
mod experiment;
mod foundation;
mod render;
mod session;

pub use assets::decode::{PreparedImage, decode_image};
pub use assets::store::{AssetHandle, AssetResolver, NoAssets, SpriteStore};
pub use circuit::components::{Led, Resistor, VoltageSource};
pub use circuit::series::SeriesCircuit;
pub use circuit::solver::{LedReading, LedStatus, SolveResult, VoltageDrop, solve};
pub use composite::overlay::{
    CompositeStats, FrameRgba, PremulRgba8, composite_plan, draw_wire, over, overlay_centered,
};
pub use config::EngineConfig;
pub use experiment::catalog::{
    CatalogEntry, DefinitionSource, ExperimentCatalog, ExperimentError, ExperimentOutcome,
    FsDefinitionSource, MemoryDefinitionSource,
};
pub use experiment::definition::ExperimentDefinition;
pub use experiment::step::{ExperimentStep, TerminalRef};
pub use foundation::core::{Canvas, ExperimentId, MarkerId, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{CircuitarError, CircuitarResult};
pub use render::plan::{DrawOp, ProjectionStyle, RenderPlan, TextRole, project, project_with_style};
pub use session::classify::ComponentKind;
pub use session::layout::{Layout, LayoutParams, LayoutSlot, compute_layout};
pub use session::state::{
    CachedExperiment, Connection, ExperimentSession, NO_MARKER_STATUS, VisibleComponent,
};
