//!
//! The core of the configurator: turns the static pipeline graph plus a
//! sequence of interactive user choices into a concrete, validated
//! sub-pipeline.
//!
//! A resolution runs in 4 steps:
//! 1. Copy the graph and restrict it to the nodes reachable from the
//!    start module (depth-first preorder).
//! 2. Queue the modules in scope, following the global order.
//! 3. Ask the user to pick a package for each queued module; a skip
//!    decision removes the module and all its descendants from both the
//!    working graph and the queue.
//! 4. Finalize the surviving choices, the pruned graph and the write
//!    order.
//!
//! Everything that touches the terminal goes through the [`Ask`]
//! capability, so the whole loop can be driven by scripted responses.

/// Directed graph over module ids, and its builder
mod graph;
pub use graph::DirectedGraph;

/// The capability used to ask the user questions
mod ask;
pub use ask::{Ask, Scripted};

/// The interactive resolution session
mod session;
pub use session::{ResolveOpts, ResolvedPipeline, Resolver, SKIP_LABEL};

/// Collection of extra typed parameters after resolution
mod params;
pub use params::{CollectedParams, ParamCollector, ParamValue, Validator, ValidatorRegistry};

pub use graph::Error as GraphError;
pub use session::Error as SessionError;
