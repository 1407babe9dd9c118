//! Scope and binding resolution.
//!
//! This pass walks a parsed module and determines, for every identifier,
//! which declaration it refers to. It produces the [`Analysis`] tables later
//! passes use to assign variables to slots and decide which functions need a
//! closure environment.

mod error;
pub mod model;
mod render;
mod resolve;

pub use error::{Error, Result, Unsupported};
pub use model::{
    Analysis, Binding, BindingId, BindingKind, DeclNode, Reference, ReferenceId, ReferenceTarget,
    Scope, ScopeId, ScopeKind,
};
pub use render::RenderAnalysis;
pub use resolve::resolve_module;
