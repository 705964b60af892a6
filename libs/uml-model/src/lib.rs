//! UML model snapshot
//!
//! Read-only, language-agnostic representation of an object-oriented model:
//! packages, classifiers with their attributes and operations, and the
//! associations between them. Code generators borrow a [`Model`] for the
//! duration of a run and never mutate it.
//!
//! Snapshots are usually produced by a modelling tool and handed over as JSON
//! (see [`loader`]); tests build them in memory with the constructors on each
//! type.

mod error;
pub mod loader;
mod model;

pub use error::{Error, Result};
pub use model::*;
