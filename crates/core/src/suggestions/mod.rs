//! Design Suggestion Engine
//!
//! Maps garment attributes to a design recommendation: a curated template
//! when one exists for the (cloth type, occasion) pair, independent
//! per-field rules otherwise, and a generic record when the attributes
//! cannot be interpreted at all.

mod description;
mod engine;
mod rules;
mod templates;

pub use description::{fabric_for, synthesize_description, DEFAULT_FABRIC};
pub use engine::{generate_suggestions, generic_suggestion, SuggestionEngine};
pub use rules::{
    suggest_border, suggest_color, suggest_embroidery, suggest_neck, suggest_sleeve,
    DEFAULT_BORDER, DEFAULT_COLOR, DEFAULT_EMBROIDERY, DEFAULT_NECK, DEFAULT_SLEEVE,
};
pub use templates::{resolve_template, templates_for, DesignTemplate, CURATED_TEMPLATES};

use crate::errors::DomainError;

/// Result type for suggestion operations
pub type SuggestionResult<T> = Result<T, DomainError>;

/// Fields of the generic record returned when generation fails.
pub const GENERIC_NECK: &str = "Round neck";
pub const GENERIC_SLEEVE: &str = "Standard sleeves";
pub const GENERIC_EMBROIDERY: &str = "Basic embroidery";
pub const GENERIC_COLOR: &str = "Multi-color";
pub const GENERIC_BORDER: &str = "Simple border";
