pub mod config;
pub mod domain;
pub mod errors;
pub mod identity;
pub mod media;
pub mod suggestions;

pub use domain::garment::{
    AgeGroup, BudgetRange, ClothType, GarmentAttributes, GarmentProfile, Gender, Occasion,
};
pub use domain::suggestion::{
    ConfidenceScore, DesignFields, DesignSuggestion, NewDesignSuggestion, SavedDesign,
    SavedDesignId, SuggestionId, SuggestionRecord, SuggestionSource,
};
pub use domain::upload::{NewUpload, Upload, UploadId};
pub use domain::user::{Identity, UserId, UserRole};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use identity::{IdentityError, IdentitySigner, IdentityVerifier};
pub use media::{MediaError, ValidatedImage};
pub use suggestions::{generate_suggestions, SuggestionEngine};
