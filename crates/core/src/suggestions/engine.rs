//! Suggestion Engine implementation

use rand::Rng;
use tracing::{debug, warn};

use super::description::synthesize_description;
use super::rules::{suggest_border, suggest_color, suggest_embroidery, suggest_neck, suggest_sleeve};
use super::templates::resolve_template;
use super::{
    SuggestionResult, GENERIC_BORDER, GENERIC_COLOR, GENERIC_EMBROIDERY, GENERIC_NECK,
    GENERIC_SLEEVE,
};
use crate::domain::garment::GarmentAttributes;
use crate::domain::suggestion::{
    ConfidenceScore, DesignFields, SuggestionRecord, SuggestionSource,
};

/// Placeholder used in the generic description for an absent attribute.
const UNKNOWN_ATTRIBUTE: &str = "unknown";

/// Stateless engine; every lookup table is static data, so one instance
/// can serve any number of concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionEngine;

impl SuggestionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Generate a suggestion using the thread-local RNG for template picks.
    /// Never fails: uninterpretable input yields the generic record.
    pub fn generate(&self, attributes: &GarmentAttributes) -> SuggestionRecord {
        self.generate_with_rng(attributes, &mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        attributes: &GarmentAttributes,
        rng: &mut R,
    ) -> SuggestionRecord {
        match self.try_generate(attributes, rng) {
            Ok(record) => record,
            Err(error) => {
                warn!(
                    event_name = "suggestions.engine.generic_fallback",
                    cloth_type = attributes.cloth_type.as_deref().unwrap_or(UNKNOWN_ATTRIBUTE),
                    occasion = attributes.occasion.as_deref().unwrap_or(UNKNOWN_ATTRIBUTE),
                    error = %error,
                    "suggestion generation failed; returning generic suggestion"
                );
                generic_suggestion(attributes)
            }
        }
    }

    /// The fallible core of generation. Callers outside this module should
    /// prefer [`SuggestionEngine::generate`].
    pub fn try_generate<R: Rng + ?Sized>(
        &self,
        attributes: &GarmentAttributes,
        rng: &mut R,
    ) -> SuggestionResult<SuggestionRecord> {
        let profile = attributes.validate()?;
        let cloth_type = profile.cloth_type.as_str();
        let occasion = profile.occasion.as_str();
        let budget_range = profile.budget_range.as_str();

        let (fields, source) = match resolve_template(cloth_type, occasion, rng) {
            Some(template) => (template.fields(), SuggestionSource::CuratedTemplate),
            None => (
                DesignFields {
                    neck_design: suggest_neck(cloth_type, occasion, profile.gender.as_str())
                        .to_string(),
                    sleeve_style: suggest_sleeve(cloth_type, occasion).to_string(),
                    embroidery_pattern: suggest_embroidery(occasion, budget_range).to_string(),
                    color_combination: suggest_color(occasion, profile.age_group.as_str())
                        .to_string(),
                    border_style: suggest_border(cloth_type, budget_range).to_string(),
                },
                SuggestionSource::FallbackRules,
            ),
        };
        fields.ensure_complete()?;

        debug!(
            event_name = "suggestions.engine.resolved",
            cloth_type,
            occasion,
            budget_range,
            source = ?source,
            "design suggestion resolved"
        );

        let description = synthesize_description(
            attributes.cloth_type.as_deref().unwrap_or(cloth_type),
            attributes.occasion.as_deref().unwrap_or(occasion),
            &fields,
        );

        Ok(SuggestionRecord {
            fields,
            description,
            confidence_score: ConfidenceScore::High,
            source,
        })
    }
}

/// Generate a suggestion with a default engine.
pub fn generate_suggestions(attributes: &GarmentAttributes) -> SuggestionRecord {
    SuggestionEngine::new().generate(attributes)
}

/// The fixed "Medium" record used when generation cannot proceed.
pub fn generic_suggestion(attributes: &GarmentAttributes) -> SuggestionRecord {
    let cloth_type = attributes.cloth_type.as_deref().unwrap_or(UNKNOWN_ATTRIBUTE);
    let occasion = attributes.occasion.as_deref().unwrap_or(UNKNOWN_ATTRIBUTE);

    SuggestionRecord {
        fields: DesignFields {
            neck_design: GENERIC_NECK.to_string(),
            sleeve_style: GENERIC_SLEEVE.to_string(),
            embroidery_pattern: GENERIC_EMBROIDERY.to_string(),
            color_combination: GENERIC_COLOR.to_string(),
            border_style: GENERIC_BORDER.to_string(),
        },
        description: format!("Design suggestion for {cloth_type} for {occasion} wear."),
        confidence_score: ConfidenceScore::Medium,
        source: SuggestionSource::Generic,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::errors::DomainError;

    fn attributes(cloth: &str, occasion: &str, budget: &str) -> GarmentAttributes {
        GarmentAttributes::from_raw(cloth, occasion, "female", "adult", budget)
    }

    #[test]
    fn curated_pair_resolves_through_template() {
        let mut rng = StdRng::seed_from_u64(1);
        let record = SuggestionEngine::new()
            .generate_with_rng(&attributes("kurti", "party", "1000-3000"), &mut rng);

        assert_eq!(record.source, SuggestionSource::CuratedTemplate);
        assert_eq!(record.confidence_score, ConfidenceScore::High);
        assert_eq!(record.fields.neck_design, "Plunge neck with embroidery");
        assert_eq!(record.fields.border_style, "Sequined hemline");
    }

    #[test]
    fn uncovered_pair_resolves_through_rules() {
        let mut rng = StdRng::seed_from_u64(2);
        let record = SuggestionEngine::new()
            .generate_with_rng(&attributes("dress", "office", "10000+"), &mut rng);

        assert_eq!(record.source, SuggestionSource::FallbackRules);
        assert_eq!(record.confidence_score, ConfidenceScore::High);
        assert_eq!(record.fields.neck_design, "Round neck");
        assert_eq!(record.fields.sleeve_style, "Standard sleeves");
        assert_eq!(record.fields.embroidery_pattern, "Premium subtle embroidery");
        assert_eq!(record.fields.color_combination, "Neutral tones - white, beige, navy, gray");
        assert_eq!(
            record.fields.border_style,
            "Heavy zari border, intricate lace, stone-studded"
        );
    }

    #[test]
    fn try_generate_surfaces_the_validation_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let error = SuggestionEngine::new()
            .try_generate(&attributes("tuxedo", "party", "3000-8000"), &mut rng)
            .expect_err("tuxedo is not a cloth type");

        assert!(matches!(error, DomainError::InvalidAttribute { field: "cloth_type", .. }));
    }

    #[test]
    fn missing_occasion_yields_generic_record_with_placeholder() {
        let input = GarmentAttributes { occasion: None, ..attributes("saree", "", "3000-8000") };
        let record = generate_suggestions(&input);

        assert_eq!(record.confidence_score, ConfidenceScore::Medium);
        assert_eq!(record.source, SuggestionSource::Generic);
        assert_eq!(record.description, "Design suggestion for saree for unknown wear.");
    }

    #[test]
    fn enum_and_raw_input_normalize_identically() {
        let raw = attributes("  KURTI ", "Office", "3000-8000");
        let canonical = attributes("kurti", "office", "3000-8000");

        let from_raw = SuggestionEngine::new().generate(&raw);
        let from_canonical = SuggestionEngine::new().generate(&canonical);

        assert_eq!(from_raw.fields, from_canonical.fields);
        assert!(from_raw.description.contains("  KURTI "));
        assert!(from_raw.description.contains("Office wear"));
    }
}
