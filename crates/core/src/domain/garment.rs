use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Trim and lowercase an attribute value for canonical lookups.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

macro_rules! garment_attribute {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let normalized = normalize(value);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == normalized)
                    .ok_or_else(|| DomainError::InvalidAttribute {
                        field: $field,
                        value: value.to_string(),
                    })
            }
        }
    };
}

garment_attribute! {
    /// Garment category of the uploaded photo.
    ClothType, "cloth_type" {
        Saree => "saree",
        Kurti => "kurti",
        Lehenga => "lehenga",
        Shirt => "shirt",
        Dress => "dress",
        Blouse => "blouse",
        Dupatta => "dupatta",
        Shawl => "shawl",
    }
}

garment_attribute! {
    Occasion, "occasion" {
        Wedding => "wedding",
        Casual => "casual",
        Festival => "festival",
        Party => "party",
        Office => "office",
    }
}

garment_attribute! {
    Gender, "gender" {
        Male => "male",
        Female => "female",
        Unisex => "unisex",
    }
}

garment_attribute! {
    AgeGroup, "age_group" {
        Child => "child",
        Adult => "adult",
        Senior => "senior",
    }
}

garment_attribute! {
    /// Price band. The band string is the canonical value and is used
    /// verbatim as a lookup key; it is never parsed as a number.
    BudgetRange, "budget_range" {
        Low => "1000-3000",
        Medium => "3000-8000",
        High => "10000+",
    }
}

/// Attributes as they arrive at the engine boundary: possibly raw strings,
/// possibly missing, not yet validated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentAttributes {
    pub cloth_type: Option<String>,
    pub occasion: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub budget_range: Option<String>,
}

impl GarmentAttributes {
    pub fn from_raw(
        cloth_type: impl Into<String>,
        occasion: impl Into<String>,
        gender: impl Into<String>,
        age_group: impl Into<String>,
        budget_range: impl Into<String>,
    ) -> Self {
        Self {
            cloth_type: Some(cloth_type.into()),
            occasion: Some(occasion.into()),
            gender: Some(gender.into()),
            age_group: Some(age_group.into()),
            budget_range: Some(budget_range.into()),
        }
    }

    /// Validate every value against its enumeration. A missing budget band
    /// falls back to the medium band; every other attribute is required.
    pub fn validate(&self) -> Result<GarmentProfile, DomainError> {
        Ok(GarmentProfile {
            cloth_type: required(&self.cloth_type, "cloth_type")?.parse()?,
            occasion: required(&self.occasion, "occasion")?.parse()?,
            gender: required(&self.gender, "gender")?.parse()?,
            age_group: required(&self.age_group, "age_group")?.parse()?,
            budget_range: match self.budget_range.as_deref() {
                Some(value) if !value.trim().is_empty() => value.parse()?,
                _ => BudgetRange::Medium,
            },
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, DomainError> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or(DomainError::MissingAttribute(field))
}

/// Validated, canonical garment attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GarmentProfile {
    pub cloth_type: ClothType,
    pub occasion: Occasion,
    pub gender: Gender,
    pub age_group: AgeGroup,
    pub budget_range: BudgetRange,
}

impl From<GarmentProfile> for GarmentAttributes {
    fn from(profile: GarmentProfile) -> Self {
        Self::from_raw(
            profile.cloth_type.as_str(),
            profile.occasion.as_str(),
            profile.gender.as_str(),
            profile.age_group.as_str(),
            profile.budget_range.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{BudgetRange, ClothType, GarmentAttributes, Occasion};
    use crate::errors::DomainError;

    #[test]
    fn parsing_trims_and_ignores_case() {
        assert_eq!(" Saree ".parse::<ClothType>(), Ok(ClothType::Saree));
        assert_eq!("FESTIVAL".parse::<Occasion>(), Ok(Occasion::Festival));
        assert_eq!("10000+".parse::<BudgetRange>(), Ok(BudgetRange::High));
    }

    #[test]
    fn unknown_value_reports_field_and_raw_value() {
        let error = "tuxedo".parse::<ClothType>().expect_err("tuxedo is not a cloth type");
        assert_eq!(
            error,
            DomainError::InvalidAttribute { field: "cloth_type", value: "tuxedo".to_string() }
        );
    }

    #[test]
    fn budget_band_is_matched_literally() {
        assert!("5000".parse::<BudgetRange>().is_err());
        assert!("1000 - 3000".parse::<BudgetRange>().is_err());
    }

    #[test]
    fn missing_budget_defaults_to_medium_band() {
        let attributes = GarmentAttributes {
            budget_range: None,
            ..GarmentAttributes::from_raw("kurti", "office", "female", "adult", "")
        };

        let profile = attributes.validate().expect("valid attributes");
        assert_eq!(profile.budget_range, BudgetRange::Medium);
    }

    #[test]
    fn missing_cloth_type_is_rejected() {
        let attributes = GarmentAttributes {
            cloth_type: None,
            ..GarmentAttributes::from_raw("", "office", "female", "adult", "3000-8000")
        };

        assert_eq!(attributes.validate(), Err(DomainError::MissingAttribute("cloth_type")));
    }

    #[test]
    fn serde_uses_canonical_strings() {
        let json = serde_json::to_string(&BudgetRange::High).expect("serialize");
        assert_eq!(json, "\"10000+\"");
        let parsed: ClothType = serde_json::from_str("\"lehenga\"").expect("deserialize");
        assert_eq!(parsed, ClothType::Lehenga);
    }
}
