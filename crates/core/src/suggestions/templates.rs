//! Curated design templates keyed by cloth type and occasion.
//!
//! Each template is a hand-composed ensemble: its five fields are always
//! adopted together.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::garment::normalize;
use crate::domain::suggestion::DesignFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignTemplate {
    pub neck: &'static str,
    pub sleeve: &'static str,
    pub embroidery: &'static str,
    pub color: &'static str,
    pub border: &'static str,
}

impl DesignTemplate {
    pub fn fields(&self) -> DesignFields {
        DesignFields {
            neck_design: self.neck.to_string(),
            sleeve_style: self.sleeve.to_string(),
            embroidery_pattern: self.embroidery.to_string(),
            color_combination: self.color.to_string(),
            border_style: self.border.to_string(),
        }
    }
}

type OccasionTemplates = (&'static str, &'static [DesignTemplate]);

pub const CURATED_TEMPLATES: &[(&str, &[OccasionTemplates])] = &[
    ("saree", SAREE_TEMPLATES),
    ("kurti", KURTI_TEMPLATES),
    ("lehenga", LEHENGA_TEMPLATES),
    ("shirt", SHIRT_TEMPLATES),
    ("dress", DRESS_TEMPLATES),
    ("blouse", BLOUSE_TEMPLATES),
];

const SAREE_TEMPLATES: &[OccasionTemplates] = &[
    (
        "wedding",
        &[
            DesignTemplate {
                neck: "Boat neck with heavy embellishment",
                sleeve: "No sleeves (blouse sleeves - full with zari work)",
                embroidery: "Heavy zari and stone work with beadwork",
                color: "Deep maroon with gold, royal blue with zari",
                border: "Intricate gold zari border with semi-precious stones",
            },
            DesignTemplate {
                neck: "V-neck with intricate detailing",
                sleeve: "No sleeves (blouse sleeves - 3/4 with embroidery)",
                embroidery: "Threadwork with cutwork embroidery",
                color: "Red with ivory and gold accents",
                border: "Heavy embroidered border with tassel work",
            },
        ],
    ),
    (
        "casual",
        &[DesignTemplate {
            neck: "Round neck with minimal design",
            sleeve: "No sleeves (blouse sleeves - half sleeves)",
            embroidery: "Light block print or simple floral",
            color: "Pastel shades - light blue, peach, cream",
            border: "Simple printed border",
        }],
    ),
    (
        "festival",
        &[DesignTemplate {
            neck: "V-neck with block print",
            sleeve: "No sleeves (blouse sleeves - full sleeves with mirror work)",
            embroidery: "Geometric block print with mirror work",
            color: "Vibrant orange with purple, or pink with green",
            border: "Printed border with mirror accents",
        }],
    ),
    (
        "party",
        &[DesignTemplate {
            neck: "Sweetheart neck with embroidery",
            sleeve: "No sleeves (blouse sleeves - puffed sleeves)",
            embroidery: "Medium embroidery with sequin work",
            color: "Black with gold, deep burgundy with silver",
            border: "Sequined border with lace",
        }],
    ),
    (
        "office",
        &[DesignTemplate {
            neck: "Round neck with professional cut",
            sleeve: "No sleeves (blouse sleeves - 3/4 sleeves)",
            embroidery: "Minimal print",
            color: "Neutral tones - white, navy, gray, beige",
            border: "Simple solid border",
        }],
    ),
];

const KURTI_TEMPLATES: &[OccasionTemplates] = &[
    (
        "wedding",
        &[DesignTemplate {
            neck: "Keyhole neck with stone work",
            sleeve: "Full sleeves with heavy embroidery and stone work",
            embroidery: "Heavy embroidery all over with stone and bead work",
            color: "Deep maroon with gold, royal blue with silver",
            border: "Heavy embroidered hemline",
        }],
    ),
    (
        "casual",
        &[DesignTemplate {
            neck: "Round neck simple",
            sleeve: "Half sleeves",
            embroidery: "Light block print or no print",
            color: "Pastel shades - sky blue, peach, mint green",
            border: "Simple contrast border",
        }],
    ),
    (
        "festival",
        &[DesignTemplate {
            neck: "High neck with block print",
            sleeve: "Full sleeves with mirror work",
            embroidery: "Mixed embroidery and block print with mirrors",
            color: "Vibrant - orange, pink, purple combinations",
            border: "Patterned border with mirror embellishments",
        }],
    ),
    (
        "party",
        &[DesignTemplate {
            neck: "Plunge neck with embroidery",
            sleeve: "Puffed sleeves with embroidery",
            embroidery: "Medium embroidery with sequin details",
            color: "Black with gold, emerald with silver",
            border: "Sequined hemline",
        }],
    ),
    (
        "office",
        &[DesignTemplate {
            neck: "Collar neck formal",
            sleeve: "Full sleeves",
            embroidery: "Minimal or no embroidery",
            color: "Professional tones - white, navy, gray, black",
            border: "Subtle solid border",
        }],
    ),
];

const LEHENGA_TEMPLATES: &[OccasionTemplates] = &[
    (
        "wedding",
        &[DesignTemplate {
            neck: "Sweetheart neck with zari work",
            sleeve: "Full sleeves or cap sleeves with heavy embroidery",
            embroidery: "Heavy zari work with beads and stones",
            color: "Maroon with gold, royal blue with silver",
            border: "Heavily embroidered border on lehenga and dupatta",
        }],
    ),
    (
        "casual",
        &[DesignTemplate {
            neck: "Round neck",
            sleeve: "Half sleeves or sleeveless",
            embroidery: "Light print or minimal embroidery",
            color: "Pastel or earthy shades",
            border: "Simple printed or contrast border",
        }],
    ),
    (
        "festival",
        &[DesignTemplate {
            neck: "V-neck with ethnic detailing",
            sleeve: "Full sleeves with ethnic embroidery",
            embroidery: "Intricate ethnic motifs with beads",
            color: "Vibrant colors - orange, pink, purple",
            border: "Ornamental border with traditional patterns",
        }],
    ),
    (
        "party",
        &[DesignTemplate {
            neck: "Halter neck with embroidery",
            sleeve: "Sleeveless with embellished armhole",
            embroidery: "Medium embroidery with sequins",
            color: "Black with gold, emerald, deep burgundy",
            border: "Sequined border",
        }],
    ),
    (
        "office",
        &[DesignTemplate {
            neck: "Crew neck",
            sleeve: "Full sleeves",
            embroidery: "Minimal print",
            color: "Neutral professional tones",
            border: "Simple solid border",
        }],
    ),
];

const SHIRT_TEMPLATES: &[OccasionTemplates] = &[
    (
        "wedding",
        &[DesignTemplate {
            neck: "Mandarin collar with embroidery",
            sleeve: "Full sleeves with embroidery",
            embroidery: "Embroidered pattern on front and sleeves",
            color: "Maroon, navy with gold accents",
            border: "Embroidered border on sleeves and hem",
        }],
    ),
    (
        "casual",
        &[DesignTemplate {
            neck: "Regular collar",
            sleeve: "Half sleeves",
            embroidery: "Light print or solid color",
            color: "Light shades - white, light blue, pastel",
            border: "Simple contrast border",
        }],
    ),
    (
        "festival",
        &[DesignTemplate {
            neck: "Spread collar with print",
            sleeve: "3/4 sleeves",
            embroidery: "Ethnic print or embroidery",
            color: "Vibrant colors with contrasts",
            border: "Printed border",
        }],
    ),
    (
        "party",
        &[DesignTemplate {
            neck: "Cuban collar",
            sleeve: "Full sleeves",
            embroidery: "Medium embroidery or print",
            color: "Dark shades with metallic accents",
            border: "Embellished border",
        }],
    ),
    (
        "office",
        &[DesignTemplate {
            neck: "Oxford collar",
            sleeve: "Full sleeves",
            embroidery: "No embroidery",
            color: "Professional colors - white, light blue, neutral",
            border: "Simple collar band",
        }],
    ),
];

const DRESS_TEMPLATES: &[OccasionTemplates] = &[
    (
        "wedding",
        &[DesignTemplate {
            neck: "V-neck or sweetheart with embellishment",
            sleeve: "Full sleeves or sleeveless",
            embroidery: "Heavy embroidery with beads and stones",
            color: "Bridal colors - ivory, gold, light pink",
            border: "Ornamental border",
        }],
    ),
    (
        "casual",
        &[DesignTemplate {
            neck: "Round neck",
            sleeve: "Half or 3/4 sleeves",
            embroidery: "No embroidery or minimal print",
            color: "Pastels or neutral tones",
            border: "Simple hem",
        }],
    ),
    (
        "festival",
        &[DesignTemplate {
            neck: "V-neck with print",
            sleeve: "3/4 or full sleeves",
            embroidery: "Ethnic print or embroidery",
            color: "Vibrant festive colors",
            border: "Patterned border",
        }],
    ),
    (
        "party",
        &[DesignTemplate {
            neck: "Deep V-neck or strapless",
            sleeve: "Sleeveless or thin straps",
            embroidery: "Sequins and beads",
            color: "Dark or metallic shades",
            border: "Embellished hemline",
        }],
    ),
];

const BLOUSE_TEMPLATES: &[OccasionTemplates] = &[
    (
        "wedding",
        &[DesignTemplate {
            neck: "High neck with embroidery",
            sleeve: "Full sleeves with embroidery",
            embroidery: "Heavy embroidery work",
            color: "Rich colors - maroon, burgundy, deep colors",
            border: "Embroidered border",
        }],
    ),
    (
        "casual",
        &[DesignTemplate {
            neck: "Round neck",
            sleeve: "Half or 3/4 sleeves",
            embroidery: "Minimal or no embroidery",
            color: "Light neutral colors",
            border: "Simple border",
        }],
    ),
];

/// All curated templates for a pair, in table order. Empty when the pair
/// has no curated entry.
pub fn templates_for(cloth_type: &str, occasion: &str) -> &'static [DesignTemplate] {
    let cloth_type = normalize(cloth_type);
    let occasion = normalize(occasion);

    CURATED_TEMPLATES
        .iter()
        .find(|(cloth, _)| *cloth == cloth_type)
        .and_then(|(_, occasions)| occasions.iter().find(|(name, _)| *name == occasion))
        .map(|(_, templates)| *templates)
        .unwrap_or(&[])
}

/// Pick one curated template uniformly at random, or `None` when the pair
/// has no curated entry and the fallback rules must be used.
pub fn resolve_template<R: Rng + ?Sized>(
    cloth_type: &str,
    occasion: &str,
    rng: &mut R,
) -> Option<&'static DesignTemplate> {
    templates_for(cloth_type, occasion).choose(rng)
}
