//! Per-field fallback rules used when no curated template matches.
//!
//! Every rule is resolved independently of the others, so a fallback
//! combination is not guaranteed to be stylistically consistent.

use crate::domain::garment::normalize;

pub const DEFAULT_NECK: &str = "Round neck";
pub const DEFAULT_SLEEVE: &str = "Standard sleeves";
pub const DEFAULT_EMBROIDERY: &str = "Floral embroidery";
pub const DEFAULT_COLOR: &str = "Multi-color";
pub const DEFAULT_BORDER: &str = "Embroidered border";

type OccasionTable = &'static [(&'static str, &'static str)];

const NECK_RULES: &[(&str, OccasionTable)] = &[
    (
        "saree",
        &[
            ("wedding", "Boat neck with heavy embellishment"),
            ("casual", "Round neck with minimal design"),
            ("festival", "V-neck with intricate detailing"),
            ("party", "Sweetheart neck with embroidery"),
            ("office", "Round neck with professional cut"),
        ],
    ),
    (
        "kurti",
        &[
            ("wedding", "Keyhole neck with stone work"),
            ("casual", "Round neck simple"),
            ("festival", "High neck with block print"),
            ("party", "Plunge neck with embroidery"),
            ("office", "Collar neck formal"),
        ],
    ),
    (
        "lehenga",
        &[
            ("wedding", "Sweetheart neck with zari work"),
            ("casual", "Round neck"),
            ("festival", "High neck with mirror work"),
            ("party", "Halter neck with embroidery"),
            ("office", "Crew neck"),
        ],
    ),
    (
        "shirt",
        &[
            ("wedding", "Mandarin collar"),
            ("casual", "Regular collar"),
            ("festival", "Spread collar"),
            ("party", "Cuban collar"),
            ("office", "Oxford collar"),
        ],
    ),
];

/// A sleeve rule either ignores the occasion or varies by it.
#[derive(Debug, Clone, Copy)]
enum SleeveRule {
    Fixed(&'static str),
    ByOccasion(OccasionTable),
}

const SLEEVE_RULES: &[(&str, SleeveRule)] = &[
    ("saree", SleeveRule::Fixed("No sleeves (blouse sleeves recommended)")),
    (
        "kurti",
        SleeveRule::ByOccasion(&[
            ("wedding", "3/4 length with embroidery"),
            ("casual", "Half sleeves"),
            ("festival", "Full sleeves with mirror work"),
            ("party", "Puffed sleeves"),
            ("office", "3/4 sleeves"),
        ]),
    ),
    ("lehenga", SleeveRule::Fixed("Sleeveless or short sleeves")),
    (
        "shirt",
        SleeveRule::ByOccasion(&[
            ("wedding", "Full sleeves"),
            ("casual", "Half sleeves"),
            ("festival", "3/4 sleeves"),
            ("party", "Full sleeves"),
            ("office", "Full sleeves"),
        ]),
    ),
];

const EMBROIDERY_RULES: &[(&str, OccasionTable)] = &[
    (
        "1000-3000",
        &[
            ("wedding", "Simple block printing"),
            ("casual", "Light block print"),
            ("festival", "Simple geometric print"),
            ("party", "Basic embroidery on border"),
            ("office", "Minimal print"),
        ],
    ),
    (
        "3000-8000",
        &[
            ("wedding", "Medium embroidery with mirror work"),
            ("casual", "Floral embroidery"),
            ("festival", "Mixed embroidery and block print"),
            ("party", "Medium embroidery all over"),
            ("office", "Subtle embroidery"),
        ],
    ),
    (
        "10000+",
        &[
            ("wedding", "Heavy zari and stone work"),
            ("casual", "Premium embroidery"),
            ("festival", "Intricate threadwork and beads"),
            ("party", "Full heavy embroidery"),
            ("office", "Premium subtle embroidery"),
        ],
    ),
];

const COLOR_RULES: OccasionTable = &[
    ("wedding", "Deep maroon with gold, royal blue with zari, red with ivory"),
    ("casual", "Pastel shades, earthy tones, soft blues"),
    ("festival", "Vibrant colors - orange, pink, purple, jewel tones"),
    ("party", "Black with gold, deep burgundy, emerald green"),
    ("office", "Neutral tones - white, beige, navy, gray"),
];

const BORDER_RULES: OccasionTable = &[
    ("1000-3000", "Simple printed border"),
    ("3000-8000", "Embroidered border with contrast"),
    ("10000+", "Heavy zari border, intricate lace, stone-studded"),
];

fn lookup<T: Copy>(table: &[(&'static str, T)], key: &str) -> Option<T> {
    table.iter().find(|(candidate, _)| *candidate == key).map(|(_, value)| *value)
}

/// Gender is part of the signature but does not vary the result.
pub fn suggest_neck(cloth_type: &str, occasion: &str, _gender: &str) -> &'static str {
    lookup(NECK_RULES, &normalize(cloth_type))
        .and_then(|occasions| lookup(occasions, &normalize(occasion)))
        .unwrap_or(DEFAULT_NECK)
}

pub fn suggest_sleeve(cloth_type: &str, occasion: &str) -> &'static str {
    match lookup(SLEEVE_RULES, &normalize(cloth_type)) {
        Some(SleeveRule::Fixed(sleeve)) => sleeve,
        Some(SleeveRule::ByOccasion(occasions)) => {
            lookup(occasions, &normalize(occasion)).unwrap_or(DEFAULT_SLEEVE)
        }
        None => DEFAULT_SLEEVE,
    }
}

/// The budget band must match literally; it is not parsed as a range.
pub fn suggest_embroidery(occasion: &str, budget_range: &str) -> &'static str {
    lookup(EMBROIDERY_RULES, &normalize(budget_range))
        .and_then(|occasions| lookup(occasions, &normalize(occasion)))
        .unwrap_or(DEFAULT_EMBROIDERY)
}

/// Age group is part of the signature but does not vary the result.
pub fn suggest_color(occasion: &str, _age_group: &str) -> &'static str {
    lookup(COLOR_RULES, &normalize(occasion)).unwrap_or(DEFAULT_COLOR)
}

/// Cloth type is part of the signature but does not vary the result.
pub fn suggest_border(_cloth_type: &str, budget_range: &str) -> &'static str {
    lookup(BORDER_RULES, &normalize(budget_range)).unwrap_or(DEFAULT_BORDER)
}
