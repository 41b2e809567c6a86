use crate::domain::garment::normalize;
use crate::domain::suggestion::DesignFields;

pub const DEFAULT_FABRIC: &str = "premium fabric";

const FABRIC_HINTS: &[(&str, &str)] = &[
    ("saree", "silk or cotton"),
    ("kurti", "cotton or silk blend"),
    ("lehenga", "silk with cotton lining"),
    ("shirt", "premium cotton"),
    ("dress", "premium fabric"),
    ("blouse", "silk or cotton blend"),
];

pub fn fabric_for(cloth_type: &str) -> &'static str {
    let cloth_type = normalize(cloth_type);
    FABRIC_HINTS
        .iter()
        .find(|(cloth, _)| *cloth == cloth_type)
        .map(|(_, fabric)| *fabric)
        .unwrap_or(DEFAULT_FABRIC)
}

/// Compose the recommendation sentence. `cloth_type` and `occasion` are
/// interpolated as given; the design fields are lowercased.
pub fn synthesize_description(cloth_type: &str, occasion: &str, fields: &DesignFields) -> String {
    format!(
        "For this {fabric} {cloth_type}, a {neck} with {embroidery}, paired with {color} color \
         combination, is recommended for {occasion} wear. The {sleeve} complement the look \
         perfectly. Accessorize with a {border}.",
        fabric = fabric_for(cloth_type),
        neck = fields.neck_design.to_lowercase(),
        embroidery = fields.embroidery_pattern.to_lowercase(),
        color = fields.color_combination.to_lowercase(),
        sleeve = fields.sleeve_style.to_lowercase(),
        border = fields.border_style.to_lowercase(),
    )
}
