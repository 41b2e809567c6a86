use atelier_core::domain::garment::GarmentAttributes;
use atelier_core::suggestions::SuggestionEngine;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::commands::{CommandResult, FailureKind};

#[derive(Debug, Clone, Args)]
pub struct SuggestArgs {
    #[arg(long, help = "Garment category, e.g. saree, kurti, lehenga")]
    pub cloth_type: String,
    #[arg(long, help = "Occasion, e.g. wedding, festival, office")]
    pub occasion: String,
    #[arg(long, help = "male, female or unisex")]
    pub gender: String,
    #[arg(long, help = "child, adult or senior")]
    pub age_group: String,
    #[arg(long, help = "1000-3000, 3000-8000 or 10000+ (default 3000-8000)")]
    pub budget_range: Option<String>,
    #[arg(long, help = "Seed the template pick for reproducible output")]
    pub seed: Option<u64>,
    #[arg(long, help = "Fail on unknown attribute values instead of printing the generic record")]
    pub strict: bool,
}

impl SuggestArgs {
    fn attributes(&self) -> GarmentAttributes {
        GarmentAttributes {
            cloth_type: Some(self.cloth_type.clone()),
            occasion: Some(self.occasion.clone()),
            gender: Some(self.gender.clone()),
            age_group: Some(self.age_group.clone()),
            budget_range: self.budget_range.clone(),
        }
    }
}

pub fn run(args: &SuggestArgs) -> CommandResult {
    let attributes = args.attributes();

    if args.strict {
        if let Err(error) = attributes.validate() {
            let message = error.to_string();
            return CommandResult::failure("suggest", FailureKind::InvalidAttribute, message);
        }
    }

    let engine = SuggestionEngine::new();
    let record = match args.seed {
        Some(seed) => engine.generate_with_rng(&attributes, &mut StdRng::seed_from_u64(seed)),
        None => engine.generate(&attributes),
    };

    CommandResult::json("suggest", &record, 0)
}
