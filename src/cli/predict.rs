//! Predict command - full pipeline on a single profile

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use soulsync::models::{FlagTier, Prediction, UserProfile};
use soulsync::predictor::{ArtifactPaths, PredictError, PredictionPipeline};

pub fn run(paths: &ArtifactPaths, profile_path: &Path, format: &str) -> Result<()> {
    let content = std::fs::read_to_string(profile_path)
        .with_context(|| format!("failed to read profile from {}", profile_path.display()))?;
    let profile: UserProfile = serde_json::from_str(&content)
        .with_context(|| format!("invalid profile JSON in {}", profile_path.display()))?;

    let pipeline = PredictionPipeline::from_paths(paths);

    let prediction = match pipeline.predict_profile(&profile) {
        Ok(p) => p,
        Err(PredictError::ModelUnavailable) => anyhow::bail!(
            "no trained model at {}. Run 'soulsync train <dataset.csv>' first.",
            paths.model.display()
        ),
        Err(e) => return Err(e.into()),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&prediction)?),
        _ => print_report(&prediction),
    }
    Ok(())
}

fn print_report(prediction: &Prediction) {
    println!();
    println!("{}", style("Match Report").bold().underlined());
    println!();
    println!(
        "  Compatibility:  {}",
        style(format!("{:.1}%", prediction.compatibility_score)).bold()
    );
    println!("  Ghosting risk:  {:.1}%", prediction.ghosting_probability);
    println!("  Safety score:   {:.0}/100", prediction.safety_score);
    println!("  Bio:            {}", prediction.bio_feedback);
    println!();

    println!("{}", style("Details").bold());
    println!(
        "  Personality strength:  {:.0}/100",
        prediction.match_details.personality_strength
    );
    println!(
        "  Love style intensity:  {:.0}/100",
        prediction.match_details.love_style_intensity
    );
    println!(
        "  Lifestyle match:       {:.0}/100",
        prediction.match_details.lifestyle_match
    );
    println!();

    if !prediction.flags.is_empty() {
        println!("{}", style("Flags").bold());
        for flag in &prediction.flags {
            let tag = match flag.tier {
                FlagTier::Green => style("green").green(),
                FlagTier::Beige => style("beige").yellow(),
                FlagTier::Red => style("red").red(),
            };
            println!("  [{}] {}", tag, flag.text);
        }
        println!();
    }

    println!("{}", style("Icebreakers").bold());
    for icebreaker in &prediction.icebreakers {
        println!("  - {}", icebreaker);
    }
    println!();

    println!("{}", style("Projected timeline").bold());
    for entry in &prediction.timeline {
        println!("  {:<10} {}", entry.time, entry.event);
    }
    println!();
}
