use log::debug;
use nutrition_import::{energy, ImageSource, NutritionImporter, UserProfileSnapshot};
use serde::Serialize;
use std::env;

const USAGE: &str = "Usage: nutrition-import <command> <argument> [servings]

Commands:
  text <file> [servings]     Analyze an ingredient list read from a file
  food <name>                Look up a food by name
  recipe <id>                Look up a recipe by provider id
  image <path> [servings]    OCR a recipe photo and analyze its ingredients
  photo <path>               Recognize the food on a photo and look it up
  goal <profile.json>        Project the daily calorie target for a profile";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).ok_or(USAGE)?;
    let argument = args.get(2).ok_or(USAGE)?;
    let servings = match args.get(3) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| format!("Invalid servings: {}", raw))?,
        None => 1,
    };
    debug!("Running '{}' on '{}'", command, argument);

    let builder = NutritionImporter::builder();
    let record = match command.as_str() {
        "text" => {
            let text = tokio::fs::read_to_string(argument).await?;
            builder.text(text).servings(servings).build().await?
        }
        "food" => builder.food(argument.as_str()).build().await?,
        "recipe" => {
            let id = argument
                .parse::<u64>()
                .map_err(|_| format!("Invalid recipe id: {}", argument))?;
            builder.recipe_id(id).build().await?
        }
        "image" => {
            builder
                .recipe_image(ImageSource::Path(argument.clone()))
                .servings(servings)
                .build()
                .await?
        }
        "photo" => {
            builder
                .food_photo(ImageSource::Path(argument.clone()))
                .build()
                .await?
        }
        "goal" => {
            let raw = tokio::fs::read_to_string(argument).await?;
            let profile: UserProfileSnapshot = serde_json::from_str(&raw)?;
            return print_json(&energy::project(&profile).summary());
        }
        _ => return Err(USAGE.into()),
    };

    print_json(&record)
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
