use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::model::Intent;

pub fn handle_intents(json: bool) -> Result<()> {
    if json {
        let intents: Vec<_> = Intent::supported()
            .map(|intent| {
                json!({
                    "intent": intent,
                    "required_fields": intent.required_fields(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&intents)?);
        return Ok(());
    }

    for intent in Intent::supported() {
        let fields = intent.required_fields();
        let fields = if fields.is_empty() {
            "-".dimmed().to_string()
        } else {
            fields.join(", ")
        };
        println!("{} {}", format!("{:<26}", intent.as_str()).cyan(), fields);
    }
    Ok(())
}
