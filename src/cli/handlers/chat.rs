use std::io::{self, Read};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::CommandContext;
use crate::cli::ClassifierArg;
use crate::server::AppState;

fn resolve_payload(payload: Option<String>) -> Result<Map<String, Value>> {
    let Some(raw) = payload else {
        return Ok(Map::new());
    };
    let raw = if raw == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        content
    } else {
        raw
    };
    match serde_json::from_str(&raw).context("Payload is not valid JSON")? {
        Value::Object(fields) => Ok(fields),
        Value::Null => Ok(Map::new()),
        _ => anyhow::bail!("Payload must be a JSON object"),
    }
}

pub fn handle_chat(
    mut ctx: CommandContext,
    prompt: String,
    payload: Option<String>,
    classifier: Option<ClassifierArg>,
) -> Result<()> {
    let payload = resolve_payload(payload)?;
    if let Some(classifier) = classifier {
        ctx.config.router.classifier = classifier.into();
    }
    let state = AppState::from_config(&ctx.config)?;

    let result = tokio::runtime::Runtime::new()?
        .block_on(async { state.router.handle(&prompt, &payload).await });

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_payload() {
        assert!(resolve_payload(None).unwrap().is_empty());
        assert!(resolve_payload(Some("null".to_string())).unwrap().is_empty());
        let fields = resolve_payload(Some(r#"{"project_id": 1}"#.to_string())).unwrap();
        assert_eq!(fields["project_id"], 1);
    }

    #[test]
    fn test_resolve_payload_rejects_non_objects() {
        assert!(resolve_payload(Some("[1, 2]".to_string())).is_err());
        assert!(resolve_payload(Some("{not json".to_string())).is_err());
    }
}
