use anyhow::{Context, Result};
use semroute_router::RouteDefinition;
use std::path::Path;
use tracing::info;

/// Load route definitions from a JSON array file
pub fn load_definitions(path: &Path) -> Result<Vec<RouteDefinition>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read routes file {}", path.display()))?;
    let definitions: Vec<RouteDefinition> = serde_json::from_str(&data)
        .with_context(|| format!("Invalid routes file {}", path.display()))?;

    info!("Loaded {} route definitions from {}", definitions.len(), path.display());
    Ok(definitions)
}

/// Built-in demo catalog used when no routes file is configured
pub fn demo_definitions() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition {
            name: "joke".to_string(),
            description: "A route to tell a light-hearted or funny joke.".to_string(),
            examples: vec![
                "Why don't scientists trust atoms? Because they make up everything!".to_string(),
                "What do you call fake spaghetti? An impasta.".to_string(),
            ],
        },
        RouteDefinition {
            name: "weather".to_string(),
            description: "A route to talk about the weather and forecasts.".to_string(),
            examples: vec![
                "What's the weather like today?".to_string(),
                "Is it going to rain tomorrow?".to_string(),
            ],
        },
    ]
}

/// Routes file if given, otherwise the demo catalog
pub fn resolve(path: Option<&Path>) -> Result<Vec<RouteDefinition>> {
    match path {
        Some(path) => load_definitions(path),
        None => {
            info!("No routes file configured, using demo routes");
            Ok(demo_definitions())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_definitions() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "billing", "description": "Invoices", "examples": ["where is my invoice"]}},
                {{"name": "support", "examples": ["my app crashes", "I need help"]}}
            ]"#
        )
        .unwrap();

        let defs = load_definitions(file.path()).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "billing");
        assert_eq!(defs[1].description, "");
        assert_eq!(defs[1].examples.len(), 2);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"name\": \"not-an-array\"}}").unwrap();

        let err = load_definitions(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid routes file"));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_definitions(Path::new("/nonexistent/routes.json")).is_err());
    }

    #[test]
    fn test_resolve_defaults_to_demo() {
        let defs = resolve(None).unwrap();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["joke", "weather"]);
    }
}
