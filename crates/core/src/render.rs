//! Renderer seam between the compiler and output text.

use anyhow::{Context, Result};

use crate::models::{CompiledCatalog, CompiledGame};

/// Turns compiled models into output text.
pub trait Renderer {
    /// Render one compiled game.
    fn render_game(&self, game: &CompiledGame) -> Result<String>;
    /// Render the compiled tile catalog.
    fn render_catalog(&self, catalog: &CompiledCatalog) -> Result<String>;
}

/// Emits the compiled model as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render_game(&self, game: &CompiledGame) -> Result<String> {
        serde_json::to_string_pretty(game)
            .with_context(|| format!("failed to serialize game {}", game.title))
    }

    fn render_catalog(&self, catalog: &CompiledCatalog) -> Result<String> {
        serde_json::to_string_pretty(catalog).context("failed to serialize tile catalog")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogColor, CatalogTile};
    use serde_json::Value;

    #[test]
    fn catalog_json_uses_stable_field_names() -> Result<()> {
        let catalog = CompiledCatalog {
            colors: vec![CatalogColor {
                name: "YELLOW".into(),
                tiles: vec![CatalogTile {
                    id: "7".into(),
                    encoding: "path=a:0,b:1".into(),
                    broken: false,
                }],
            }],
            symbols: "yellow".into(),
        };
        let rendered: Value = serde_json::from_str(&JsonRenderer.render_catalog(&catalog)?)?;
        assert_eq!(rendered["symbols"], "yellow");
        assert_eq!(rendered["colors"][0]["tiles"][0]["encoding"], "path=a:0,b:1");
        Ok(())
    }
}
