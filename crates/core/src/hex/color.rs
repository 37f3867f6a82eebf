use tracing::debug;

use crate::{models::HexDefinition, tables::Tables};

/// Color used for hexes and tiles that declare none.
pub const DEFAULT_COLOR: &str = "white";

/// Maps raw color tokens onto the renderer's palette buckets.
#[derive(Debug, Clone, Copy)]
pub struct ColorClassifier<'a> {
    tables: &'a Tables,
}

impl<'a> ColorClassifier<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    pub fn classify(&self, hex: &HexDefinition) -> String {
        self.classify_token(hex.color.as_deref().unwrap_or(DEFAULT_COLOR))
    }

    /// Unknown tokens pass through unchanged.
    pub fn classify_token(&self, color: &str) -> String {
        if let Some(bucket) = self.tables.color_aliases.get(color) {
            return bucket.clone();
        }
        if !self.is_known(color) {
            debug!(token = color, "passing through unknown color");
        }
        color.to_string()
    }

    fn is_known(&self, color: &str) -> bool {
        self.tables.tile_colors.iter().any(|known| known == color)
            || self.tables.color_aliases.values().any(|known| known == color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_water_offboard_and_plain() {
        let tables = Tables::default();
        let classifier = ColorClassifier::new(&tables);
        assert_eq!(classifier.classify_token("water"), "blue");
        assert_eq!(classifier.classify_token("offboard"), "red");
        assert_eq!(classifier.classify_token("plain"), "white");
        assert_eq!(classifier.classify_token("green"), "green");
    }

    #[test]
    fn unknown_colors_pass_through() {
        let tables = Tables::default();
        let classifier = ColorClassifier::new(&tables);
        assert_eq!(classifier.classify_token("sepia"), "sepia");
        assert_eq!(classifier.classify(&HexDefinition::default()), "white");
    }
}
