//! Read-only lookup tables shared by the compiler components.

use std::collections::BTreeMap;

/// Marker used by definitions for "unlimited" quantities.
pub const INFINITY_MARKER: &str = "∞";

/// Immutable configuration handed to every compiler component.
#[derive(Debug, Clone)]
pub struct Tables {
    /// Raw tile color token -> canonical palette bucket.
    pub color_aliases: BTreeMap<String, String>,
    /// Raw terrain type -> rendered terrain token.
    pub terrain_aliases: BTreeMap<String, String>,
    /// Tile colors in upgrade order; phases expand up to their ceiling.
    pub tile_colors: Vec<String>,
    /// Company color name -> swatch.
    pub company_colors: BTreeMap<String, String>,
    /// Bank value substituted for an unlimited bank.
    pub unlimited_bank: i64,
    /// Quantity substituted for unlimited trains and tiles.
    pub unlimited_quantity: u32,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            color_aliases: pairs(&[("water", "blue"), ("offboard", "red"), ("plain", "white")]),
            terrain_aliases: pairs(&[("river", "water"), ("stream", "water")]),
            tile_colors: ["yellow", "green", "brown", "gray"]
                .iter()
                .map(|color| color.to_string())
                .collect(),
            // Rails on Board swatches.
            company_colors: pairs(&[
                ("black", "#37383a"),
                ("blue", "#0189d1"),
                ("brightGreen", "#76a042"),
                ("brown", "#7b352a"),
                ("gold", "#e09001"),
                ("gray", "#9a9a9d"),
                ("green", "#237333"),
                ("lavender", "#baa4cb"),
                ("lightBlue", "#37b2e2"),
                ("lightBrown", "#b58168"),
                ("lime", "#bdbd00"),
                ("natural", "#fbf4de"),
                ("navy", "#004d95"),
                ("orange", "#f48221"),
                ("pink", "rgb(193,60,125)"),
                ("red", "#d81e3e"),
                ("turquoise", "#00a99e"),
                ("violet", "#7f528b"),
                ("white", "#ffffff"),
                ("yellow", "#f8c200"),
            ]),
            unlimited_bank: 99_999,
            unlimited_quantity: 20,
        }
    }
}

impl Tables {
    /// Map a terrain type through the alias table.
    pub fn terrain(&self, kind: &str) -> String {
        self.terrain_aliases
            .get(kind)
            .cloned()
            .unwrap_or_else(|| kind.to_string())
    }

    /// Every tile color up to and including `ceiling`; empty when unknown.
    pub fn colors_through(&self, ceiling: &str) -> Vec<String> {
        match self.tile_colors.iter().position(|color| color == ceiling) {
            Some(index) => self.tile_colors[..=index].to_vec(),
            None => Vec::new(),
        }
    }
}

fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
