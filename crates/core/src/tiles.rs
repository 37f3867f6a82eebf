//! Tile catalog compilation.

use tracing::debug;

use crate::{
    hex::{ColorClassifier, HexEncoder},
    models::{CatalogColor, CatalogTile, CompiledCatalog, Layout, TileCatalog},
    tables::Tables,
};

/// Groups the catalog by palette bucket and encodes every tile.
#[derive(Debug, Clone, Copy)]
pub struct TileCatalogCompiler<'a> {
    classifier: ColorClassifier<'a>,
    encoder: HexEncoder<'a>,
}

impl<'a> TileCatalogCompiler<'a> {
    /// Catalog tiles are drawn pointy-side up.
    pub fn new(tables: &'a Tables) -> Self {
        Self::with_layout(tables, Layout::Pointy)
    }

    /// Compiler drawing tiles in `layout`.
    pub fn with_layout(tables: &'a Tables, layout: Layout) -> Self {
        Self {
            classifier: ColorClassifier::new(tables),
            encoder: HexEncoder::new(tables, layout),
        }
    }

    /// Encode every tile, grouped by color in first-appearance order.
    pub fn compile(&self, catalog: &TileCatalog) -> CompiledCatalog {
        let mut groups: Vec<(String, Vec<CatalogTile>)> = Vec::new();

        for (id, tile) in catalog {
            let color = self.classifier.classify(tile);
            let entry = CatalogTile {
                id: id.clone(),
                encoding: self.encoder.encode(tile),
                broken: tile.broken,
            };
            match groups.iter_mut().find(|(existing, _)| *existing == color) {
                Some((_, tiles)) => tiles.push(entry),
                None => groups.push((color, vec![entry])),
            }
        }

        debug!(tiles = catalog.len(), colors = groups.len(), "compiled tile catalog");
        let symbols = groups
            .iter()
            .map(|(color, _)| color_symbol(color))
            .collect::<Vec<_>>()
            .join(" ");
        let colors = groups
            .into_iter()
            .map(|(color, tiles)| CatalogColor {
                name: color_module(&color),
                tiles,
            })
            .collect();

        CompiledCatalog { colors, symbols }
    }
}

/// Lowercase symbol for a palette bucket (`yellow/green` -> `yellowgreen`).
pub fn color_symbol(color: &str) -> String {
    color.replace('/', "").to_lowercase()
}

/// Upper-case module name for a palette bucket.
pub fn color_module(color: &str) -> String {
    color.replace('/', "").to_uppercase()
}
