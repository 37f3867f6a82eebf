use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::{
    data::{self, DataNormalizer},
    error::{CompileError, Result},
    hex::{ColorClassifier, HexEncoder},
    map::resolve_hexes,
    market::compile_market,
    models::{
        CompiledGame, EncodedHex, GameDefinition, HexColorGroup, HexDefinition, MapLayout,
        TileCatalog,
    },
    tables::Tables,
};

use super::entities;

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]*)(.*)$").expect("failed to compile title regex"));
static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("failed to compile identifier regex"));

/// Assembles the full renderer model for one game.
#[derive(Debug, Clone, Copy)]
pub struct GameCompiler<'a> {
    tables: &'a Tables,
    catalog: Option<&'a TileCatalog>,
}

impl<'a> GameCompiler<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self {
            tables,
            catalog: None,
        }
    }

    /// Use the tile catalog to drop tiles it flags as broken.
    pub fn with_catalog(mut self, catalog: &'a TileCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn compile(&self, game: &GameDefinition, variation: usize) -> Result<CompiledGame> {
        let title = game
            .info
            .as_ref()
            .and_then(|info| info.title.clone())
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| CompileError::malformed("info.title", "game has no title"))?;
        let filename = filename_for(&title);
        let layout = data::layout(game);
        let hexes = resolve_hexes(game, variation)?;
        let normalizer = DataNormalizer::new(self.tables);

        let compiled = CompiledGame {
            module: module_for(&title),
            variation: match game.map {
                Some(MapLayout::Variations(_)) => variation,
                _ => 0,
            },
            currency: data::currency(game),
            bank: normalizer.bank(game)?,
            cert_limit: normalizer.cert_limit(game)?,
            starting_cash: normalizer.starting_cash(game)?,
            capitalization: data::capitalization(game),
            must_sell_in_blocks: data::must_sell_in_blocks(game),
            layout,
            location_names: entities::location_names(&hexes),
            tiles: entities::tile_quantities(game, self.tables, self.catalog)?,
            market: compile_market(game),
            privates: entities::privates(game),
            companies: entities::companies(game, &hexes, &filename, self.tables),
            trains: entities::trains(game, self.tables)?,
            phases: entities::phases(game, self.tables),
            hexes: self.hex_table(&hexes, HexEncoder::new(self.tables, layout)),
            filename,
            title,
        };

        info!(
            game = %compiled.title,
            variation = compiled.variation,
            hexes = hexes.len(),
            companies = compiled.companies.len(),
            "compiled game"
        );
        Ok(compiled)
    }

    /// Group hexes by color, then by identical encoding.
    fn hex_table(&self, hexes: &[HexDefinition], encoder: HexEncoder<'_>) -> Vec<HexColorGroup> {
        let classifier = ColorClassifier::new(self.tables);
        let mut groups: Vec<HexColorGroup> = Vec::new();

        for hex in hexes {
            if hex.hexes.is_empty() {
                debug!(variation = ?hex.variation, "skipping hex without coordinates");
                continue;
            }
            let color = classifier.classify(hex);
            let encoding = encoder.encode(hex);

            let index = match groups.iter().position(|group| group.color == color) {
                Some(index) => index,
                None => {
                    groups.push(HexColorGroup {
                        color,
                        hexes: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            let group = &mut groups[index];
            match group.hexes.iter_mut().find(|entry| entry.encoding == encoding) {
                Some(entry) => entry.hexes.extend(hex.hexes.iter().cloned()),
                None => group.hexes.push(EncodedHex {
                    encoding,
                    hexes: hex.hexes.clone(),
                }),
            }
        }

        groups
    }
}

/// File stem for a title: leading digits, then the lowercased remainder.
pub fn filename_for(title: &str) -> String {
    let title = title.trim();
    let (numbers, words) = TITLE_RE
        .captures(title)
        .map(|caps| {
            (
                caps.get(1).map_or("", |m| m.as_str()),
                caps.get(2).map_or("", |m| m.as_str()),
            )
        })
        .unwrap_or(("", title));
    let words = NON_WORD_RE
        .replace_all(&words.to_lowercase(), "_")
        .trim_matches('_')
        .to_string();

    match (numbers.is_empty(), words.is_empty()) {
        (_, true) => numbers.to_string(),
        (true, false) => words,
        (false, false) => format!("{numbers}_{words}"),
    }
}

/// Module identifier for a title (`18Chesapeake` -> `G18Chesapeake`).
pub fn module_for(title: &str) -> String {
    let mut module = String::from("G");
    module.extend(title.chars().filter(char::is_ascii_alphanumeric));
    module
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Layout, MarketCell, PlayerValue};
    use serde_json::json;

    fn sample_game() -> GameDefinition {
        serde_json::from_value(json!({
            "info": { "title": "18Sample", "currency": "£#", "orientation": "horizontal" },
            "bank": "∞",
            "players": [
                { "number": 3, "certLimit": 16, "capital": 500 },
                { "number": 4, "certLimit": 12, "capital": 375 }
            ],
            "tiles": { "7": "∞", "8": 4 },
            "stock": { "market": [[100, "110p"], [90, null]] },
            "tokenTypes": { "default": [0, 40] },
            "companies": [{ "abbrev": "SR", "color": "green" }],
            "trains": [{ "name": "2", "quantity": 5 }],
            "phases": [{ "name": "2", "tiles": "green" }],
            "map": [
                {
                    "hexes": [
                        { "color": "plain", "hexes": ["A1", "A3"] },
                        { "color": "plain", "hexes": ["B2"] },
                        { "color": "yellow", "hexes": ["C3"],
                          "cities": [{ "companies": ["SR"], "name": { "name": "Sample City" } }],
                          "values": [{ "value": 20 }] },
                        { "color": "offboard", "hexes": ["D4"],
                          "offBoardRevenue": { "revenues": [{ "color": "yellow", "value": 30 }] },
                          "track": [{ "side": 1 }] }
                    ]
                },
                { "copy": 0, "remove": ["A3"],
                  "hexes": [{ "color": "water", "hexes": ["E5"], "copy": "B2" }] }
            ]
        }))
        .expect("valid sample game")
    }

    #[test]
    fn compiles_full_game() -> Result<()> {
        let tables = Tables::default();
        let game = GameCompiler::new(&tables).compile(&sample_game(), 0)?;

        assert_eq!(game.filename, "18_sample");
        assert_eq!(game.module, "G18Sample");
        assert_eq!(game.currency, "£%d");
        assert_eq!(game.layout, Layout::Flat);
        assert_eq!(game.bank, PlayerValue::Scalar(99_999));
        assert!(matches!(game.cert_limit, PlayerValue::PerPlayer(ref table) if table.len() == 2));
        assert_eq!(game.tiles[0].quantity, 20);
        assert_eq!(game.market.len(), 2);
        assert_eq!(game.market[1].cells[1], MarketCell::Empty);
        assert_eq!(game.companies[0].home.as_deref(), Some("C3"));
        assert_eq!(game.trains[0].num, Some(5));
        assert_eq!(game.phases[0].tiles, vec!["yellow", "green"]);
        assert_eq!(game.location_names[0].name, "Sample City");

        let colors: Vec<_> = game.hexes.iter().map(|group| group.color.as_str()).collect();
        assert_eq!(colors, vec!["white", "yellow", "red"]);
        assert_eq!(game.hexes[0].hexes.len(), 1);
        assert_eq!(game.hexes[0].hexes[0].hexes, vec!["A1", "A3", "B2"]);
        assert_eq!(game.hexes[1].hexes[0].encoding, "city=revenue:20");
        assert_eq!(
            game.hexes[2].hexes[0].encoding,
            "offboard=revenue:yellow_30;path=a:1,b:_0"
        );
        Ok(())
    }

    #[test]
    fn compiles_selected_variation() -> Result<()> {
        let tables = Tables::default();
        let game = GameCompiler::new(&tables).compile(&sample_game(), 1)?;
        assert_eq!(game.variation, 1);

        let white = &game.hexes[0];
        assert_eq!(white.color, "white");
        assert_eq!(white.hexes[0].hexes, vec!["A1", "B2"]);
        // E5 copies the plain B2 hex but keeps its own water color.
        let blue = game.hexes.iter().find(|group| group.color == "blue");
        assert_eq!(blue.map(|group| group.hexes[0].hexes.clone()), Some(vec!["E5".to_string()]));
        Ok(())
    }

    #[test]
    fn compilation_is_repeatable() -> Result<()> {
        let tables = Tables::default();
        let compiler = GameCompiler::new(&tables);
        let definition = sample_game();
        assert_eq!(compiler.compile(&definition, 1)?, compiler.compile(&definition, 1)?);
        Ok(())
    }

    #[test]
    fn missing_title_is_malformed() {
        let tables = Tables::default();
        let result = GameCompiler::new(&tables).compile(&GameDefinition::default(), 0);
        assert!(matches!(result, Err(CompileError::MalformedDefinition { .. })));
    }

    #[test]
    fn derives_identifiers_from_title() {
        assert_eq!(filename_for("1889"), "1889");
        assert_eq!(filename_for("18Chesapeake"), "18_chesapeake");
        assert_eq!(filename_for("18 Los Angeles"), "18_los_angeles");
        assert_eq!(filename_for("Steam Over Holland"), "steam_over_holland");
        assert_eq!(module_for("18Chesapeake"), "G18Chesapeake");
        assert_eq!(module_for("18 Los Angeles"), "G18LosAngeles");
    }
}
