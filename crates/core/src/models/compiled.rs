#![allow(missing_docs)]

//! Renderer-facing output model.
//!
//! Field names serialise in camelCase and form the contract with the
//! downstream template renderer; keep them stable.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Hex orientation of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Flat,
    #[default]
    Pointy,
}

impl Layout {
    pub fn is_flat(self) -> bool {
        matches!(self, Layout::Flat)
    }
}

/// A game-wide scalar or a table keyed by player count.
///
/// Both shapes are legal; the renderer must handle either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PlayerValue {
    Scalar(i64),
    PerPlayer(BTreeMap<u32, i64>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationName {
    pub coord: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileQuantity {
    pub id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Display value of one stock market cell; `Empty` marks a hole in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MarketCell {
    Price(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRow {
    pub cells: Vec<MarketCell>,
    pub has_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPrivate {
    pub name: String,
    pub value: Value,
    pub revenue: Value,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_players: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub label: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledCompany {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float_percent: Option<u32>,
    pub abbrev: String,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    pub tokens: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_type: Option<String>,
    pub shares: Vec<Value>,
    pub home: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discount {
    pub name: String,
    pub discount: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledTrain {
    pub name: String,
    pub distance: Value,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rusts_on: Option<Value>,
    pub num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_on: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Vec<Discount>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledPhase {
    pub name: Option<String>,
    pub on: Option<Value>,
    pub limit: Option<Value>,
    pub tiles: Vec<String>,
    pub rounds: Option<Value>,
}

/// Coordinates that share one encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedHex {
    pub encoding: String,
    pub hexes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HexColorGroup {
    pub color: String,
    pub hexes: Vec<EncodedHex>,
}

/// Fully normalised game, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledGame {
    pub title: String,
    /// File stem derived from the title (`18_chesapeake`).
    pub filename: String,
    /// Module identifier derived from the title (`G18Chesapeake`).
    pub module: String,
    /// Selected map variation.
    pub variation: usize,
    pub currency: String,
    pub bank: PlayerValue,
    pub cert_limit: PlayerValue,
    pub starting_cash: PlayerValue,
    pub capitalization: String,
    pub must_sell_in_blocks: bool,
    pub layout: Layout,
    pub location_names: Vec<LocationName>,
    pub tiles: Vec<TileQuantity>,
    pub market: Vec<MarketRow>,
    pub privates: Vec<CompiledPrivate>,
    pub companies: Vec<CompiledCompany>,
    pub trains: Vec<CompiledTrain>,
    pub phases: Vec<CompiledPhase>,
    pub hexes: Vec<HexColorGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogTile {
    pub id: String,
    pub encoding: String,
    pub broken: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogColor {
    /// Upper-cased module name for the color (`YELLOW`).
    pub name: String,
    pub tiles: Vec<CatalogTile>,
}

/// Tile catalog grouped by palette bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledCatalog {
    pub colors: Vec<CatalogColor>,
    /// Space-joined lowercase color symbols.
    pub symbols: String,
}
