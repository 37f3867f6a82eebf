#![allow(missing_docs)]

//! Raw game and tile definitions as supplied by the content database.
//!
//! Field names follow the camelCase spelling of the source files. Fields
//! that appear in several shapes across games are modelled as untagged
//! enums and resolved by pattern matching in the compiler.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CompileError, Result};
use crate::tables::{Tables, INFINITY_MARKER};

/// Tile catalog keyed by tile id.
pub type TileCatalog = BTreeMap<String, HexDefinition>;

/// A revenue, cost or price that may be numeric or a tagged string (`"D100"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(i64),
    Text(String),
}

impl Amount {
    /// Diesel revenues are written as `D<cost>`.
    pub fn diesel_cost(&self) -> Option<&str> {
        match self {
            Amount::Text(text) => text.strip_prefix('D'),
            Amount::Number(_) => None,
        }
    }

    /// Numeric value. The infinity marker maps to `unlimited` when the
    /// field allows it.
    pub fn resolve(&self, field: &str, unlimited: Option<i64>) -> Result<i64> {
        match self {
            Amount::Number(value) => Ok(*value),
            Amount::Text(text) if text.trim() == INFINITY_MARKER => unlimited.ok_or_else(|| {
                CompileError::malformed(field, "unlimited value not allowed here")
            }),
            Amount::Text(text) => text.trim().parse().map_err(|_| {
                CompileError::malformed(field, format!("expected a number, found '{text}'"))
            }),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(value) => write!(f, "{value}"),
            Amount::Text(text) => f.write_str(text),
        }
    }
}

/// One board cell or catalog tile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Grid coordinates sharing this encoding.
    #[serde(default)]
    pub hexes: Vec<String>,
    /// Pre-set encoding; bypasses feature compilation entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cities: Vec<Stop>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub towns: Vec<Stop>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub center_towns: Vec<Stop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_board_revenue: Option<OffboardRevenue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub track: Vec<Track>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terrain: Vec<Terrain>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_borders: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<RevenueValue>,
    /// Coordinate of another hex whose features this one inherits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub broken: bool,
    /// Map variation this hex was taken from; set by the map resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<usize>,
}

impl HexDefinition {
    /// True when the hex carries any city, town or center town.
    pub fn has_stops(&self) -> bool {
        !self.cities.is_empty() || !self.towns.is_empty() || !self.center_towns.is_empty()
    }

    /// Center towns followed by towns, the order towns are encoded in.
    pub fn all_towns(&self) -> impl Iterator<Item = &Stop> {
        self.center_towns.iter().chain(self.towns.iter())
    }
}

/// City, town or center town.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Abbreviations of companies homed here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<PlaceName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceName {
    pub name: String,
}

/// Off-board area paying different revenue per phase color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffboardRevenue {
    #[serde(default)]
    pub revenues: Vec<PhaseRevenue>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<PlaceName>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseRevenue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Amount>,
}

impl PhaseRevenue {
    /// First of `value`, `revenue`, `cost`, defaulting to zero.
    pub fn amount(&self) -> Amount {
        self.value
            .as_ref()
            .or(self.revenue.as_ref())
            .or(self.cost.as_ref())
            .cloned()
            .unwrap_or(Amount::Number(0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Curvature: `sharp`, `gentle`, `straight`; anything else is a stub.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueValue {
    pub value: Amount,
}

/// Top-level definition of one game.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDefinition {
    #[serde(default)]
    pub info: Option<GameInfoDefinition>,
    #[serde(default)]
    pub bank: Option<Amount>,
    #[serde(default)]
    pub cert_limit: Option<Amount>,
    #[serde(default)]
    pub capital: Option<Amount>,
    #[serde(default)]
    pub players: Vec<PlayerDefinition>,
    #[serde(default)]
    pub map: Option<MapLayout>,
    #[serde(default)]
    pub tiles: BTreeMap<String, Quantity>,
    #[serde(default)]
    pub companies: Vec<CompanyDefinition>,
    #[serde(default)]
    pub privates: Vec<PrivateDefinition>,
    #[serde(default)]
    pub trains: Vec<TrainDefinition>,
    #[serde(default)]
    pub phases: Vec<PhaseDefinition>,
    #[serde(default)]
    pub stock: Option<StockDefinition>,
    #[serde(default)]
    pub token_types: BTreeMap<String, Vec<Value>>,
    #[serde(default)]
    pub share_types: BTreeMap<String, Vec<Value>>,
    #[serde(default)]
    pub float_percent: Option<u32>,
}

impl GameDefinition {
    /// Decode a definition from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfoDefinition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// `horizontal` (flat) or `vertical` (pointy).
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub capitalization: Option<String>,
    #[serde(default)]
    pub must_sell_in_blocks: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDefinition {
    pub number: u32,
    #[serde(default)]
    pub bank: Option<Amount>,
    #[serde(default)]
    pub cert_limit: Option<Amount>,
    #[serde(default)]
    pub capital: Option<Amount>,
}

/// Either one map or a list of selectable variations.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MapLayout {
    Variations(Vec<MapDefinition>),
    Single(MapDefinition),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hexes: Option<Vec<HexDefinition>>,
    /// Variation whose hexes are prepended to this one.
    #[serde(default)]
    pub copy: Option<usize>,
    /// Coordinates stripped from every hex.
    #[serde(default)]
    pub remove: Vec<String>,
}

/// A count that may be written as the infinity marker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Number(u32),
    Text(String),
}

impl Count {
    pub fn resolve(&self, field: &str, tables: &Tables) -> Result<u32> {
        match self {
            Count::Number(value) => Ok(*value),
            Count::Text(text) if text.trim() == INFINITY_MARKER => Ok(tables.unlimited_quantity),
            Count::Text(text) => text.trim().parse().map_err(|_| {
                CompileError::malformed(field, format!("expected a quantity, found '{text}'"))
            }),
        }
    }
}

/// Tile quantity entry: a bare count or a detailed entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Scalar(Count),
    Detailed(TileSpec),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TileSpec {
    #[serde(default)]
    pub quantity: Option<Count>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub broken: bool,
}

/// Token or share list, or the name of a template in the game's type tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Template {
    Named(String),
    Entries(Vec<Value>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDefinition {
    pub abbrev: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub logo: Option<Value>,
    #[serde(default)]
    pub minor: bool,
    #[serde(default)]
    pub tokens: Option<Template>,
    #[serde(default)]
    pub shares: Option<Template>,
    #[serde(default)]
    pub float_percent: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateDefinition {
    pub name: String,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub revenue: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min_players: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainDefinition {
    pub name: String,
    #[serde(default)]
    pub distance: Option<Value>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub rusts_on: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Count>,
    #[serde(default)]
    pub available_on: Option<Value>,
    #[serde(default)]
    pub discount: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhaseDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub train: Option<String>,
    #[serde(default)]
    pub on: Option<Value>,
    #[serde(default)]
    pub limit: Option<Value>,
    /// Highest tile color available in this phase.
    #[serde(default)]
    pub tiles: Option<String>,
    #[serde(default)]
    pub rounds: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockDefinition {
    #[serde(default)]
    pub market: Option<MarketLayout>,
}

/// Stock market as a single row or a grid of rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MarketLayout {
    Grid(Vec<Vec<Option<MarketCellDefinition>>>),
    Row(Vec<Option<MarketCellDefinition>>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MarketCellDefinition {
    Number(i64),
    Text(String),
    Detailed {
        #[serde(default)]
        value: Option<Amount>,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        par: bool,
        #[serde(default)]
        legend: Option<usize>,
    },
}
