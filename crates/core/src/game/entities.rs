//! Normalisation of companies, privates, trains, phases and tile counts.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{CompileError, Result},
    models::{
        CompanyDefinition, CompiledCompany, CompiledPhase, CompiledPrivate, CompiledTrain,
        Discount, GameDefinition, HexDefinition, LocationName, Quantity, Template, TileCatalog,
        TileQuantity, Token,
    },
    tables::Tables,
};

/// Distance given to trains whose name carries no number (e.g. `D`).
pub const UNLIMITED_DISTANCE: u32 = 999;

const MINOR_TEMPLATE: &str = "minor";
const DEFAULT_TEMPLATE: &str = "default";

static LEADING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("failed to compile train distance regex"));
static LOGO_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[& ]").expect("failed to compile logo regex"));

/// Named stops per hex, keyed by the hex's first coordinate.
pub fn location_names(hexes: &[HexDefinition]) -> Vec<LocationName> {
    hexes
        .iter()
        .filter_map(|hex| {
            let coord = hex.hexes.first()?;
            let names = hex
                .cities
                .iter()
                .chain(hex.center_towns.iter())
                .chain(hex.towns.iter())
                .filter_map(|stop| stop.name.as_ref())
                .chain(hex.off_board_revenue.iter().filter_map(|off| off.name.as_ref()))
                .map(|name| name.name.as_str())
                .collect::<Vec<_>>();
            (!names.is_empty()).then(|| LocationName {
                coord: coord.clone(),
                name: names.join(" & "),
            })
        })
        .collect()
}

/// The game's tile counts, minus tiles flagged broken here or in the catalog.
pub fn tile_quantities(
    game: &GameDefinition,
    tables: &Tables,
    catalog: Option<&TileCatalog>,
) -> Result<Vec<TileQuantity>> {
    let mut quantities = Vec::with_capacity(game.tiles.len());
    for (id, entry) in &game.tiles {
        let field = format!("tiles.{id}");
        let (quantity, color, code, broken) = match entry {
            Quantity::Scalar(count) => (count.resolve(&field, tables)?, None, None, false),
            Quantity::Detailed(detail) => (
                detail.quantity
                    .as_ref()
                    .map(|count| count.resolve(&field, tables))
                    .transpose()?
                    .unwrap_or(1),
                detail.color.clone(),
                detail.code.clone(),
                detail.broken,
            ),
        };

        let broken = broken
            || catalog
                .and_then(|catalog| catalog.get(id))
                .map(|tile| tile.broken)
                .unwrap_or(false);
        if broken {
            debug!(tile = %id, "skipping broken tile");
            continue;
        }

        quantities.push(TileQuantity {
            id: id.clone(),
            quantity,
            color,
            code,
        });
    }
    Ok(quantities)
}

pub fn privates(game: &GameDefinition) -> Vec<CompiledPrivate> {
    game.privates
        .iter()
        .map(|private| CompiledPrivate {
            name: private.name.clone(),
            value: private.price.clone().unwrap_or(Value::Null),
            revenue: match &private.revenue {
                Some(Value::Array(values)) => values.first().cloned().unwrap_or(Value::from(0)),
                Some(Value::Null) | None => Value::from(0),
                Some(value) => value.clone(),
            },
            description: private.description.clone().unwrap_or_default(),
            min_players: private.min_players,
        })
        .collect()
}

/// First coordinate of the first hex with a city naming `abbrev`.
pub fn find_home(abbrev: &str, hexes: &[HexDefinition]) -> Option<String> {
    hexes
        .iter()
        .find(|hex| {
            hex.cities
                .iter()
                .any(|city| city.companies.iter().any(|company| company == abbrev))
        })
        .and_then(|hex| hex.hexes.first().cloned())
}

pub fn companies(
    game: &GameDefinition,
    hexes: &[HexDefinition],
    filename: &str,
    tables: &Tables,
) -> Vec<CompiledCompany> {
    game.companies
        .iter()
        .map(|company| {
            let (token_type, tokens) = resolve_template(
                "token type",
                company.tokens.as_ref(),
                company.minor,
                &game.token_types,
            );
            let (share_type, shares) = resolve_template(
                "share type",
                company.shares.as_ref(),
                company.minor,
                &game.share_types,
            );

            CompiledCompany {
                float_percent: company.float_percent.or(game.float_percent),
                abbrev: company.abbrev.clone(),
                name: company.name.clone(),
                logo: has_logo(company).then(|| {
                    format!("{filename}/{}", LOGO_STRIP_RE.replace_all(&company.abbrev, ""))
                }),
                token_type,
                tokens: tokens
                    .into_iter()
                    .map(|token| Token {
                        label: if token.is_number() { token } else { Value::from(0) },
                    })
                    .collect(),
                share_type,
                shares,
                home: find_home(&company.abbrev, hexes),
                color: company
                    .color
                    .as_deref()
                    .map(|color| company_color(color, tables)),
            }
        })
        .collect()
}

/// Pick a company's token or share list.
///
/// Minor companies without their own list use the `minor` template, others
/// the `default` one; a string names a template directly. Unknown template
/// names keep their name with an empty list.
fn resolve_template(
    kind: &'static str,
    own: Option<&Template>,
    minor: bool,
    templates: &BTreeMap<String, Vec<Value>>,
) -> (Option<String>, Vec<Value>) {
    let named = |name: &str| (Some(name.to_string()), templates[name].clone());
    match own {
        None if minor && templates.contains_key(MINOR_TEMPLATE) => named(MINOR_TEMPLATE),
        None if templates.contains_key(DEFAULT_TEMPLATE) => named(DEFAULT_TEMPLATE),
        None => (None, Vec::new()),
        Some(Template::Named(name)) => match templates.get(name) {
            Some(entries) => (Some(name.clone()), entries.clone()),
            None => {
                let err = CompileError::UnknownToken {
                    kind,
                    token: name.clone(),
                };
                debug!("{err}; passing through");
                (Some(name.clone()), Vec::new())
            }
        },
        Some(Template::Entries(entries)) => (None, entries.clone()),
    }
}

fn has_logo(company: &CompanyDefinition) -> bool {
    match &company.logo {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(path)) => !path.is_empty(),
        Some(_) => true,
    }
}

/// Palette swatch for a company color; white companies draw as gray.
fn company_color(color: &str, tables: &Tables) -> String {
    let key = if color == "white" { "gray" } else { color };
    match tables.company_colors.get(key) {
        Some(swatch) => swatch.clone(),
        None => {
            debug!(color, "unknown company color, passing through");
            color.to_string()
        }
    }
}

pub fn trains(game: &GameDefinition, tables: &Tables) -> Result<Vec<CompiledTrain>> {
    game.trains
        .iter()
        .map(|train| {
            let field = format!("trains.{}.quantity", train.name);
            Ok(CompiledTrain {
                name: train.name.clone(),
                distance: train
                    .distance
                    .clone()
                    .filter(|distance| !distance.is_null())
                    .unwrap_or_else(|| Value::from(distance_from_name(&train.name))),
                price: train.price.unwrap_or(0),
                rusts_on: train.rusts_on.clone(),
                num: train
                    .quantity
                    .as_ref()
                    .map(|count| count.resolve(&field, tables))
                    .transpose()?,
                available_on: train.available_on.clone(),
                discount: (!train.discount.is_empty()).then(|| {
                    train
                        .discount
                        .iter()
                        .map(|(name, discount)| Discount {
                            name: name.clone(),
                            discount: discount.clone(),
                        })
                        .collect()
                }),
            })
        })
        .collect()
}

/// Leading integer of a train name (`"4D"` -> 4), else [`UNLIMITED_DISTANCE`].
pub fn distance_from_name(name: &str) -> u32 {
    LEADING_NUMBER_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(UNLIMITED_DISTANCE)
}

pub fn phases(game: &GameDefinition, tables: &Tables) -> Vec<CompiledPhase> {
    game.phases
        .iter()
        .map(|phase| CompiledPhase {
            name: phase.name.clone().or_else(|| phase.train.clone()),
            on: phase.on.clone(),
            limit: phase.limit.clone(),
            tiles: phase
                .tiles
                .as_deref()
                .map(|ceiling| tables.colors_through(ceiling))
                .unwrap_or_default(),
            rounds: phase.rounds.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game(value: Value) -> GameDefinition {
        serde_json::from_value(value).expect("valid game fixture")
    }

    #[test]
    fn unlimited_tile_quantity_becomes_twenty() -> Result<()> {
        let tables = Tables::default();
        let game = game(json!({ "tiles": {
            "1": "∞",
            "7": 4,
            "57": { "quantity": 2, "color": "yellow", "code": "city" },
            "X1": { "color": "green" }
        }}));
        let tiles = tile_quantities(&game, &tables, None)?;
        let counts: Vec<_> = tiles.iter().map(|tile| (tile.id.as_str(), tile.quantity)).collect();
        assert_eq!(counts, vec![("1", 20), ("57", 2), ("7", 4), ("X1", 1)]);
        assert_eq!(tiles[1].code.as_deref(), Some("city"));
        Ok(())
    }

    #[test]
    fn broken_tiles_are_excluded() -> Result<()> {
        let tables = Tables::default();
        let game = game(json!({ "tiles": {
            "8": 3,
            "9": 2,
            "10": { "quantity": 1, "broken": true }
        }}));
        let catalog: TileCatalog = serde_json::from_value(json!({
            "8": { "color": "yellow", "broken": true },
            "9": { "color": "yellow" }
        }))?;
        let tiles = tile_quantities(&game, &tables, Some(&catalog))?;
        let ids: Vec<_> = tiles.iter().map(|tile| tile.id.as_str()).collect();
        assert_eq!(ids, vec!["9"]);
        Ok(())
    }

    #[test]
    fn companies_inherit_templates_and_homes() -> Result<()> {
        let tables = Tables::default();
        let game = game(json!({
            "floatPercent": 60,
            "tokenTypes": { "default": [0, 40, 100], "minor": [0], "big": [0, 0, 0, 0] },
            "shareTypes": { "default": [20, 10, 10], "minor": [100] },
            "companies": [
                { "abbrev": "PRR", "name": "Pennsylvania", "color": "red", "logo": true },
                { "abbrev": "M1", "minor": true, "color": "white" },
                { "abbrev": "B&O", "tokens": "big", "shares": [50, 50], "floatPercent": 50, "logo": "bo" },
                { "abbrev": "X", "tokens": "ghost", "color": "mauve" }
            ]
        }));
        let hexes: Vec<HexDefinition> = serde_json::from_value(json!([
            { "hexes": ["A1"], "cities": [{}] },
            { "hexes": ["F9", "F11"], "cities": [{ "companies": ["PRR"] }] }
        ]))?;

        let companies = companies(&game, &hexes, "18_test", &tables);
        let prr = &companies[0];
        assert_eq!(prr.float_percent, Some(60));
        assert_eq!(prr.token_type.as_deref(), Some("default"));
        assert_eq!(prr.tokens.len(), 3);
        assert_eq!(prr.tokens[1].label, json!(40));
        assert_eq!(prr.share_type.as_deref(), Some("default"));
        assert_eq!(prr.home.as_deref(), Some("F9"));
        assert_eq!(prr.color.as_deref(), Some("#d81e3e"));
        assert_eq!(prr.logo.as_deref(), Some("18_test/PRR"));

        let minor = &companies[1];
        assert_eq!(minor.token_type.as_deref(), Some("minor"));
        assert_eq!(minor.shares, vec![json!(100)]);
        assert_eq!(minor.color.as_deref(), Some("#9a9a9d"));
        assert_eq!(minor.home, None);
        assert_eq!(minor.logo, None);

        let bo = &companies[2];
        assert_eq!(bo.token_type.as_deref(), Some("big"));
        assert_eq!(bo.tokens.len(), 4);
        assert_eq!(bo.share_type, None);
        assert_eq!(bo.shares, vec![json!(50), json!(50)]);
        assert_eq!(bo.float_percent, Some(50));
        assert_eq!(bo.logo.as_deref(), Some("18_test/BO"));

        let unknown = &companies[3];
        assert_eq!(unknown.token_type.as_deref(), Some("ghost"));
        assert!(unknown.tokens.is_empty());
        assert_eq!(unknown.color.as_deref(), Some("mauve"));
        Ok(())
    }

    #[test]
    fn train_distance_defaults_from_name() -> Result<()> {
        let tables = Tables::default();
        let game = game(json!({ "trains": [
            { "name": "2", "price": 80, "quantity": 6, "rustsOn": "4" },
            { "name": "4D", "distance": 4, "quantity": "∞" },
            { "name": "D", "price": 1100, "discount": { "4": 300 } }
        ]}));
        let trains = trains(&game, &tables)?;
        assert_eq!(trains[0].distance, json!(2));
        assert_eq!(trains[0].num, Some(6));
        assert_eq!(trains[0].rusts_on, Some(json!("4")));
        assert_eq!(trains[1].num, Some(20));
        assert_eq!(trains[1].price, 0);
        assert_eq!(trains[2].distance, json!(999));
        assert_eq!(
            trains[2].discount,
            Some(vec![Discount { name: "4".into(), discount: json!(300) }])
        );
        Ok(())
    }

    #[test]
    fn phases_expand_tile_ceiling() {
        let tables = Tables::default();
        let game = game(json!({ "phases": [
            { "name": "2", "tiles": "yellow", "limit": 4 },
            { "train": "5", "tiles": "brown", "rounds": 3 },
            { "name": "8", "tiles": "gray" },
            { "name": "?", "tiles": "purple" }
        ]}));
        let phases = phases(&game, &tables);
        assert_eq!(phases[0].tiles, vec!["yellow"]);
        assert_eq!(phases[1].name.as_deref(), Some("5"));
        assert_eq!(phases[1].tiles, vec!["yellow", "green", "brown"]);
        assert_eq!(phases[2].tiles.len(), 4);
        assert!(phases[3].tiles.is_empty());
    }

    #[test]
    fn collects_location_names() -> Result<()> {
        let hexes: Vec<HexDefinition> = serde_json::from_value(json!([
            { "hexes": ["B3", "B5"], "cities": [{ "name": { "name": "Minneapolis" } }],
              "towns": [{ "name": { "name": "St. Paul" } }] },
            { "hexes": ["C1"], "offBoardRevenue": { "revenues": [], "name": { "name": "West" } } },
            { "hexes": ["D1"], "cities": [{}] },
            { "hexes": [], "cities": [{ "name": { "name": "Gone" } }] }
        ]))?;
        let names = location_names(&hexes);
        assert_eq!(
            names,
            vec![
                LocationName { coord: "B3".into(), name: "Minneapolis & St. Paul".into() },
                LocationName { coord: "C1".into(), name: "West".into() },
            ]
        );
        Ok(())
    }

    #[test]
    fn private_revenue_takes_first_entry() {
        let game = game(json!({ "privates": [
            { "name": "Camden & Amboy", "price": 160, "revenue": [25, 50], "minPlayers": 3 },
            { "name": "Schuylkill", "price": "20" }
        ]}));
        let privates = privates(&game);
        assert_eq!(privates[0].revenue, json!(25));
        assert_eq!(privates[0].min_players, Some(3));
        assert_eq!(privates[1].revenue, json!(0));
        assert_eq!(privates[1].value, json!("20"));
        assert_eq!(privates[1].description, "");
    }
}
