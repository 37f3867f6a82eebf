//! Flattens a game's map variations into one list of hexes.
//!
//! A variation may start from another variation's hexes (`copy: k`), strip
//! coordinates (`remove`), and individual hexes may inherit the features of
//! another hex by coordinate (`copy: "A1"`).

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{CompileError, Result},
    models::{GameDefinition, HexDefinition, MapDefinition, MapLayout},
};

/// Resolve the hexes of `variation` into a flat, copy-free list.
///
/// A game without a map yields no hexes. A non-array map is used whatever
/// the requested index.
pub fn resolve_hexes(game: &GameDefinition, variation: usize) -> Result<Vec<HexDefinition>> {
    let (maps, selected) = match &game.map {
        None => return Ok(Vec::new()),
        Some(MapLayout::Single(map)) => (std::slice::from_ref(map), 0),
        Some(MapLayout::Variations(maps)) => (maps.as_slice(), variation),
    };

    let map = maps.get(selected).ok_or_else(|| {
        CompileError::malformed(
            "map",
            format!(
                "variation {selected} requested but only {} defined",
                maps.len()
            ),
        )
    })?;

    let mut hexes = inherited_hexes(maps, selected, map);
    let own: &[HexDefinition] = match (&map.hexes, map.copy) {
        (Some(own), _) => own.as_slice(),
        (None, Some(_)) => &[],
        (None, None) => {
            return Err(CompileError::malformed(
                format!("map[{selected}].hexes"),
                "map declares no hexes",
            ))
        }
    };
    hexes.extend(tagged(own, selected));

    let mut hexes = resolve_copies(hexes)?;
    remove_coordinates(&mut hexes, &map.remove);
    debug!(variation = selected, count = hexes.len(), "resolved map hexes");
    Ok(hexes)
}

fn inherited_hexes(
    maps: &[MapDefinition],
    selected: usize,
    map: &MapDefinition,
) -> Vec<HexDefinition> {
    let Some(source) = map.copy else {
        return Vec::new();
    };

    match maps.get(source).filter(|_| source != selected) {
        Some(base) => tagged(base.hexes.as_deref().unwrap_or_default(), source).collect(),
        None => {
            let err = CompileError::UnresolvedReference {
                kind: "variation",
                reference: source.to_string(),
            };
            warn!("{err}; ignoring map copy");
            Vec::new()
        }
    }
}

fn tagged(
    hexes: &[HexDefinition],
    variation: usize,
) -> impl Iterator<Item = HexDefinition> + '_ {
    hexes.iter().cloned().map(move |mut hex| {
        hex.variation = Some(variation);
        hex
    })
}

fn remove_coordinates(hexes: &mut [HexDefinition], remove: &[String]) {
    if remove.is_empty() {
        return;
    }
    let remove: HashSet<&str> = remove.iter().map(String::as_str).collect();
    for hex in hexes {
        hex.hexes.retain(|coord| !remove.contains(coord.as_str()));
    }
}

/// Replace every hex carrying a `copy` reference with the merge of the
/// referenced hex and its own fields.
///
/// References are looked up through a coordinate index, so they may point
/// forwards or backwards. Dangling and cyclic references leave the hex as
/// it was declared.
pub fn resolve_copies(hexes: Vec<HexDefinition>) -> Result<Vec<HexDefinition>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (position, hex) in hexes.iter().enumerate() {
        for coord in &hex.hexes {
            index.entry(coord.as_str()).or_insert(position);
        }
    }

    let mut resolver = CopyResolver {
        hexes: &hexes,
        index,
        resolved: vec![None; hexes.len()],
        visiting: HashSet::new(),
    };
    (0..hexes.len())
        .map(|position| resolver.resolve(position))
        .collect()
}

struct CopyResolver<'a> {
    hexes: &'a [HexDefinition],
    index: HashMap<&'a str, usize>,
    resolved: Vec<Option<HexDefinition>>,
    visiting: HashSet<usize>,
}

impl CopyResolver<'_> {
    fn resolve(&mut self, position: usize) -> Result<HexDefinition> {
        if let Some(hex) = &self.resolved[position] {
            return Ok(hex.clone());
        }

        let hexes = self.hexes;
        let hex = &hexes[position];
        let result = match hex.copy.as_deref() {
            None => hex.clone(),
            Some(reference) => match self.target(position, reference) {
                Ok(target) => {
                    self.visiting.insert(position);
                    let base = self.resolve(target);
                    self.visiting.remove(&position);
                    let mut merged = merge(&base?, hex)?;
                    merged.copy = None;
                    merged
                }
                Err(err) => {
                    warn!(coords = ?hex.hexes, "{err}; keeping partial hex");
                    hex.clone()
                }
            },
        };

        self.resolved[position] = Some(result.clone());
        Ok(result)
    }

    fn target(&self, position: usize, reference: &str) -> Result<usize> {
        let unresolved = || CompileError::UnresolvedReference {
            kind: "hex",
            reference: reference.to_string(),
        };
        let target = *self.index.get(reference).ok_or_else(unresolved)?;
        if target == position || self.visiting.contains(&target) {
            return Err(unresolved());
        }
        Ok(target)
    }
}

/// Deep merge: fields declared on `overlay` win, nested objects merge.
fn merge(base: &HexDefinition, overlay: &HexDefinition) -> Result<HexDefinition> {
    let mut merged = serde_json::to_value(base)?;
    merge_values(&mut merged, serde_json::to_value(overlay)?);
    Ok(serde_json::from_value(merged)?)
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game(map: Value) -> GameDefinition {
        serde_json::from_value(json!({ "info": { "title": "Test" }, "map": map }))
            .expect("valid game fixture")
    }

    fn coords(hexes: &[HexDefinition]) -> Vec<Vec<&str>> {
        hexes
            .iter()
            .map(|hex| hex.hexes.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn mapless_game_has_no_hexes() -> Result<()> {
        assert!(resolve_hexes(&GameDefinition::default(), 3)?.is_empty());
        Ok(())
    }

    #[test]
    fn single_map_is_tagged_with_variation_zero() -> Result<()> {
        let game = game(json!({ "hexes": [{ "color": "plain", "hexes": ["A1"] }] }));
        let hexes = resolve_hexes(&game, 2)?;
        assert_eq!(hexes.len(), 1);
        assert_eq!(hexes[0].variation, Some(0));
        Ok(())
    }

    #[test]
    fn missing_hexes_is_malformed() {
        let game = game(json!({ "name": "Empty" }));
        assert!(matches!(
            resolve_hexes(&game, 0),
            Err(CompileError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn out_of_range_variation_is_malformed() {
        let game = game(json!([{ "hexes": [] }]));
        assert!(matches!(
            resolve_hexes(&game, 1),
            Err(CompileError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn variation_copy_prepends_base_hexes() -> Result<()> {
        let game = game(json!([
            { "hexes": [{ "hexes": ["A1"] }, { "hexes": ["B2"] }] },
            { "copy": 0, "hexes": [{ "hexes": ["C3"], "color": "gray" }] }
        ]));
        let hexes = resolve_hexes(&game, 1)?;
        assert_eq!(coords(&hexes), vec![vec!["A1"], vec!["B2"], vec!["C3"]]);
        let tags: Vec<_> = hexes.iter().map(|hex| hex.variation).collect();
        assert_eq!(tags, vec![Some(0), Some(0), Some(1)]);
        Ok(())
    }

    #[test]
    fn dangling_variation_copy_is_ignored() -> Result<()> {
        let game = game(json!([{ "copy": 7, "hexes": [{ "hexes": ["A1"] }] }]));
        assert_eq!(coords(&resolve_hexes(&game, 0)?), vec![vec!["A1"]]);
        Ok(())
    }

    #[test]
    fn remove_strips_coordinates_but_keeps_hexes() -> Result<()> {
        let game = game(json!([
            { "hexes": [{ "hexes": ["A1", "A2"] }, { "hexes": ["B1"] }] },
            { "copy": 0, "remove": ["A1", "B1"] }
        ]));
        let hexes = resolve_hexes(&game, 1)?;
        assert_eq!(coords(&hexes), vec![vec!["A2"], Vec::<&str>::new()]);
        Ok(())
    }

    #[test]
    fn hex_copy_inherits_and_overrides() -> Result<()> {
        let game = game(json!({ "hexes": [
            { "hexes": ["D4"], "copy": "B2", "labels": [{ "label": "Y" }] },
            {
                "hexes": ["B2"],
                "color": "yellow",
                "cities": [{ "size": 2 }],
                "labels": [{ "label": "OO" }]
            }
        ]}));
        let hexes = resolve_hexes(&game, 0)?;
        let copy = &hexes[0];
        assert_eq!(copy.hexes, vec!["D4"]);
        assert_eq!(copy.color.as_deref(), Some("yellow"));
        assert_eq!(copy.cities.len(), 1);
        assert_eq!(copy.labels[0].label, "Y");
        assert_eq!(copy.copy, None);
        Ok(())
    }

    #[test]
    fn copy_chains_resolve_out_of_order() -> Result<()> {
        let hexes: Vec<HexDefinition> = serde_json::from_value(json!([
            { "hexes": ["A1"], "copy": "B1" },
            { "hexes": ["B1"], "copy": "C1", "labels": [{ "label": "B" }] },
            { "hexes": ["C1"], "color": "brown", "values": [{ "value": 50 }] }
        ]))?;
        let resolved = resolve_copies(hexes)?;
        assert_eq!(resolved[0].color.as_deref(), Some("brown"));
        assert_eq!(resolved[0].labels[0].label, "B");
        assert_eq!(resolved[1].values.len(), 1);
        assert!(resolved.iter().all(|hex| hex.copy.is_none()));
        Ok(())
    }

    #[test]
    fn dangling_and_cyclic_copies_pass_through() -> Result<()> {
        let hexes: Vec<HexDefinition> = serde_json::from_value(json!([
            { "hexes": ["A1"], "copy": "Z9", "color": "gray" },
            { "hexes": ["B1"], "copy": "C1" },
            { "hexes": ["C1"], "copy": "B1", "color": "green" },
            { "hexes": ["D1"], "copy": "D1" }
        ]))?;
        let resolved = resolve_copies(hexes.clone())?;
        assert_eq!(resolved[0], hexes[0]);
        assert_eq!(resolved[3], hexes[3]);
        // The cycle is cut where it closes; B1 still picks up C1's color.
        assert_eq!(resolved[1].color.as_deref(), Some("green"));
        assert_eq!(resolved[2], hexes[2]);
        Ok(())
    }
}
