//! Compiles one hex or tile into its `;`-joined feature string.
//!
//! Segments are emitted in a fixed order: junction, offboard, cities,
//! towns, paths, labels, terrain, border. A hex carrying a pre-set
//! `encoding` skips all of this.

use crate::{
    models::{HexDefinition, Layout, OffboardRevenue, Stop, Track},
    tables::Tables,
};

/// Track curvature relative to the entry side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Sharp,
    Gentle,
    Straight,
    /// Single-ended path into the hex center.
    Stub,
}

impl Curve {
    pub fn of(track: &Track) -> Self {
        match track.kind.as_deref() {
            Some("sharp") => Curve::Sharp,
            Some("gentle") => Curve::Gentle,
            Some("straight") => Curve::Straight,
            _ => Curve::Stub,
        }
    }

    /// Number of sides between the two ends.
    pub fn span(self) -> Option<i64> {
        match self {
            Curve::Sharp => Some(1),
            Curve::Gentle => Some(2),
            Curve::Straight => Some(3),
            Curve::Stub => None,
        }
    }
}

/// Zero-based side index for a 1-based declared side. Always in `0..6`.
pub fn side_index(side: i64, layout: Layout) -> i64 {
    let offset = if layout.is_flat() { 1 } else { 0 };
    (side - 1 + offset).rem_euclid(6)
}

/// Track only, no stop, no offboard, and no track declares a curvature.
pub fn is_junction(hex: &HexDefinition) -> bool {
    !hex.track.is_empty()
        && !hex.has_stops()
        && hex.off_board_revenue.is_none()
        && hex.track.iter().all(|track| track.kind.is_none())
}

#[derive(Debug, Clone, Copy)]
pub struct HexEncoder<'a> {
    tables: &'a Tables,
    layout: Layout,
}

impl<'a> HexEncoder<'a> {
    pub fn new(tables: &'a Tables, layout: Layout) -> Self {
        Self { tables, layout }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn encode(&self, hex: &HexDefinition) -> String {
        if let Some(encoding) = &hex.encoding {
            return encoding.clone();
        }

        let mut segments = Vec::new();
        if is_junction(hex) {
            segments.push("junction".to_string());
        }
        segments.extend(self.offboard(hex));
        segments.extend(self.cities(hex));
        segments.extend(self.towns(hex));
        segments.extend(self.paths(hex));
        segments.extend(hex.labels.iter().map(|label| format!("label={}", label.label)));
        segments.extend(self.terrain(hex));
        segments.extend(self.border(hex));
        segments.join(";")
    }

    fn offboard(&self, hex: &HexDefinition) -> Option<String> {
        if hex.has_stops() {
            return None;
        }
        let offboard = hex.off_board_revenue.as_ref()?;
        Some(format!(
            "offboard=revenue:{}{}",
            multi_revenue(offboard),
            groups(&offboard.groups)
        ))
    }

    fn cities(&self, hex: &HexDefinition) -> Vec<String> {
        hex.cities
            .iter()
            .enumerate()
            .map(|(index, city)| {
                let mut segment = format!("city=revenue:{}", stop_revenue(hex, index));
                if let Some(size) = city.size.filter(|size| *size > 1) {
                    segment.push_str(&format!(",slots:{size}"));
                }
                segment.push_str(&groups(&city.groups));
                segment
            })
            .collect()
    }

    fn towns(&self, hex: &HexDefinition) -> Vec<String> {
        hex.all_towns()
            .enumerate()
            .map(|(index, town): (usize, &Stop)| {
                format!(
                    "town=revenue:{}{}",
                    stop_revenue(hex, index),
                    groups(&town.groups)
                )
            })
            .collect()
    }

    fn paths(&self, hex: &HexDefinition) -> Vec<String> {
        let revenue_locations =
            hex.values.len() + usize::from(hex.off_board_revenue.is_some());

        hex.track
            .iter()
            .enumerate()
            .flat_map(|(index, track)| {
                // A lone revenue location is reached through the stop itself,
                // so paths only route through a center when there are several.
                let revenue = (revenue_locations > 1).then(|| index % revenue_locations);
                let gauge = track
                    .gauge
                    .as_deref()
                    .filter(|gauge| !gauge.is_empty())
                    .map(|gauge| format!(",track:{gauge}"))
                    .unwrap_or_default();
                self.track_sides(track, revenue)
                    .into_iter()
                    .map(move |sides| format!("path={sides}{gauge}"))
            })
            .collect()
    }

    /// Side-pair strings for one track entry.
    pub fn track_sides(&self, track: &Track, revenue: Option<usize>) -> Vec<String> {
        let side = track.side.unwrap_or(1);
        let a = side_index(side, self.layout);

        match (Curve::of(track).span(), revenue) {
            (Some(span), Some(rev)) => {
                let b = side_index(side + span, self.layout);
                vec![
                    format!("a:{},b:_{rev}", a.min(b)),
                    format!("a:_{rev},b:{}", a.max(b)),
                ]
            }
            (Some(span), None) => {
                let b = side_index(side + span, self.layout);
                vec![format!("a:{},b:{}", a.min(b), a.max(b))]
            }
            (None, Some(rev)) => vec![format!("a:{a},b:_{rev}")],
            (None, None) => vec![format!("a:{a},b:_0")],
        }
    }

    fn terrain(&self, hex: &HexDefinition) -> Option<String> {
        let mut kinds: Vec<String> = Vec::new();
        for kind in hex.terrain.iter().filter_map(|terrain| terrain.kind.as_deref()) {
            let mapped = self.tables.terrain(kind);
            if !kinds.contains(&mapped) {
                kinds.push(mapped);
            }
        }

        let mut parts = Vec::new();
        if let Some(cost) = hex.terrain.iter().find_map(|terrain| terrain.cost.as_ref()) {
            parts.push(format!("upgrade=cost:{cost}"));
        }
        if !kinds.is_empty() {
            parts.push(format!("terrain:{}", kinds.join("+")));
        }

        (!parts.is_empty()).then(|| parts.join(","))
    }

    fn border(&self, hex: &HexDefinition) -> Option<String> {
        let first = *hex.remove_borders.first()?;
        let offset = if self.layout.is_flat() { 1 } else { 0 };
        Some(format!("border=edge:{}", (first - offset).rem_euclid(6)))
    }
}

/// Revenue for the stop at `index`: its positional value, the first value,
/// the hex's offboard revenue, or zero.
fn stop_revenue(hex: &HexDefinition, index: usize) -> String {
    hex.values
        .get(index)
        .or_else(|| hex.values.first())
        .map(|value| value.value.to_string())
        .or_else(|| hex.off_board_revenue.as_ref().map(multi_revenue))
        .unwrap_or_else(|| "0".to_string())
}

fn multi_revenue(offboard: &OffboardRevenue) -> String {
    let mut revenue = offboard
        .revenues
        .iter()
        .map(|entry| {
            let amount = entry.amount();
            match amount.diesel_cost() {
                Some(cost) => format!("diesel_{cost}"),
                None => format!("{}_{amount}", entry.color.as_deref().unwrap_or_default()),
            }
        })
        .collect::<Vec<_>>()
        .join("|");
    if offboard.hidden {
        revenue.push_str(",hide:1");
    }
    revenue
}

fn groups(groups: &[String]) -> String {
    if groups.is_empty() {
        String::new()
    } else {
        format!(",groups:{}", groups.join("|"))
    }
}
