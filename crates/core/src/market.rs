//! Stock market grid compilation.

use tracing::warn;

use crate::models::{
    GameDefinition, MarketCell, MarketCellDefinition, MarketLayout, MarketRow,
};

/// Legend suffixes, indexed by a cell's `legend`.
const LEGEND_SUFFIXES: [&str; 3] = ["y", "o", "b"];

/// Compile the market into rows. A 1-D market becomes a single row; a game
/// without a market has no rows.
pub fn compile_market(game: &GameDefinition) -> Vec<MarketRow> {
    let Some(market) = game.stock.as_ref().and_then(|stock| stock.market.as_ref()) else {
        return Vec::new();
    };

    match market {
        // `[]` has no first element, so it is a (empty) 1-D row.
        MarketLayout::Grid(rows) if rows.is_empty() => vec![compile_row(&[])],
        MarketLayout::Grid(rows) => rows.iter().map(|row| compile_row(row)).collect(),
        MarketLayout::Row(row) => vec![compile_row(row)],
    }
}

fn compile_row(row: &[Option<MarketCellDefinition>]) -> MarketRow {
    let cells: Vec<MarketCell> = row
        .iter()
        .map(|cell| match cell {
            Some(cell) => MarketCell::Price(compile_cell(cell)),
            None => MarketCell::Empty,
        })
        .collect();
    let has_empty = cells.iter().any(|cell| matches!(cell, MarketCell::Empty));
    MarketRow { cells, has_empty }
}

/// Display string of one present cell.
pub fn compile_cell(cell: &MarketCellDefinition) -> String {
    match cell {
        MarketCellDefinition::Number(value) => value.to_string(),
        MarketCellDefinition::Text(text) => text.clone(),
        MarketCellDefinition::Detailed {
            value,
            label,
            par,
            legend,
        } => {
            let mut display = value
                .as_ref()
                .map(ToString::to_string)
                .or_else(|| label.clone())
                .unwrap_or_default();
            if *par {
                display.push('p');
            }
            if let Some(legend) = legend {
                match LEGEND_SUFFIXES.get(*legend) {
                    Some(suffix) => display.push_str(suffix),
                    None => warn!(legend, "market legend index out of range"),
                }
            }
            display
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn market(value: serde_json::Value) -> Vec<MarketRow> {
        let game: GameDefinition =
            serde_json::from_value(json!({ "stock": { "market": value } })).expect("valid market");
        compile_market(&game)
    }

    fn display(row: &MarketRow) -> Vec<Option<&str>> {
        row.cells
            .iter()
            .map(|cell| match cell {
                MarketCell::Price(price) => Some(price.as_str()),
                MarketCell::Empty => None,
            })
            .collect()
    }

    #[test]
    fn one_dimensional_market_is_one_row() {
        let rows = market(json!([60, 70, "80p", { "value": 90, "par": true, "legend": 1 }]));
        assert_eq!(rows.len(), 1);
        assert_eq!(
            display(&rows[0]),
            vec![Some("60"), Some("70"), Some("80p"), Some("90po")]
        );
        assert!(!rows[0].has_empty);
    }

    #[test]
    fn grid_preserves_row_lengths_and_marks_holes() {
        let rows = market(json!([
            [60, 70, 80, 90],
            [55, 65, null],
            [{ "label": "close" }]
        ]));
        let lengths: Vec<_> = rows.iter().map(|row| row.cells.len()).collect();
        assert_eq!(lengths, vec![4, 3, 1]);
        assert!(!rows[0].has_empty);
        assert!(rows[1].has_empty);
        assert_eq!(display(&rows[1])[2], None);
        assert_eq!(display(&rows[2]), vec![Some("close")]);
    }

    #[test]
    fn empty_market_is_one_empty_row() {
        let rows = market(json!([]));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].cells.is_empty());
    }

    #[test]
    fn missing_market_has_no_rows() {
        assert!(compile_market(&GameDefinition::default()).is_empty());
    }

    #[test]
    fn out_of_range_legend_is_dropped() {
        let cell = MarketCellDefinition::Detailed {
            value: Some(crate::models::Amount::Number(100)),
            label: None,
            par: false,
            legend: Some(7),
        };
        assert_eq!(compile_cell(&cell), "100");
    }
}
