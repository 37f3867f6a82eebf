//! Normalises game-wide economic fields.
//!
//! Bank size, certificate limit and starting cash are either declared once
//! for the whole game or per player count in `players[]`. Both shapes are
//! preserved in the output.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    error::Result,
    models::{Amount, GameDefinition, Layout, PlayerDefinition, PlayerValue},
    tables::Tables,
};

/// Currency format used when a game declares none.
pub const DEFAULT_CURRENCY: &str = "$%d";
/// Placeholder for the amount inside a declared currency.
pub const CURRENCY_PLACEHOLDER: char = '#';
/// Numeric format token substituted for the placeholder.
pub const NUMBER_FORMAT: &str = "%d";
/// Capitalization used when a game declares none.
pub const DEFAULT_CAPITALIZATION: &str = "full";

/// Resolves bank, certificate limit and starting cash.
#[derive(Debug, Clone, Copy)]
pub struct DataNormalizer<'a> {
    tables: &'a Tables,
}

impl<'a> DataNormalizer<'a> {
    /// Normaliser backed by `tables`.
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    /// Bank size; an unlimited bank becomes the fixed sentinel.
    pub fn bank(&self, game: &GameDefinition) -> Result<PlayerValue> {
        per_player(
            "bank",
            game.bank.as_ref(),
            &game.players,
            |player| player.bank.as_ref(),
            Some(self.tables.unlimited_bank),
        )
    }

    /// Certificate limit.
    pub fn cert_limit(&self, game: &GameDefinition) -> Result<PlayerValue> {
        per_player(
            "certLimit",
            game.cert_limit.as_ref(),
            &game.players,
            |player| player.cert_limit.as_ref(),
            None,
        )
    }

    /// Starting cash, read from `capital`.
    pub fn starting_cash(&self, game: &GameDefinition) -> Result<PlayerValue> {
        per_player(
            "capital",
            game.capital.as_ref(),
            &game.players,
            |player| player.capital.as_ref(),
            None,
        )
    }
}

fn per_player<'g>(
    field: &str,
    scalar: Option<&Amount>,
    players: &'g [PlayerDefinition],
    pick: impl Fn(&'g PlayerDefinition) -> Option<&'g Amount>,
    unlimited: Option<i64>,
) -> Result<PlayerValue> {
    if let Some(scalar) = scalar {
        return Ok(PlayerValue::Scalar(scalar.resolve(field, unlimited)?));
    }

    let mut table = BTreeMap::new();
    for player in players {
        match pick(player) {
            Some(amount) => {
                let field = format!("players[{}].{field}", player.number);
                table.insert(player.number, amount.resolve(&field, unlimited)?);
            }
            None => debug!(player = player.number, field, "player entry omits field"),
        }
    }
    Ok(PlayerValue::PerPlayer(table))
}

/// Currency format string with the placeholder replaced by `%d`.
pub fn currency(game: &GameDefinition) -> String {
    game.info
        .as_ref()
        .and_then(|info| info.currency.as_deref())
        .map(|currency| currency.replacen(CURRENCY_PLACEHOLDER, NUMBER_FORMAT, 1))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

/// Declared capitalization, default `full`.
pub fn capitalization(game: &GameDefinition) -> String {
    game.info
        .as_ref()
        .and_then(|info| info.capitalization.clone())
        .unwrap_or_else(|| DEFAULT_CAPITALIZATION.to_string())
}

/// Whether shares must be sold in blocks.
pub fn must_sell_in_blocks(game: &GameDefinition) -> bool {
    game.info
        .as_ref()
        .and_then(|info| info.must_sell_in_blocks)
        .unwrap_or(false)
}

/// `horizontal` boards are flat-topped; everything else is pointy.
pub fn layout(game: &GameDefinition) -> Layout {
    match game.info.as_ref().and_then(|info| info.orientation.as_deref()) {
        Some("horizontal") => Layout::Flat,
        Some("vertical") | None => Layout::Pointy,
        Some(other) => {
            warn!(orientation = other, "unknown orientation, using pointy layout");
            Layout::Pointy
        }
    }
}
