//! Read-time presentation of theatres.
//!
//! Only `total_screens` is stored. Screens and their seat maps are rebuilt on
//! every read from a fixed 10 x 12 grid whose last three rows are premium.

use serde::{Deserialize, Serialize};

use crate::models::Theatre;

pub const GRID_ROWS: u8 = 10;
pub const SEATS_PER_ROW: u8 = 12;
pub const PREMIUM_ROWS: u8 = 3;

/// Capacity of one screen laid out on the standard grid.
pub const DEFAULT_SHOW_CAPACITY: i32 = GRID_ROWS as i32 * SEATS_PER_ROW as i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatTier {
    Regular,
    Premium,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatCell {
    pub label: String,
    pub number: u8,
    pub tier: SeatTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatRow {
    pub row: String,
    pub seats: Vec<SeatCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub screen_number: i32,
    pub seat_map: Vec<SeatRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheatreView {
    #[serde(flatten)]
    pub theatre: Theatre,
    pub screens: Vec<Screen>,
}

impl From<Theatre> for TheatreView {
    fn from(theatre: Theatre) -> Self {
        let screens = screens_for(theatre.total_screens);
        TheatreView { theatre, screens }
    }
}

fn row_letter(index: u8) -> char {
    (b'A' + index) as char
}

pub fn seat_grid() -> Vec<SeatRow> {
    (0..GRID_ROWS)
        .map(|r| {
            let letter = row_letter(r);
            let tier = if r >= GRID_ROWS - PREMIUM_ROWS {
                SeatTier::Premium
            } else {
                SeatTier::Regular
            };
            let seats = (1..=SEATS_PER_ROW)
                .map(|n| SeatCell {
                    label: format!("{}{}", letter, n),
                    number: n,
                    tier,
                })
                .collect();
            SeatRow {
                row: letter.to_string(),
                seats,
            }
        })
        .collect()
}

pub fn screens_for(total_screens: i32) -> Vec<Screen> {
    (1..=total_screens.max(0))
        .map(|screen_number| Screen {
            screen_number,
            seat_map: seat_grid(),
        })
        .collect()
}
