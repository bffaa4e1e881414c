//! Text rendering of an analog clock for monospace chat messages.
//!
//! The dial is drawn on a character grid twice as wide as it is tall so it
//! looks round in most fonts. Numerals sit on the rim, the minute hand is
//! drawn with `*`, the hour hand with `#`, and the center with `o`.

use crate::quiz::ClockTime;

const RADIUS: f64 = 5.0;
const ROWS: usize = 11;
const COLS: usize = 22;
const CENTER_ROW: usize = 5;
const CENTER_COL: usize = 10;

const MINUTE_HAND: f64 = 0.85;
const HOUR_HAND: f64 = 0.55;
const HAND_STEPS: usize = 20;

/// Render `time` as a multi-line clock face.
pub fn render(time: ClockTime) -> String {
    let mut grid = vec![vec![' '; COLS]; ROWS];

    for numeral in 1..=12u32 {
        let (row, col) = cell(f64::from(numeral) * 30.0, RADIUS);
        for (offset, digit) in numeral.to_string().chars().enumerate() {
            if let Some(slot) = grid.get_mut(row).and_then(|r| r.get_mut(col + offset)) {
                *slot = digit;
            }
        }
    }

    let angles = time.hand_angles();
    draw_hand(&mut grid, angles.minute, RADIUS * MINUTE_HAND, '*');
    draw_hand(&mut grid, angles.hour, RADIUS * HOUR_HAND, '#');
    grid[CENTER_ROW][CENTER_COL] = 'o';

    grid.iter()
        .map(|row| row.iter().collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn draw_hand(grid: &mut [Vec<char>], degrees: f64, length: f64, mark: char) {
    for step in 1..=HAND_STEPS {
        let (row, col) = cell(degrees, length * step as f64 / HAND_STEPS as f64);
        if let Some(slot) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            if !slot.is_ascii_digit() {
                *slot = mark;
            }
        }
    }
}

/// Grid cell at `distance` rows from the center along `degrees` (clockwise from 12).
fn cell(degrees: f64, distance: f64) -> (usize, usize) {
    let radians = degrees.to_radians();
    let row = CENTER_ROW as f64 - (radians.cos() * distance).round();
    let col = CENTER_COL as f64 + (radians.sin() * distance * 2.0).round();
    (row.max(0.0) as usize, col.max(0.0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(face: &str, row: usize, col: usize) -> char {
        face.lines()
            .nth(row)
            .and_then(|line| line.chars().nth(col))
            .unwrap_or(' ')
    }

    #[test]
    fn dial_has_all_numerals() {
        let face = render(ClockTime::new(12, 0));
        assert_eq!(face.lines().count(), ROWS);
        assert_eq!(face.lines().next().map(str::trim), Some("12"));
        for numeral in 1..=12 {
            assert!(face.contains(&numeral.to_string()), "missing {numeral}");
        }
        assert_eq!(at(&face, CENTER_ROW, CENTER_COL), 'o');
        assert_eq!(at(&face, CENTER_ROW, 0), '9');
        assert_eq!(at(&face, CENTER_ROW, 20), '3');
    }

    #[test]
    fn three_oclock_points_right_and_up() {
        let face = render(ClockTime::new(3, 0));
        assert_eq!(at(&face, CENTER_ROW, CENTER_COL + 2), '#');
        assert_eq!(at(&face, CENTER_ROW - 1, CENTER_COL), '*');
        assert_eq!(at(&face, CENTER_ROW + 1, CENTER_COL), ' ');
    }

    #[test]
    fn half_past_points_minute_hand_down() {
        let face = render(ClockTime::new(9, 30));
        assert_eq!(at(&face, CENTER_ROW + 2, CENTER_COL), '*');
        assert_eq!(at(&face, CENTER_ROW - 2, CENTER_COL), ' ');
    }

    #[test]
    fn quarter_to_points_minute_hand_left() {
        let face = render(ClockTime::new(11, 45));
        assert_eq!(at(&face, CENTER_ROW, CENTER_COL - 4), '*');
    }
}
