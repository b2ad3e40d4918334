use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};

use crate::PricePoint;

fn clear_terminal() {
    println!("{}c", 27 as char);
}

/// One table row per point: time, price and change from the previous point.
fn history_rows(history: &[PricePoint]) -> Vec<(String, String, String)> {
    let mut previous: Option<f64> = None;

    history
        .iter()
        .map(|point| {
            let change = match previous {
                Some(previous) if previous != 0.0 => {
                    format!("{:+.4}%", (point.price - previous) / previous * 100.0)
                }
                _ => "-".to_string(),
            };
            previous = Some(point.price);

            (point.time.to_string(), format!("{:.6}", point.price), change)
        })
        .collect()
}

pub fn print_history_as_table(history: &[PricePoint]) {
    clear_terminal();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Time (epoch, UTC)"),
            Cell::new("BTC/ETH").fg(Color::Green),
            Cell::new("Change"),
        ]);

    for (time, price, change) in history_rows(history) {
        table.add_row(vec![time, price, change]);
    }

    match history.last() {
        Some(latest) => println!("Latest BTC/ETH price: {}", latest.price),
        None => println!("No samples yet"),
    }
    println!("{}", table);
}
