use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use chd_model::{ReconciliationConfig, ReconciliationReport};
use chd_score::{BatchResult, Direction, ModelMeta, Prediction, RiskBand, TopFactor};

/// Rows shown on screen for a scored batch; `--output` has them all.
const BATCH_PREVIEW_ROWS: usize = 20;

pub fn print_schema(config: &ReconciliationConfig) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Feature"),
        header_cell("Kind"),
        header_cell("Range"),
        header_cell("Synonyms"),
    ]);
    apply_table_style(&mut table);
    for feature in config.schema().features() {
        let range = match config.ranges().get(&feature.name) {
            Some(range) => Cell::new(format!("[{}, {}]", range.low, range.high)),
            None => dim_cell("-"),
        };
        let aliases = config.synonyms().aliases_for(&feature.name);
        let synonyms = if aliases.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(aliases.join(", "))
        };
        table.add_row(vec![
            Cell::new(&feature.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(feature.kind.as_str()),
            range,
            synonyms,
        ]);
    }
    println!("{table}");
    if !config.unit_rules().is_empty() {
        println!();
        println!("Unit rules:");
        for rule in config.unit_rules() {
            println!("- {}", rule.describe());
        }
    }
    println!();
    println!("Passthrough: {}", config.passthrough().join(", "));
}

pub fn print_report(config: &ReconciliationConfig, report: &ReconciliationReport, rows: usize) {
    println!("Rows: {rows}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Feature"),
        header_cell("Source"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for name in config.schema().names() {
        let (source, status) = match report.source_of(name) {
            Some(source) => (Cell::new(source), Cell::new("mapped").fg(Color::Green)),
            None if report.missing_inserted.iter().any(|m| m == name) => {
                (dim_cell("-"), Cell::new("inserted").fg(Color::Yellow))
            }
            None => (dim_cell("-"), Cell::new("derived").fg(Color::Cyan)),
        };
        table.add_row(vec![Cell::new(name), source, status]);
    }
    println!("{table}");

    if !report.extras_dropped.is_empty() {
        println!();
        println!("Dropped columns:");
        for header in &report.extras_dropped {
            match report.suggestions.get(header) {
                Some(feature) => println!("- {header} (did you mean {feature}?)"),
                None => println!("- {header}"),
            }
        }
    }
    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("- {warning}");
        }
    }
}

pub fn print_prediction(prediction: &Prediction) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new("Probability"),
        Cell::new(format!("{:.4}", prediction.probability)),
    ]);
    table.add_row(vec![
        Cell::new("Prediction"),
        Cell::new(prediction.prediction),
    ]);
    table.add_row(vec![
        Cell::new("Threshold"),
        Cell::new(prediction.threshold),
    ]);
    table.add_row(vec![Cell::new("Risk band"), band_cell(prediction.risk_band)]);
    table.add_row(vec![
        Cell::new("Model"),
        Cell::new(&prediction.model_version),
    ]);
    table.add_row(vec![
        Cell::new("Top factors"),
        Cell::new(factors_text(&prediction.top_factors)),
    ]);
    println!("{table}");
}

pub fn print_batch(batch: &BatchResult) {
    println!("Batch: {}", batch.batch_id);
    println!("Model: {}", batch.model_version);
    println!(
        "Rows: {} ({} at or above threshold {})",
        batch.rows.len(),
        batch.positives(),
        batch.threshold
    );
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(
        batch
            .passthrough_columns
            .iter()
            .map(|name| header_cell(name.as_str())),
    );
    header.extend([
        header_cell("Probability"),
        header_cell("Positive"),
        header_cell("Band"),
        header_cell("Top factors"),
    ]);
    table.set_header(header);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, row) in batch.rows.iter().take(BATCH_PREVIEW_ROWS).enumerate() {
        let mut cells = vec![dim_cell(idx + 1)];
        cells.extend(row.passthrough.iter().map(|value| match value {
            Some(value) => Cell::new(value),
            None => dim_cell("-"),
        }));
        cells.extend([
            Cell::new(format!("{:.4}", row.probability)),
            if row.prediction {
                Cell::new("yes").fg(Color::Red).add_attribute(Attribute::Bold)
            } else {
                dim_cell("no")
            },
            band_cell(row.risk_band),
            Cell::new(factors_text(&row.top_factors)),
        ]);
        table.add_row(cells);
    }
    println!("{table}");
    if batch.rows.len() > BATCH_PREVIEW_ROWS {
        println!(
            "... {} more rows (use --output to write them all)",
            batch.rows.len() - BATCH_PREVIEW_ROWS
        );
    }
}

pub fn print_meta(meta: &ModelMeta) {
    println!("Model: {}", meta.model_version);
    println!("Threshold: {}", meta.threshold);
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Expected column")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, column) in meta.expected_columns.iter().enumerate() {
        table.add_row(vec![dim_cell(idx + 1), Cell::new(column)]);
    }
    println!("{table}");
}

fn factors_text(factors: &[TopFactor]) -> String {
    if factors.is_empty() {
        return "-".to_string();
    }
    factors
        .iter()
        .map(|factor| {
            let arrow = match factor.direction {
                Direction::RaisesRisk => "+",
                Direction::LowersRisk => "-",
            };
            format!("{}{arrow}", factor.feature)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn band_cell(band: RiskBand) -> Cell {
    let color = match band {
        RiskBand::Low => Color::Green,
        RiskBand::Medium => Color::Yellow,
        RiskBand::High => Color::Red,
    };
    Cell::new(band).fg(color).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
