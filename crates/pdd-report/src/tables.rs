//! Terminal matrix tables for the pairwise statistics.
//!
//! Rows are predictors, columns references, both in prevalence order.
//! Kappa is symmetric under role exchange, so its matrix can blank one
//! triangle; the directional matrices always fill both.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pdd_concord::{ConcordanceTable, PairStatistics};
use pdd_model::KappaDisplay;

use crate::ordering::OrderedVariant;

/// Which pairwise metric a matrix table renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixMetric {
    Kappa,
    Accuracy,
    Sensitivity,
    Specificity,
}

impl MatrixMetric {
    pub fn title(self) -> &'static str {
        match self {
            MatrixMetric::Kappa => "Cohen's Kappa",
            MatrixMetric::Accuracy => "Accuracy",
            MatrixMetric::Sensitivity => "Sensitivity",
            MatrixMetric::Specificity => "Specificity",
        }
    }
}

/// Build the matrix table for one metric.
pub fn matrix_table(
    table: &ConcordanceTable,
    ordered: &[OrderedVariant],
    metric: MatrixMetric,
    display: KappaDisplay,
) -> Table {
    let mut rendered = Table::new();
    rendered
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec![header_cell(metric.title())];
    header.extend(ordered.iter().map(|variant| header_cell(&variant.name)));
    rendered.set_header(header);
    for column_index in 1..=ordered.len() {
        if let Some(column) = rendered.column_mut(column_index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    for (row_index, predictor) in ordered.iter().enumerate() {
        let mut row = vec![header_cell(&predictor.name)];
        for (column_index, reference) in ordered.iter().enumerate() {
            let pair = table.pair(&predictor.name, &reference.name);
            row.push(metric_cell(pair, metric, display, row_index, column_index));
        }
        rendered.add_row(row);
    }
    rendered
}

fn metric_cell(
    pair: Option<&PairStatistics>,
    metric: MatrixMetric,
    display: KappaDisplay,
    row_index: usize,
    column_index: usize,
) -> Cell {
    let Some(pair) = pair else {
        return dim_cell("-");
    };
    if pair.is_self_pair() {
        return match metric {
            MatrixMetric::Kappa | MatrixMetric::Accuracy => {
                Cell::new("1.00").add_attribute(Attribute::Dim)
            }
            _ => dim_cell("-"),
        };
    }
    match metric {
        MatrixMetric::Kappa => {
            // Upper triangle blanked: the value already appears mirrored
            // below the diagonal.
            if display == KappaDisplay::Triangle && row_index < column_index {
                return Cell::new("");
            }
            match pair.kappa {
                Some(interval) => Cell::new(format!(
                    "{:.2} [{:.2}, {:.2}]",
                    interval.estimate, interval.lower, interval.upper
                )),
                None => dim_cell("-"),
            }
        }
        MatrixMetric::Accuracy => match pair.accuracy {
            Some(interval) => {
                let star = if pair.significant { "*" } else { "" };
                let cell = Cell::new(format!("{:.2}{star}", interval.estimate));
                if pair.significant {
                    cell.fg(Color::Green)
                } else {
                    cell
                }
            }
            None => dim_cell("-"),
        },
        MatrixMetric::Sensitivity => value_cell(pair.sensitivity),
        MatrixMetric::Specificity => value_cell(pair.specificity),
    }
}

fn value_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.2}")),
        None => dim_cell("-"),
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
