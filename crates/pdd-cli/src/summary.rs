//! Terminal summary tables for pipeline results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pdd_model::{IadlSource, ImpairmentRule, KappaDisplay};
use pdd_report::{MatrixMetric, matrix_table};

use crate::types::{DiagnoseResult, RunResult, VariantReport};

pub fn print_summary(result: &RunResult) {
    println!("Patients: {}", result.patients);
    if result.dry_run {
        println!("Output: (dry run, nothing written)");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    if !result.fluency_conflicts.is_empty() {
        println!(
            "Fluency conflicts (primary kept): {}",
            result.fluency_conflicts.join(", ")
        );
    }
    println!("{}", variant_table(&result.variants));
    for metric in [
        MatrixMetric::Kappa,
        MatrixMetric::Accuracy,
        MatrixMetric::Sensitivity,
        MatrixMetric::Specificity,
    ] {
        let display = match metric {
            MatrixMetric::Kappa => result.display,
            _ => KappaDisplay::Full,
        };
        println!();
        println!(
            "{}",
            matrix_table(&result.table, &result.ordered, metric, display)
        );
    }
    if !result.outputs.is_empty() {
        println!();
        println!("Written:");
        for path in &result.outputs {
            println!("- {}", path.display());
        }
    }
}

pub fn print_diagnose_summary(result: &DiagnoseResult) {
    println!("Patients: {}", result.patients);
    if result.dry_run {
        println!("Output: (dry run, nothing written)");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    println!("{}", variant_table(&result.variants));
    for path in &result.outputs {
        println!("- {}", path.display());
    }
}

fn variant_table(reports: &[VariantReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Rule"),
        header_cell("IADL"),
        header_cell("PDD+"),
        header_cell("N"),
        header_cell("Prevalence"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for report in reports {
        table.add_row(vec![
            Cell::new(&report.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(rule_label(report.rule)),
            iadl_cell(report.iadl_source),
            Cell::new(report.positives),
            Cell::new(report.patients),
            Cell::new(format!("{:.2}", report.prevalence)),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn rule_label(rule: ImpairmentRule) -> &'static str {
    match rule {
        ImpairmentRule::Original => "original (2 of 4)",
        ImpairmentRule::Moca => "moca (2 of 5)",
        ImpairmentRule::DirectGlobal => "direct global",
    }
}

pub fn iadl_cell(source: IadlSource) -> Cell {
    match source {
        IadlSource::Faq => Cell::new("FAQ").fg(Color::Red),
        IadlSource::Other => Cell::new("other").fg(Color::Blue),
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
