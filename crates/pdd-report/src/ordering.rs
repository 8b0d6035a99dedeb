//! Display ordering of criteria variants.

use std::cmp::Ordering;

use pdd_concord::VariantLabels;
use pdd_model::{IadlSource, ResolvedVariant};

/// One variant in display order, with the attributes the matrix axes need.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedVariant {
    pub name: String,
    /// Pooled positive-diagnosis prevalence.
    pub prevalence: f64,
    /// Drives the axis-label color coding.
    pub iadl_source: IadlSource,
}

/// Rank variants by descending prevalence of positive diagnosis, ties
/// broken by name so the ordering is deterministic.
pub fn order_by_prevalence(
    labels: &VariantLabels,
    variants: &[ResolvedVariant],
) -> Vec<OrderedVariant> {
    let mut ordered: Vec<OrderedVariant> = labels
        .variants()
        .iter()
        .map(|name| OrderedVariant {
            name: name.clone(),
            prevalence: labels.prevalence(name).unwrap_or(0.0),
            iadl_source: variants
                .iter()
                .find(|variant| variant.name == *name)
                .map(|variant| variant.iadl_source)
                .unwrap_or_default(),
        })
        .collect();
    ordered.sort_by(|a, b| {
        match b
            .prevalence
            .partial_cmp(&a.prevalence)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => a.name.cmp(&b.name),
            unequal => unequal,
        }
    });
    ordered
}
