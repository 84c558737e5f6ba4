//! Income, expense and cashflow totals.

mod aggregation;
mod endpoints;

pub use aggregation::{CategoryTotal, Totals, group_by_category, totals};
pub use endpoints::{get_category_breakdown_endpoint, get_summary_endpoint};

#[cfg(test)]
pub use aggregation::sum_by_type;
