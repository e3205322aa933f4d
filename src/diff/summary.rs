use std::fmt;

use crate::{diff::flow::FlowGraph, model::item::ItemKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Before/after tokens of one kind.
pub struct KindRow {
    /// Category being aggregated.
    pub kind: ItemKind,
    /// Tokens of this kind before.
    pub before: u64,
    /// Tokens of this kind after.
    pub after: u64,
}

impl KindRow {
    /// Relative change; `None` when the kind was absent before.
    pub fn pct_change(&self) -> Option<f64> {
        if self.before == 0 {
            return None;
        }
        Some((self.after as f64 - self.before as f64) / self.before as f64)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Per-kind aggregation of a [`FlowGraph`].
pub struct KindSummary {
    /// One row per kind present on either side, in [`ItemKind::ALL`] order.
    pub rows: Vec<KindRow>,
    /// Total tokens before.
    pub before_total: u64,
    /// Total tokens after.
    pub after_total: u64,
}

impl KindSummary {
    /// Tokens freed (negative when the context grew).
    pub fn saved(&self) -> i128 {
        i128::from(self.before_total) - i128::from(self.after_total)
    }

    /// Percentage of before tokens freed, when anything was freed.
    pub fn reduction_pct(&self) -> Option<f64> {
        let saved = self.saved();
        if saved <= 0 || self.before_total == 0 {
            return None;
        }
        Some(saved as f64 / self.before_total as f64 * 100.0)
    }
}

impl FlowGraph {
    /// Aggregate edges by kind.
    pub fn kind_summary(&self) -> KindSummary {
        let rows = ItemKind::ALL
            .iter()
            .filter_map(|&kind| {
                let mut row = KindRow {
                    kind,
                    before: 0,
                    after: 0,
                };
                let mut seen = false;
                for edge in self.edges.iter().filter(|e| e.kind == kind) {
                    seen = true;
                    row.before = row.before.saturating_add(edge.before_weight);
                    row.after = row.after.saturating_add(edge.after_weight);
                }
                seen.then_some(row)
            })
            .collect();

        KindSummary {
            rows,
            before_total: self.before_total,
            after_total: self.after_total,
        }
    }
}

const RULE_WIDTH: usize = 52;

impl fmt::Display for KindSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<20} {:>10} {:>10} {:>10}", "Component", "Before", "After", "Change")?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;

        for row in &self.rows {
            let change = match row.pct_change() {
                Some(pct) => format!("{:+.0}%", pct * 100.0),
                None if row.after > 0 => "new".to_string(),
                None => "-".to_string(),
            };
            writeln!(
                f,
                "{:<20} {:>10} {:>10} {:>10}",
                row.kind.label(),
                group_thousands(i128::from(row.before)),
                group_thousands(i128::from(row.after)),
                change
            )?;
        }

        let saved = self.saved();
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        let delta = if saved > 0 {
            format!("-{}", group_thousands(saved))
        } else {
            format!("+{}", group_thousands(-saved))
        };
        write!(
            f,
            "{:<20} {:>10} {:>10} {:>10}",
            "Total",
            group_thousands(i128::from(self.before_total)),
            group_thousands(i128::from(self.after_total)),
            delta
        )?;
        if let Some(pct) = self.reduction_pct() {
            write!(
                f,
                "\n\nSaved {} tokens ({pct:.1}% reduction)",
                group_thousands(saved)
            )?;
        }
        Ok(())
    }
}

/// `1234567` -> `"1,234,567"`.
pub(crate) fn group_thousands(n: i128) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/diff/summary.rs"]
mod tests;
