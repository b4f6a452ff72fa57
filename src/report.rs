//! Plain-text rendering of an [`ImpactReport`].

use std::fmt::Write;

use crate::pipeline::ImpactReport;

/// Render both ranked tables (first `top` rows each), the decade counts and
/// the data-quality summary.
pub fn render_text(report: &ImpactReport, top: usize) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Storm Event Impact Report");
    let _ = writeln!(
        output,
        "{} records, {} without a parseable begin date",
        report.quality.rows, report.quality.undated_rows
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most harmful to population health");
    if report.health.is_empty() {
        let _ = writeln!(output, "No event type recorded any fatalities or injuries.");
    } else {
        let width = label_width(report.health.iter().take(top).map(|r| r.event_type.as_str()));
        let _ = writeln!(
            output,
            "{:>4}  {:<width$}  {:>10}  {:>10}  {:>10}",
            "rank", "event_type", "deaths", "injuries", "total"
        );
        for (i, row) in report.health.iter().take(top).enumerate() {
            let _ = writeln!(
                output,
                "{:>4}  {:<width$}  {:>10}  {:>10}  {:>10}",
                i + 1,
                row.event_type,
                row.deaths_total,
                row.injuries_total,
                row.total_harm
            );
        }
        shown_of(&mut output, top, report.health.len());
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Greatest economic consequences (USD)");
    if report.economic.is_empty() {
        let _ = writeln!(output, "No event type recorded any property or crop damage.");
    } else {
        let width = label_width(report.economic.iter().take(top).map(|r| r.event_type.as_str()));
        let _ = writeln!(
            output,
            "{:>4}  {:<width$}  {:>12}  {:>12}  {:>12}",
            "rank", "event_type", "property", "crop", "total"
        );
        for (i, row) in report.economic.iter().take(top).enumerate() {
            let _ = writeln!(
                output,
                "{:>4}  {:<width$}  {:>12}  {:>12}  {:>12}",
                i + 1,
                row.event_type,
                format_dollars(row.property_damage_total),
                format_dollars(row.crop_damage_total),
                format_dollars(row.total_cost)
            );
        }
        shown_of(&mut output, top, report.economic.len());
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Records per decade");
    if report.decades.buckets.is_empty() {
        let _ = writeln!(output, "No dated records.");
    }
    for bucket in &report.decades.buckets {
        let _ = writeln!(
            output,
            "- {} to {}: {}",
            bucket.start, bucket.end, bucket.count
        );
    }
    if report.decades.before_range > 0 {
        let _ = writeln!(output, "- before 1950: {}", report.decades.before_range);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Damage magnitude codes");
    for (kind, counts) in [
        ("property", &report.quality.property_suffixes),
        ("crop", &report.quality.crop_suffixes),
    ] {
        let codes: Vec<String> = counts
            .iter()
            .map(|c| format!("{:?}={} ({})", c.code, c.rows, c.decoded_as))
            .collect();
        let _ = writeln!(output, "- {}: {}", kind, codes.join(", "));
    }

    output
}

/// Scale a dollar amount to K/M/B with two decimals.
pub fn format_dollars(amount: f64) -> String {
    let abs = amount.abs();
    if abs >= 1e9 {
        format!("${:.2}B", amount / 1e9)
    } else if abs >= 1e6 {
        format!("${:.2}M", amount / 1e6)
    } else if abs >= 1e3 {
        format!("${:.2}K", amount / 1e3)
    } else {
        format!("${:.2}", amount)
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max("event_type".len())
}

fn shown_of(output: &mut String, top: usize, total: usize) {
    if total > top {
        let _ = writeln!(output, "({} of {} event types shown)", top, total);
    }
}
