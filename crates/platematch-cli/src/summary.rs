use console::Style;
use platematch_core::catalog::Catalog;
use platematch_core::config::MatchConfig;
use platematch_core::consts::ARCSEC_PER_DEG;
use platematch_core::quality::{FilterReport, QualityThresholds};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warn: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warn: Style::new().yellow(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

pub fn print_filter_report(report: &FilterReport, thresholds: &QualityThresholds) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to(report.catalog.name()));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Criteria"),
        s.value.apply_to(thresholds)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Rows"),
        s.value.apply_to(report.total_rows)
    );
    if report.malformed.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Malformed"),
            s.disabled.apply_to("none")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Malformed"),
            s.warn.apply_to(report.malformed.len())
        );
        for error in report.malformed.iter().take(5) {
            println!("      {}", s.warn.apply_to(error));
        }
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Bad fits"),
        s.value.apply_to(report.rejected_quality)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Kept"),
        s.value.apply_to(report.kept())
    );
}

pub fn print_match_summary(config: &MatchConfig, outer: &Catalog, inner: Option<&Catalog>) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Plate Match"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    println!(
        "  {:<14}{} ({} sources)",
        s.label.apply_to("Outer"),
        s.value.apply_to(outer.name()),
        outer.len()
    );
    match inner {
        Some(inner) => println!(
            "  {:<14}{} ({} sources)",
            s.label.apply_to("Inner"),
            s.value.apply_to(inner.name()),
            inner.len()
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Inner"),
            s.disabled.apply_to("same catalog (duplicate search)")
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Tolerance"),
        s.value.apply_to(format!("{:.3}\"", config.tolerance * ARCSEC_PER_DEG))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Workers"),
        s.value.apply_to(config.worker_count)
    );
    let range = config.outer_range_for(outer.len());
    println!(
        "  {:<14}{}",
        s.label.apply_to("Outer range"),
        s.value.apply_to(format!("{}..{}", range.start, range.end))
    );
    if config.footprint.is_some() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Footprint"),
            s.value.apply_to("restricted")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Footprint"),
            s.disabled.apply_to("not configured")
        );
    }
    println!();
}

pub fn print_index_list(title: &str, indices: &[usize], catalog: &Catalog, limit: usize) {
    let s = Styles::new();

    println!();
    println!("  {} ({})", s.header.apply_to(title), indices.len());
    println!("  {:>8}  {:<24}  {:>12}  {:>12}", "Index", "Source", "RA", "Dec");
    println!("  {}", "-".repeat(62));
    for &i in indices.iter().take(limit) {
        let r = &catalog[i];
        println!(
            "  {:>8}  {:<24}  {:>12.6}  {:>12.6}",
            i, r.source_id, r.sky.ra, r.sky.dec
        );
    }
    if indices.len() > limit {
        println!(
            "  {}",
            s.label.apply_to(format!("... {} more", indices.len() - limit))
        );
    }
}
