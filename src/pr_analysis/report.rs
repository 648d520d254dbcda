use super::PrAggregate;

const RULE_WIDTH: usize = 80;

/// Renders the weekly breakdown, per-collaborator totals and summary.
///
/// Collaborators are ordered by PR count, descending; ties keep first-seen
/// order. PR numbers within a line are sorted numerically.
pub fn render_report(agg: &PrAggregate) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut lines = vec![
        heavy.clone(),
        "PR ANALYSIS REPORT - LAST 6 MONTHS".to_string(),
        heavy.clone(),
        String::new(),
        "WEEKLY BREAKDOWN".to_string(),
        light.clone(),
        String::new(),
    ];

    for (week, collaborators) in &agg.weeks {
        lines.push(format!("Week: {week}"));

        let mut collaborators = collaborators.clone();
        collaborators.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        for (name, mut prs) in collaborators {
            prs.sort_by_key(|pr| pr.parse::<u64>().unwrap_or(u64::MAX));
            let pr_list = prs
                .iter()
                .map(|pr| format!("#{pr}"))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("  {name}: {} PR(s) - {pr_list}", prs.len()));
        }

        lines.push(String::new());
    }

    lines.push(heavy.clone());
    lines.push("TOTAL PRS PER COLLABORATOR".to_string());
    lines.push(light);
    lines.push(String::new());

    let mut totals = agg.totals.clone();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, count) in &totals {
        lines.push(format!("{name}: {count} PR(s)"));
    }

    lines.push(String::new());
    lines.push(heavy.clone());
    lines.push(format!(
        "SUMMARY: {} PRs merged by {} collaborators",
        agg.total_prs(),
        agg.totals.len()
    ));
    lines.push(heavy);

    lines.join("\n")
}
