/// Chart kinds offered in the gallery sidebar, in display order.
pub const CHART_KINDS: &[&str] = &["Radar", "Line", "Scatter", "Bar", "Pie", "TBD"];

pub const DEFAULT_CHART_KIND: &str = "Radar";

/// Text column shown beside a chart placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSection {
    pub title: String,
    pub description: String,
}

pub fn section_for(kind: &str) -> ChartSection {
    let description = match kind {
        "Radar" => "Champion profile across damage, vision, gold and objective control.",
        "Line" => "Win rate over patches for the selected role.",
        "Scatter" => "Vision score against damage share per player.",
        "Bar" => "Wins per champion, stacked by side.",
        "Pie" => "Share of picks per role.",
        _ => "Chart to be defined.",
    };
    ChartSection {
        title: format!("{kind} chart"),
        description: description.to_string(),
    }
}
