use ratatui::layout::Direction;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders};

use crate::selection::Selector;
use crate::view_data::ViewData;

/// What the bar widget is given. `labels[i]` pairs with `values[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDescription {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

pub fn chart_title(selector: &Selector) -> String {
    format!("Wins by champion for {selector}")
}

pub fn describe(data: &ViewData, selector: &Selector) -> ChartDescription {
    let (labels, values) = data
        .iter()
        .map(|(label, value)| (label.to_string(), value))
        .unzip();
    ChartDescription {
        title: chart_title(selector),
        labels,
        values,
    }
}

pub fn bar_chart(desc: &ChartDescription, bar_width: u16) -> BarChart<'static> {
    let scale = value_scale(&desc.values);
    let bars: Vec<Bar<'static>> = desc
        .labels
        .iter()
        .zip(&desc.values)
        .map(|(label, value)| {
            Bar::default()
                .label(label.clone().into())
                .value((value * scale).round() as u64)
                .text_value(format_value(*value))
                .style(Style::default().fg(Color::Magenta))
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .title(desc.title.clone())
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Vertical)
        .bar_width(bar_width.max(1))
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta))
}

/// Bar heights are integral, so small fractional series (rates) are scaled
/// up before rounding.
fn value_scale(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let fractional = values.iter().any(|v| v.fract() != 0.0);
    if fractional && max < 100.0 { 100.0 } else { 1.0 }
}

pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
