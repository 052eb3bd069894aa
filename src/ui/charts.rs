use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{CountryColors, ValueRamp};
use crate::data::model::{EnergyTable, YEAR_MAX, YEAR_MIN};
use crate::data::views::{self, GrowthSeries, MapEntry, ScatterPoint, Snapshot, SourceTotals};
use crate::state::AppState;

// Source colours shared by the pie and the stacked area chart.
const SOLAR_COLOR: Color32 = Color32::from_rgb(240, 160, 30);
const WIND_COLOR: Color32 = Color32::from_rgb(140, 200, 230);
const HYDRO_COLOR: Color32 = Color32::from_rgb(45, 100, 205);

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Dashboard grid (central panel)
// ---------------------------------------------------------------------------

/// Render the full dashboard. Every view is recomputed from
/// (table, filter selections) on each frame; a missing record only blanks
/// the affected view.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let table = state.table;
    let country = state.selected_country.as_str();
    let year = state.selected_year;

    ui.heading(format!("Insights for {country} in {year}"));
    ui.add_space(4.0);

    let snapshot = views::snapshot_for(table, country, year);
    match &snapshot {
        Ok(snap) => scorecards(ui, snap),
        Err(e) => {
            log::debug!("snapshot unavailable: {e}");
            empty_state(ui, &format!("No detailed data for {country} in {year}."));
        }
    }

    ui.separator();
    ui.columns(2, |cols| {
        cols[0].strong(format!("Renewable energy mix in {country} ({year})"));
        match &snapshot {
            Ok(snap) => pie_chart(&mut cols[0], snap),
            Err(_) => empty_state(&mut cols[0], "No mix data for this selection."),
        }

        cols[1].strong(format!("Total renewable capacity by country ({year})"));
        capacity_map(&mut cols[1], &views::capacity_by_country(table, year));
    });

    ui.separator();
    ui.columns(2, |cols| {
        cols[0].strong("Global renewable-source mix over time (GW)");
        stacked_area(&mut cols[0], &views::global_totals_by_year(table));

        cols[1].strong(format!("Top 5 capacity growth {YEAR_MIN}-{YEAR_MAX} (GW)"));
        growth_lines(&mut cols[1], &views::top_n_growth(table, 5, YEAR_MIN, YEAR_MAX));
    });

    ui.separator();
    ui.columns(2, |cols| {
        cols[0].strong(format!("GDP per capita vs capacity per capita ({year})"));
        scatter_plot(&mut cols[0], &views::gdp_vs_capacity_per_capita(table, year));

        cols[1].strong(format!(
            "Top 10 per-capita leaders: {YEAR_MIN} vs {YEAR_MAX} (kW)"
        ));
        per_capita_bars(&mut cols[1], table);
    });
}

fn empty_state(ui: &mut Ui, msg: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(24.0);
        ui.label(RichText::new(msg).italics().color(Color32::GRAY));
        ui.add_space(24.0);
    });
}

// ---------------------------------------------------------------------------
// Scorecards
// ---------------------------------------------------------------------------

fn scorecards(ui: &mut Ui, snap: &Snapshot) {
    let per_capita = snap
        .capacity_per_capita_kw
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string());

    let cards = [
        ("Total Solar (GW)", format!("{:.2}", snap.solar_gw)),
        ("Total Wind (GW)", format!("{:.2}", snap.wind_gw)),
        ("Total Hydro (GW)", format!("{:.2}", snap.hydro_gw)),
        ("Total Renewable (GW)", format!("{:.2}", snap.total_gw)),
        ("Per Capita (kW)", per_capita),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(label);
                    ui.label(RichText::new(value).strong().size(20.0));
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Pie chart (painter-based; egui_plot has no pie primitive)
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, snap: &Snapshot) {
    // Zero-valued sources are omitted from the pie, as in the scorecard row.
    let slices: Vec<(&str, f64, Color32)> = [
        ("Solar", snap.solar_gw, SOLAR_COLOR),
        ("Wind", snap.wind_gw, WIND_COLOR),
        ("Hydro", snap.hydro_gw, HYDRO_COLOR),
    ]
    .into_iter()
    .filter(|&(_, v, _)| v > 0.0)
    .collect();

    let total: f64 = slices.iter().map(|&(_, v, _)| v).sum();
    if total <= 0.0 {
        empty_state(ui, "No renewable capacity to break down.");
        return;
    }

    let (response, painter) =
        ui.allocate_painter(Vec2::new(ui.available_width(), CHART_HEIGHT), Sense::hover());
    let rect = response.rect;
    let radius = rect.height().min(rect.width()) * 0.42;
    let center = rect.center();

    // Fan of small triangles so wide slices never form a concave polygon.
    let mut angle = -std::f64::consts::FRAC_PI_2;
    for &(_, value, color) in &slices {
        let sweep = value / total * std::f64::consts::TAU;
        let steps = (sweep / 0.05).ceil().max(2.0) as usize;
        let point_at = |a: f64| {
            Pos2::new(
                center.x + radius * a.cos() as f32,
                center.y + radius * a.sin() as f32,
            )
        };
        for s in 0..steps {
            let a0 = angle + sweep * s as f64 / steps as f64;
            let a1 = angle + sweep * (s + 1) as f64 / steps as f64;
            painter.add(egui::Shape::convex_polygon(
                vec![center, point_at(a0), point_at(a1)],
                color,
                Stroke::NONE,
            ));
        }
        angle += sweep;
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for &(label, value, color) in &slices {
            ui.label(
                RichText::new(format!(
                    "■ {label}: {value:.2} GW ({:.0}%)",
                    value / total * 100.0
                ))
                .color(color),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Capacity map (value-ordered tile grid, country code → colour)
// ---------------------------------------------------------------------------

fn capacity_map(ui: &mut Ui, entries: &[MapEntry]) {
    if entries.is_empty() {
        empty_state(ui, "No per-country capacity data for this year.");
        return;
    }

    let ramp = ValueRamp::from_values(entries.iter().map(|e| e.total_gw));

    egui::ScrollArea::vertical()
        .id_salt("capacity_map")
        .max_height(CHART_HEIGHT)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for entry in entries {
                    let (rect, response) =
                        ui.allocate_exact_size(Vec2::new(52.0, 34.0), Sense::hover());
                    let fill = ramp.color_for(entry.total_gw);
                    ui.painter().rect_filled(rect, 3.0, fill);

                    // Keep the code legible on both ends of the ramp.
                    let lum =
                        fill.r() as u32 * 299 + fill.g() as u32 * 587 + fill.b() as u32 * 114;
                    let text_color = if lum > 128_000 {
                        Color32::BLACK
                    } else {
                        Color32::WHITE
                    };
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        &entry.code,
                        FontId::proportional(12.0),
                        text_color,
                    );
                    response.on_hover_text(format!("{}: {:.2} GW", entry.country, entry.total_gw));
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Stacked area: global capacity per source over time
// ---------------------------------------------------------------------------

fn stacked_area(ui: &mut Ui, totals: &[SourceTotals]) {
    if totals.iter().all(|t| t.solar_gw + t.wind_gw + t.hydro_gw == 0.0) {
        empty_state(ui, "No global capacity data to chart.");
        return;
    }

    let stack = |f: fn(&SourceTotals) -> f64| -> PlotPoints {
        totals
            .iter()
            .map(|t| [t.year as f64, f(t)])
            .collect()
    };
    let solar = stack(|t| t.solar_gw);
    let solar_wind = stack(|t| t.solar_gw + t.wind_gw);
    let all = stack(|t| t.solar_gw + t.wind_gw + t.hydro_gw);

    Plot::new("stacked_area")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Capacity (GW)")
        .show(ui, |plot_ui| {
            // Cumulative lines filled to zero, tallest first, so each layer
            // overpaints the one below and reads as a stack.
            plot_ui.line(Line::new(all).name("Hydro").color(HYDRO_COLOR).fill(0.0));
            plot_ui.line(Line::new(solar_wind).name("Wind").color(WIND_COLOR).fill(0.0));
            plot_ui.line(Line::new(solar).name("Solar").color(SOLAR_COLOR).fill(0.0));
        });
}

// ---------------------------------------------------------------------------
// Top-N growth lines
// ---------------------------------------------------------------------------

fn growth_lines(ui: &mut Ui, series: &[GrowthSeries]) {
    if series.is_empty() {
        empty_state(ui, "Not enough data to rank capacity growth.");
        return;
    }

    let colors = CountryColors::new(series.iter().map(|s| s.country.as_str()));

    Plot::new("growth_lines")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Total capacity (GW)")
        .show(ui, |plot_ui| {
            for s in series {
                let points: PlotPoints = s
                    .series
                    .iter()
                    .map(|&(year, total)| [year as f64, total])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&s.country)
                        .color(colors.color_for(&s.country))
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// GDP vs capacity-per-capita scatter
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, points: &[ScatterPoint]) {
    if points.is_empty() {
        empty_state(ui, "No countries with GDP and per-capita data this year.");
        return;
    }

    let colors = CountryColors::new(points.iter().map(|p| p.country.as_str()));
    let pop_max = points.iter().map(|p| p.population).max().unwrap_or(1) as f64;

    Plot::new("gdp_scatter")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("GDP per capita (USD, log scale)")
        .y_axis_label("Capacity per capita (kW)")
        .x_axis_formatter(|mark, _range| format!("{:.0}", 10f64.powf(mark.value)))
        .show(ui, |plot_ui| {
            for p in points {
                // Plotted on log10(x); the axis formatter restores the USD value.
                let x = p.gdp_per_capita.max(1.0).log10();
                let radius = 2.0 + 8.0 * ((p.population as f64 / pop_max).sqrt() as f32);
                plot_ui.points(
                    Points::new(vec![[x, p.capacity_per_capita_kw]])
                        .name(&p.country)
                        .color(colors.color_for(&p.country))
                        .radius(radius),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Per-capita leaders: grouped horizontal bars, first vs last year
// ---------------------------------------------------------------------------

fn per_capita_bars(ui: &mut Ui, table: &EnergyTable) {
    // Leaders are ranked in the latest year, then both years are shown for
    // each of them.
    let leaders = views::top_n_per_capita(table, 10, YEAR_MAX);
    if leaders.is_empty() {
        empty_state(ui, "No per-capita data to rank.");
        return;
    }

    // Ascending by the latest value so the biggest bar ends up on top.
    let ordered: Vec<_> = leaders.iter().rev().collect();
    let names: Vec<String> = ordered.iter().map(|e| e.country.clone()).collect();

    let mut start_bars = Vec::new();
    let mut end_bars = Vec::new();
    for (i, entry) in ordered.iter().enumerate() {
        let y = i as f64;
        let start_value = table
            .get(&entry.country, YEAR_MIN)
            .and_then(|row| row.capacity_per_capita_kw);
        if let Some(v) = start_value {
            start_bars.push(Bar::new(y - 0.2, v).width(0.35));
        }
        end_bars.push(Bar::new(y + 0.2, entry.capacity_per_capita_kw).width(0.35));
    }

    Plot::new("per_capita_bars")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Capacity per capita (kW)")
        .y_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < names.len() {
                names[i as usize].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(start_bars)
                    .horizontal()
                    .name(format!("{YEAR_MIN}"))
                    .color(Color32::GRAY),
            );
            plot_ui.bar_chart(
                BarChart::new(end_bars)
                    .horizontal()
                    .name(format!("{YEAR_MAX}"))
                    .color(Color32::from_rgb(60, 180, 160)),
            );
        });
}
