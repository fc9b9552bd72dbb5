//! Shareable HTML progress report.

use maud::{Markup, html};
use plotters::prelude::*;
use std::path::Path;

use crate::analysis::{BasicStats, ExerciseRecord, WeeklySummary, weekly_summary};
use crate::{WeightUnit, Workout};

fn fmt_opt(value: Option<f32>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into())
}

/// Write an HTML report next to a PNG volume chart.
///
/// The chart is best effort: when rendering fails (e.g. no usable font in
/// the environment) the report still gets written with a placeholder note.
pub fn export_html_report<P: AsRef<Path>>(
    path: P,
    workouts: &[Workout],
    stats: &BasicStats,
    records: &[(String, ExerciseRecord)],
    unit: WeightUnit,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let chart_path = path.with_extension("png");
    let weeks = weekly_summary(workouts, unit, None, None);
    let chart_file = match render_volume_chart(&weeks, unit, &chart_path) {
        Ok(()) => chart_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
        Err(e) => {
            log::warn!("failed to render volume chart: {e}");
            None
        }
    };
    let markup = build_html(stats, records, &weeks, chart_file.as_deref(), unit);
    std::fs::write(path, markup.into_string())
}

fn render_volume_chart(
    weeks: &[WeeklySummary],
    unit: WeightUnit,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;
    if weeks.is_empty() {
        root.present()?;
        return Ok(());
    }
    let max = weeks
        .iter()
        .map(|w| w.total_volume)
        .fold(0.0_f32, f32::max)
        .max(1.0);
    let mut chart = ChartBuilder::on(&root)
        .caption("Weekly Volume", ("sans-serif", 25))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0..weeks.len(), 0f32..max)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Week")
        .y_desc(format!("Volume ({})", unit.label()))
        .draw()?;
    chart.draw_series(LineSeries::new(
        weeks.iter().enumerate().map(|(i, w)| (i, w.total_volume)),
        &BLUE,
    ))?;
    root.present()?;
    Ok(())
}

fn build_html(
    stats: &BasicStats,
    records: &[(String, ExerciseRecord)],
    weeks: &[WeeklySummary],
    chart_file: Option<&str>,
    unit: WeightUnit,
) -> Markup {
    html! {
        html {
            head { meta charset="utf-8"; title { "Training Report" } }
            body {
                h1 { "Summary" }
                table border="1" {
                    tr { th { "Total Workouts" } td { (stats.total_workouts) } }
                    tr { th { "Avg Sets/Workout" } td { (format!("{:.1}", stats.avg_sets_per_workout)) } }
                    tr { th { "Avg Reps/Set" } td { (format!("{:.1}", stats.avg_reps_per_set)) } }
                    tr { th { "Avg Days Between" } td { (format!("{:.1}", stats.avg_days_between)) } }
                    tr { th { "Most Common Exercise" } td { (stats.most_common_exercise.clone().unwrap_or_default()) } }
                }
                h1 { "Personal Records" }
                table border="1" {
                    tr {
                        th { "Exercise" }
                        th { (format!("Max Weight ({})", unit.label())) }
                        th { "Max Set Volume" }
                        th { "Best Est 1RM" }
                    }
                    @for (exercise, record) in records {
                        tr {
                            td { (exercise) }
                            td { (fmt_opt(record.max_weight)) }
                            td { (fmt_opt(record.max_volume)) }
                            td { (fmt_opt(record.best_est_1rm)) }
                        }
                    }
                }
                h1 { "Weekly Volume" }
                table border="1" {
                    tr { th { "Week" } th { "Workouts" } th { "Sets" } th { (format!("Volume ({})", unit.label())) } }
                    @for week in weeks {
                        tr {
                            td { (format!("{}-W{:02}", week.year, week.week)) }
                            td { (week.workouts) }
                            td { (week.total_sets) }
                            td { (format!("{:.0}", week.total_volume)) }
                        }
                    }
                }
                @if let Some(file) = chart_file {
                    img src=(file);
                } @else {
                    p { "Chart unavailable" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{OneRmFormula, compute_stats, personal_records};
    use crate::storage::testutil;
    use crate::{Exercise, ExerciseSet};

    fn sample_log() -> Vec<Workout> {
        let mut w = Workout::new("2026-08-03", WeightUnit::Lbs);
        let mut ex = Exercise::new("Bench Press");
        ex.sets.push(ExerciseSet::new("5", "150"));
        w.exercises.push(ex);
        vec![w]
    }

    #[test]
    fn fmt_opt_formats_and_dashes() {
        assert_eq!(fmt_opt(None), "-");
        assert_eq!(fmt_opt(Some(3.46)), "3.5");
        assert_eq!(fmt_opt(Some(-1.27)), "-1.3");
    }

    #[test]
    fn build_html_renders_records_and_summary() {
        let log = sample_log();
        let stats = compute_stats(&log, None, None);
        let records = personal_records(&log, WeightUnit::Lbs, OneRmFormula::Brzycki);
        let weeks = weekly_summary(&log, WeightUnit::Lbs, None, None);

        let output =
            build_html(&stats, &records, &weeks, Some("chart.png"), WeightUnit::Lbs).into_string();
        assert!(output.contains("Bench Press"));
        assert!(output.contains("150.0"));
        assert!(output.contains("2026-W32"));
        assert!(output.contains("<img src=\"chart.png\">"));
    }

    #[test]
    fn build_html_falls_back_without_chart() {
        let output = build_html(
            &BasicStats::default(),
            &[],
            &[],
            None,
            WeightUnit::Kg,
        )
        .into_string();
        assert!(output.contains("Chart unavailable"));
        assert!(!output.contains("<img"));
    }

    #[test]
    fn export_writes_report_file() {
        let store = testutil::temp_store();
        let log = sample_log();
        let stats = compute_stats(&log, None, None);
        let records = personal_records(&log, WeightUnit::Lbs, OneRmFormula::Brzycki);

        let path = store.path().join("report.html");
        export_html_report(&path, &log, &stats, &records, WeightUnit::Lbs).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        assert!(data.contains("<h1>Summary</h1>"));
        assert!(data.contains("Bench Press"));
    }
}
