use aq_plot::{ChartRenderer, Figure, PlotError, PlotOptions, PlotResult, Viewer};
use chrono::NaiveDate;
use std::path::PathBuf;

fn out_path(name: &str) -> PathBuf {
    let dir = PathBuf::from("target/test_out");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn quiet() -> PlotOptions {
    PlotOptions::new().show(false)
}

#[test]
fn trend_saved_as_png_is_cropped() {
    let out = out_path("number_of_data_points_yearly_trend.png");
    let opts = quiet()
        .title("Trend of data points measuring air pollution in Delhi")
        .x_label("Year ")
        .y_label("Number of pollution data points (raw) available")
        .plot_label("# data points")
        .save_path(&out);
    let years = [1987, 1988, 1990, 1991, 2004, 2015];
    let counts = [812., 790., 1001., 996., 2410., 2873.];
    ChartRenderer::headless()
        .render_line(&years, &counts, &opts)
        .unwrap();

    let img = image::open(&out).expect("readable png");
    let (w, h) = (img.width(), img.height());
    assert!(w > 0 && h > 0);
    assert!(w <= opts.figure_size.0 && h <= opts.figure_size.1);
}

#[test]
fn scatter_saved_as_svg() {
    let out = out_path("time_series_pollutant_PM25_yr_2015.svg");
    let days: Vec<NaiveDate> = (1..=12)
        .map(|m| NaiveDate::from_ymd_opt(2015, m, 15).unwrap())
        .collect();
    let readings: Vec<f64> = (0..12).map(|i| 80. + 10. * f64::from(i % 5)).collect();
    let opts = quiet()
        .title("Daily variation of PM 2.5 levels in 2015 in Delhi")
        .plot_label("PM 2.5 conc. reading taken inside Delhi")
        .tick_rotation(60.)
        .save_path(&out);
    ChartRenderer::headless()
        .render_scatter(&days, &readings, &opts)
        .unwrap();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.trim_start().starts_with("<svg"));
    assert!(svg.contains("viewBox"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn box_plot_saved_as_png() {
    let out = out_path("location_wise_pollutant_NO2_yr_2015.png");
    let groups = vec![
        vec![45., 52., 61., 58., 49., 130.],
        vec![33., 29., 41., 38.],
        vec![],
    ];
    let opts = quiet()
        .title("Location wise distribution of NO2 in 2015")
        .x_label("Locations ")
        .tick_rotation(90.)
        .show_outliers(false)
        .category_labels(vec!["ITO", "Shahzada Bagh", "Siri Fort"])
        .save_path(&out);
    ChartRenderer::headless().render_box(&groups, &opts).unwrap();
    assert!(image::open(&out).is_ok());
}

#[test]
fn invalid_input_creates_no_file() {
    let out = out_path("mismatched.png");
    let err = ChartRenderer::headless()
        .render_line(&[1, 2, 3], &[1.], &quiet().save_path(&out))
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert!(!out.exists());
}

#[test]
fn unsupported_extension_is_rejected_before_drawing() {
    let out = out_path("trend.pdf");
    let err = ChartRenderer::headless()
        .render_line(&[1, 2], &[1., 2.], &quiet().save_path(&out))
        .unwrap_err();
    match err {
        PlotError::InvalidInput { field, .. } => assert_eq!(field, "save_path"),
        other => panic!("expected invalid input, got {:?}", other),
    }
    assert!(!out.exists());
}

#[test]
fn unwritable_path_is_an_io_failure() {
    out_path("unused.png");
    let out = PathBuf::from("target/test_out/missing_dir/trend.png");
    let err = ChartRenderer::headless()
        .render_line(&[1, 2], &[1., 2.], &quiet().save_path(&out))
        .unwrap_err();
    match err {
        PlotError::Io { path, .. } => assert_eq!(path, out),
        other => panic!("expected io failure, got {:?}", other),
    }
    assert!(!out.exists());
}

#[test]
fn reused_figure_saved_again() {
    let first_out = out_path("reuse_first.png");
    let second_out = out_path("reuse_second.svg");
    let renderer = ChartRenderer::headless();
    let fig = renderer
        .render_line(&[1, 2, 3], &[1., 4., 9.], &quiet().plot_label("A").save_path(&first_out))
        .unwrap();
    renderer
        .render_line(&[1, 2, 3], &[1., 2., 3.], &quiet().plot_label("B").reuse(&fig))
        .unwrap();
    fig.save(&second_out).unwrap();
    assert!(first_out.exists());
    let svg = std::fs::read_to_string(&second_out).unwrap();
    let legend_entry = |label: &str| format!(">\n{}\n</text>", label);
    assert!(svg.contains(&legend_entry("A")));
    assert!(svg.contains(&legend_entry("B")));
}

#[test]
fn failed_save_leaves_reused_figure_unchanged() {
    let renderer = ChartRenderer::headless();
    let fig = renderer
        .render_line(&[1, 2, 3], &[1., 4., 9.], &quiet().plot_label("A"))
        .unwrap();
    let out = PathBuf::from("target/test_out/missing_dir/reuse.png");
    let err = renderer
        .render_line(
            &[1, 2, 3],
            &[1., 2., 3.],
            &quiet().plot_label("B").title("second").reuse(&fig).save_path(&out),
        )
        .unwrap_err();
    assert!(matches!(err, PlotError::Io { .. }));
    assert_eq!(fig.legend_labels(), vec!["A".to_string()]);
    assert_eq!(fig.figure().layers().len(), 1);
    assert_eq!(fig.figure().title(), "");
}

#[test]
fn failed_show_leaves_reused_figure_unchanged() {
    let fig = ChartRenderer::headless()
        .render_scatter(&[1, 2], &[1., 2.], &quiet().plot_label("A"))
        .unwrap();
    let err = ChartRenderer::with_viewer(NoDisplay)
        .render_box(&[vec![1., 2., 3.]], &PlotOptions::new().reuse(&fig))
        .unwrap_err();
    assert!(matches!(err, PlotError::RenderBackendUnavailable { .. }));
    assert_eq!(fig.figure().layers().len(), 1);
    assert!(fig.figure().box_layers().next().is_none());
}

#[test]
fn extreme_finite_values_are_saved() {
    let out = out_path("extreme_values.png");
    ChartRenderer::headless()
        .render_line(&[-1e308, 1e308], &[f64::MIN, f64::MAX], &quiet().save_path(&out))
        .unwrap();
    assert!(image::open(&out).is_ok());
}

struct NoDisplay;

impl Viewer for NoDisplay {
    fn show(&self, _figure: &Figure) -> PlotResult<()> {
        Err(PlotError::RenderBackendUnavailable {
            reason: "no display".to_string(),
        })
    }
}

#[test]
fn save_is_honored_when_display_is_unavailable() {
    let out = out_path("saved_without_display.png");
    let err = ChartRenderer::with_viewer(NoDisplay)
        .render_line(&[1, 2], &[1., 2.], &PlotOptions::new().save_path(&out))
        .unwrap_err();
    assert!(matches!(err, PlotError::RenderBackendUnavailable { .. }));
    assert!(image::open(&out).is_ok());
}
