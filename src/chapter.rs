//! The multivariate graphs chapter.
//!
//! Ten lessons, each a heading, a few prose bullets, a code listing and the
//! figure that listing produces, followed by a meeting videos section.
//! [`render`] writes every figure plus a `chapter.md` that references them.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use log::{debug, info};

use crate::color::Rgba;
use crate::config::{ChapterConfig, ImageFormat};
use crate::datasets::Source;
use crate::error::Result;
use crate::grammar::{
    Aes, Facet, GGPlot, Geom, Labels, LegendPosition, ScaleSpec, SmoothMethod, Theme,
};
use crate::scale::LabelFormat;
use crate::summary::group_summary;

/// Chapter title, used as the document's top-level heading.
pub const TITLE: &str = "Multivariate Graphs";

/// Name of the Markdown document written next to the figures.
pub const DOCUMENT: &str = "chapter.md";

const INTRO: &[&str] = &[
    "Multivariate graphs display the relationships among three or more variables.",
    "There are two common methods for accommodating multiple variables: grouping and faceting.",
];

const SET1: [&str; 3] = ["#E41A1C", "#377EB8", "#4DAF4A"];

/// Chapter part a lesson belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Extra variables mapped to color, shape, size or transparency.
    Grouping,
    /// Extra variables split into panels.
    Faceting,
}

impl Section {
    fn heading(self) -> &'static str {
        match self {
            Self::Grouping => "Grouping",
            Self::Faceting => "Faceting",
        }
    }

    fn intro(self) -> &'static [&'static str] {
        match self {
            Self::Grouping => &[
                "In grouping, the values of the first two variables are mapped to the x and y axes.",
                "Additional variables are mapped to other visual characteristics such as color, shape, size, line type, and transparency.",
                "Grouping allows you to plot the data for multiple groups in a single graph.",
            ],
            Self::Faceting => &[
                "Grouping allows you to plot multiple variables in a single graph, using visual characteristics such as color, shape, and size.",
                "In faceting, a graph consists of several separate plots or small multiples, one for each level of a third variable, or combination of variables.",
            ],
        }
    }
}

/// One step of the chapter.
#[derive(Debug, Clone, Copy)]
pub struct Lesson {
    /// Figure file stem.
    pub slug: &'static str,
    /// Section heading.
    pub heading: &'static str,
    /// Part of the chapter.
    pub section: Section,
    /// Prose bullets shown before the listing.
    pub notes: &'static [&'static str],
    /// Code listing shown in the document.
    pub listing: &'static str,
    plot: fn(&Source) -> Result<GGPlot>,
}

impl Lesson {
    /// Assemble this lesson's plot, loading its dataset from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be loaded or transformed.
    pub fn plot(&self, source: &Source) -> Result<GGPlot> {
        (self.plot)(source)
    }

    /// File name of the figure in `format`.
    #[must_use]
    pub fn file_name(&self, format: ImageFormat) -> String {
        format!("{}.{}", self.slug, format.extension())
    }
}

/// What [`render`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterReport {
    /// The Markdown document.
    pub document: PathBuf,
    /// Figures in lesson order.
    pub figures: Vec<PathBuf>,
}

/// All lessons in chapter order.
#[must_use]
pub fn lessons() -> Vec<Lesson> {
    vec![
        Lesson {
            slug: "01-color-by-rank",
            heading: "Salary by experience, colored by rank",
            section: Section::Grouping,
            notes: &[
                "Consider the relationship between years since PhD and academic salary.",
                "Mapping `rank` to color shows how the relationship differs for assistant, associate, and full professors.",
            ],
            listing: r#"GGPlot::new()
    .data(source.load("Salaries")?)
    .aes(Aes::new().x("yrs.since.phd").y("salary").color("rank"))
    .geom(Geom::point())"#,
            plot: color_by_rank,
        },
        Lesson {
            slug: "02-shape-by-sex",
            heading: "Adding sex as a shape",
            section: Section::Grouping,
            notes: &["Add sex to the plot, using the shape of the points to indicate sex."],
            listing: r#"GGPlot::new()
    .data(source.load("Salaries")?)
    .aes(Aes::new().x("yrs.since.phd").y("salary").color("rank").shape("sex"))
    .geom(Geom::point())"#,
            plot: shape_by_sex,
        },
        Lesson {
            slug: "03-size-and-transparency",
            heading: "Larger, semi-transparent points",
            section: Section::Grouping,
            notes: &[
                "Overlapping points are hard to read.",
                "Increasing the point size and adding transparency makes dense areas visible.",
            ],
            listing: r#"GGPlot::new()
    .data(source.load("Salaries")?)
    .aes(Aes::new().x("yrs.since.phd").y("salary").color("rank").shape("sex"))
    .geom(Geom::point().size(3.0).alpha(0.7))"#,
            plot: size_and_transparency,
        },
        Lesson {
            slug: "04-quadratic-fit",
            heading: "Quadratic fit lines by rank",
            section: Section::Grouping,
            notes: &[
                "Add a quadratic fit line for each rank, without confidence bands.",
                "Format salaries as dollars, use a colorblind-friendly palette and a minimal theme.",
            ],
            listing: r##"let set1: Vec<Rgba> = ["#E41A1C", "#377EB8", "#4DAF4A"]
    .into_iter()
    .map(Rgba::from_hex)
    .collect::<Result<_>>()?;
GGPlot::new()
    .data(source.load("Salaries")?)
    .aes(Aes::new().x("yrs.since.phd").y("salary").color("rank"))
    .geom(Geom::point().size(3.0).alpha(0.4))
    .geom(Geom::smooth().method(SmoothMethod::Lm { degree: 2 }).linewidth(1.5))
    .scale_y(ScaleSpec::new().format(LabelFormat::Dollar))
    .scale_color_manual(&set1)
    .labs(Labels::new()
        .x("Number of Years since PhD")
        .y("")
        .title("Academic Salary by Rank and Years Since Degree")
        .subtitle("9-month salary")
        .color("Rank"))
    .theme(Theme::minimal())"##,
            plot: quadratic_fit,
        },
        Lesson {
            slug: "05-size-by-service",
            heading: "Size mapped to years of service",
            section: Section::Grouping,
            notes: &[
                "A numeric variable can be mapped to point size.",
                "Years of service now appears as the size of each point.",
            ],
            listing: r#"GGPlot::new()
    .data(source.load("Salaries")?)
    .aes(Aes::new().x("yrs.since.phd").y("salary").color("rank").size("yrs.service"))
    .geom(Geom::point().alpha(0.6))
    .scale_y(ScaleSpec::new().format(LabelFormat::Dollar))
    .labs(Labels::new()
        .x("Number of Years since PhD")
        .y("")
        .title("Academic Salary by Rank, Years of Service, and Years Since Degree")
        .color("Rank")
        .size("Years of Service"))
    .theme(Theme::minimal())"#,
            plot: size_by_service,
        },
        Lesson {
            slug: "06-wrap-by-rank",
            heading: "Salary histograms by rank",
            section: Section::Faceting,
            notes: &[
                "`Facet::wrap` lays out one panel per level of a variable.",
                "With one column the panels stack vertically and share the salary axis.",
            ],
            listing: r#"let salaries = source.load("Salaries")?
    .mutate("salary_k", "salary", |s| s / 1000.0)?;
GGPlot::new()
    .data(salaries)
    .aes(Aes::new().x("salary_k"))
    .geom(Geom::histogram().fill(Rgba::CORNFLOWER).color(Rgba::WHITE))
    .facet(Facet::wrap(&["rank"]).ncol(1))
    .labs(Labels::new().title("Salary histograms by rank").x("Salary ($1000)"))"#,
            plot: wrap_by_rank,
        },
        Lesson {
            slug: "07-grid-sex-discipline",
            heading: "Salary histograms by sex and discipline",
            section: Section::Faceting,
            notes: &["`Facet::grid` crosses a row variable with a column variable."],
            listing: r#"let salaries = source.load("Salaries")?
    .mutate("salary_k", "salary", |s| s / 1000.0)?;
GGPlot::new()
    .data(salaries)
    .aes(Aes::new().x("salary_k"))
    .geom(Geom::histogram().fill(Rgba::CORNFLOWER).color(Rgba::WHITE))
    .facet(Facet::grid(&["sex"], &["discipline"]))
    .labs(Labels::new().title("Salary histograms by sex and discipline").x("Salary ($1000)"))"#,
            plot: grid_sex_discipline,
        },
        Lesson {
            slug: "08-means-by-group",
            heading: "Mean salaries with standard errors",
            section: Section::Faceting,
            notes: &[
                "Summarize salary by sex, rank and discipline: count, mean, standard deviation and standard error.",
                "Plot each mean with an error bar of one standard error, one panel per rank and discipline.",
            ],
            listing: r##"let set1: Vec<Rgba> = ["#E41A1C", "#377EB8", "#4DAF4A"]
    .into_iter()
    .map(Rgba::from_hex)
    .collect::<Result<_>>()?;
let means = group_summary(&source.load("Salaries")?, &["sex", "rank", "discipline"], "salary")?
    .to_frame()?
    .combine("lower", "mean", "se", |m, se| m - se)?
    .combine("upper", "mean", "se", |m, se| m + se)?;
GGPlot::new()
    .data(means)
    .aes(Aes::new().x("sex").y("mean").color("sex"))
    .geom(Geom::point().size(3.0))
    .geom(Geom::errorbar().width(0.1).aes(Aes::new().ymin("lower").ymax("upper")))
    .scale_y(ScaleSpec::new().breaks_seq(70_000.0, 140_000.0, 10_000.0).format(LabelFormat::Dollar))
    .facet(Facet::grid(&[], &["rank", "discipline"]))
    .scale_color_manual(&set1)
    .labs(Labels::new()
        .x("Gender")
        .y("")
        .title("Nine month academic salaries by gender, discipline, and rank")
        .subtitle("(Means and standard errors)"))
    .theme(Theme::bw()
        .legend_position(LegendPosition::None)
        .grid_major_x(false)
        .grid_minor_y(false))"##,
            plot: means_by_group,
        },
        Lesson {
            slug: "09-asia-life-expectancy",
            heading: "Life expectancy in Asia",
            section: Section::Faceting,
            notes: &[
                "Faceting also works for time series: one panel per country.",
                "A grey line connects the years and blue points mark each observation.",
            ],
            listing: r#"let asia = source.load("gapminder")?.filter_eq("continent", "Asia")?;
GGPlot::new()
    .data(asia)
    .aes(Aes::new().x("year").y("lifeExp"))
    .geom(Geom::line().color(Rgba::GREY))
    .geom(Geom::point().color(Rgba::BLUE))
    .facet(Facet::wrap(&["country"]))
    .theme(Theme::minimal().base_size(9.0))
    .labs(Labels::new().title("Changes in Life Expectancy").x("Year").y("Life Expectancy"))"#,
            plot: asia_life_expectancy,
        },
        Lesson {
            slug: "10-bubble-2007",
            heading: "Wealth and health in 2007",
            section: Section::Faceting,
            notes: &[
                "Grouping and faceting combine freely with other channels.",
                "Here population is mapped to size and continent to color in a single bubble plot.",
            ],
            listing: r#"let latest = source.load("gapminder")?.filter("year", |y| y == 2007.0)?;
GGPlot::new()
    .data(latest)
    .aes(Aes::new().x("gdpPercap").y("lifeExp").size("pop").color("continent"))
    .geom(Geom::point().alpha(0.6))
    .scale_x(ScaleSpec::new().format(LabelFormat::Dollar))
    .labs(Labels::new()
        .title("Life expectancy by GDP per capita, 2007")
        .x("GDP per capita")
        .y("Life Expectancy")
        .size("Population")
        .color("Continent"))"#,
            plot: bubble_2007,
        },
    ]
}

// ============================================================================
// Figures
// ============================================================================

fn set1() -> Result<Vec<Rgba>> {
    SET1.into_iter().map(Rgba::from_hex).collect::<Result<_>>()
}

fn salaries_plot(source: &Source, aes: Aes) -> Result<GGPlot> {
    Ok(GGPlot::new().data(source.load("Salaries")?).aes(aes))
}

fn color_by_rank(source: &Source) -> Result<GGPlot> {
    let aes = Aes::new().x("yrs.since.phd").y("salary").color("rank");
    Ok(salaries_plot(source, aes)?.geom(Geom::point()))
}

fn shape_by_sex(source: &Source) -> Result<GGPlot> {
    let aes = Aes::new().x("yrs.since.phd").y("salary").color("rank").shape("sex");
    Ok(salaries_plot(source, aes)?.geom(Geom::point()))
}

fn size_and_transparency(source: &Source) -> Result<GGPlot> {
    let aes = Aes::new().x("yrs.since.phd").y("salary").color("rank").shape("sex");
    Ok(salaries_plot(source, aes)?.geom(Geom::point().size(3.0).alpha(0.7)))
}

fn quadratic_fit(source: &Source) -> Result<GGPlot> {
    let set1 = set1()?;
    let aes = Aes::new().x("yrs.since.phd").y("salary").color("rank");
    Ok(salaries_plot(source, aes)?
        .geom(Geom::point().size(3.0).alpha(0.4))
        .geom(Geom::smooth().method(SmoothMethod::Lm { degree: 2 }).linewidth(1.5))
        .scale_y(ScaleSpec::new().format(LabelFormat::Dollar))
        .scale_color_manual(&set1)
        .labs(
            Labels::new()
                .x("Number of Years since PhD")
                .y("")
                .title("Academic Salary by Rank and Years Since Degree")
                .subtitle("9-month salary")
                .color("Rank"),
        )
        .theme(Theme::minimal()))
}

fn size_by_service(source: &Source) -> Result<GGPlot> {
    let aes = Aes::new().x("yrs.since.phd").y("salary").color("rank").size("yrs.service");
    Ok(salaries_plot(source, aes)?
        .geom(Geom::point().alpha(0.6))
        .scale_y(ScaleSpec::new().format(LabelFormat::Dollar))
        .labs(
            Labels::new()
                .x("Number of Years since PhD")
                .y("")
                .title("Academic Salary by Rank, Years of Service, and Years Since Degree")
                .color("Rank")
                .size("Years of Service"),
        )
        .theme(Theme::minimal()))
}

fn salary_histogram(source: &Source, facet: Facet, title: &str) -> Result<GGPlot> {
    let salaries = source.load("Salaries")?.mutate("salary_k", "salary", |s| s / 1000.0)?;
    Ok(GGPlot::new()
        .data(salaries)
        .aes(Aes::new().x("salary_k"))
        .geom(Geom::histogram().fill(Rgba::CORNFLOWER).color(Rgba::WHITE))
        .facet(facet)
        .labs(Labels::new().title(title).x("Salary ($1000)")))
}

fn wrap_by_rank(source: &Source) -> Result<GGPlot> {
    salary_histogram(source, Facet::wrap(&["rank"]).ncol(1), "Salary histograms by rank")
}

fn grid_sex_discipline(source: &Source) -> Result<GGPlot> {
    salary_histogram(
        source,
        Facet::grid(&["sex"], &["discipline"]),
        "Salary histograms by sex and discipline",
    )
}

fn means_by_group(source: &Source) -> Result<GGPlot> {
    let set1 = set1()?;
    let table = group_summary(&source.load("Salaries")?, &["sex", "rank", "discipline"], "salary")?;
    debug!("salary summary:\n{table}");
    let means = table
        .to_frame()?
        .combine("lower", "mean", "se", |m, se| m - se)?
        .combine("upper", "mean", "se", |m, se| m + se)?;
    Ok(GGPlot::new()
        .data(means)
        .aes(Aes::new().x("sex").y("mean").color("sex"))
        .geom(Geom::point().size(3.0))
        .geom(Geom::errorbar().width(0.1).aes(Aes::new().ymin("lower").ymax("upper")))
        .scale_y(
            ScaleSpec::new()
                .breaks_seq(70_000.0, 140_000.0, 10_000.0)
                .format(LabelFormat::Dollar),
        )
        .facet(Facet::grid(&[], &["rank", "discipline"]))
        .scale_color_manual(&set1)
        .labs(
            Labels::new()
                .x("Gender")
                .y("")
                .title("Nine month academic salaries by gender, discipline, and rank")
                .subtitle("(Means and standard errors)"),
        )
        .theme(
            Theme::bw()
                .legend_position(LegendPosition::None)
                .grid_major_x(false)
                .grid_minor_y(false),
        ))
}

fn asia_life_expectancy(source: &Source) -> Result<GGPlot> {
    let asia = source.load("gapminder")?.filter_eq("continent", "Asia")?;
    Ok(GGPlot::new()
        .data(asia)
        .aes(Aes::new().x("year").y("lifeExp"))
        .geom(Geom::line().color(Rgba::GREY))
        .geom(Geom::point().color(Rgba::BLUE))
        .facet(Facet::wrap(&["country"]))
        .theme(Theme::minimal().base_size(9.0))
        .labs(Labels::new().title("Changes in Life Expectancy").x("Year").y("Life Expectancy")))
}

fn bubble_2007(source: &Source) -> Result<GGPlot> {
    let latest = source.load("gapminder")?.filter("year", |y| y == 2007.0)?;
    Ok(GGPlot::new()
        .data(latest)
        .aes(Aes::new().x("gdpPercap").y("lifeExp").size("pop").color("continent"))
        .geom(Geom::point().alpha(0.6))
        .scale_x(ScaleSpec::new().format(LabelFormat::Dollar))
        .labs(
            Labels::new()
                .title("Life expectancy by GDP per capita, 2007")
                .x("GDP per capita")
                .y("Life Expectancy")
                .size("Population")
                .color("Continent"),
        ))
}

// ============================================================================
// Document
// ============================================================================

/// Build the Markdown document for `lessons`, referencing figures in
/// `config.format`.
#[must_use]
pub fn document(lessons: &[Lesson], config: &ChapterConfig) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {TITLE}\n");
    bullets(&mut md, INTRO);

    let mut section = None;
    for lesson in lessons {
        if section != Some(lesson.section) {
            section = Some(lesson.section);
            let _ = writeln!(md, "## {}\n", lesson.section.heading());
            bullets(&mut md, lesson.section.intro());
        }
        let _ = writeln!(md, "### {}\n", lesson.heading);
        bullets(&mut md, lesson.notes);
        let _ = writeln!(md, "```rust\n{}\n```\n", lesson.listing);
        let _ = writeln!(md, "![{}]({})\n", lesson.heading, lesson.file_name(config.format));
    }

    meeting_videos(&mut md, config);
    md
}

fn bullets(md: &mut String, items: &[&str]) {
    for item in items {
        let _ = writeln!(md, "- {item}");
    }
    md.push('\n');
}

fn meeting_videos(md: &mut String, config: &ChapterConfig) {
    md.push_str("## Meeting Videos\n\n### Cohort 1\n\n");
    match &config.video_url {
        Some(url) => {
            let _ = writeln!(
                md,
                "<iframe width=\"560\" height=\"315\" src=\"{url}\" title=\"Meeting video\" frameborder=\"0\" allowfullscreen></iframe>\n"
            );
        }
        None => md.push_str("*Video not yet available.*\n\n"),
    }
    let log = config.chat_log.as_deref().map_or("(no chat log recorded)", str::trim_end);
    let _ = writeln!(
        md,
        "<details>\n<summary>Meeting chat log</summary>\n\n```\n{log}\n```\n</details>"
    );
}

/// Render every figure and the chapter document into `config.out_dir`.
///
/// # Errors
///
/// Returns the first dataset, plotting or I/O error encountered.
pub fn render(config: &ChapterConfig) -> Result<ChapterReport> {
    fs::create_dir_all(&config.out_dir)?;
    let lessons = lessons();
    let mut figures = Vec::with_capacity(lessons.len());
    for lesson in &lessons {
        figures.push(render_figure(lesson, config)?);
    }
    let document_path = config.out_dir.join(DOCUMENT);
    fs::write(&document_path, document(&lessons, config))?;
    info!("wrote {}", document_path.display());
    Ok(ChapterReport { document: document_path, figures })
}

/// Render a single lesson's figure into `config.out_dir`.
///
/// # Errors
///
/// Returns an error if the plot cannot be built or written.
pub fn render_figure(lesson: &Lesson, config: &ChapterConfig) -> Result<PathBuf> {
    let built = lesson.plot(&config.source())?.dimensions(config.width, config.height).build()?;
    let path = config.out_dir.join(lesson.file_name(config.format));
    match config.format {
        ImageFormat::Png => built.write_png(&path)?,
        ImageFormat::Svg => built.write_svg(&path)?,
    }
    info!("wrote {}", path.display());
    Ok(path)
}
