//! # Trueno-Multivar
//!
//! Multivariate graphs with a layered plotting grammar, rendered as an
//! instructional chapter.
//!
//! Built on the [trueno](https://crates.io/crates/trueno) core library,
//! trueno-multivar maps extra variables onto color, shape, size and
//! transparency, or splits them into facet panels, and draws the result to
//! PNG or SVG with no JavaScript/HTML dependencies.
//!
//! ## Features
//!
//! - **Pure Rust**: built-in rasterizer, bitmap font and SVG writer
//! - **Grammar of Graphics**: data, aesthetics, layers, stats, facets, scales, themes
//! - **Grouped summaries**: count, mean, standard deviation and standard error per group
//! - **Bundled data**: academic salaries and gapminder country indicators
//! - **Chapter rendering**: Markdown document interleaving prose, listings and figures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trueno_multivar::prelude::*;
//!
//! let plot = GGPlot::new()
//!     .data(datasets::load("Salaries")?)
//!     .aes(Aes::new().x("yrs.since.phd").y("salary").color("rank"))
//!     .geom(Geom::point())
//!     .facet(Facet::wrap(&["discipline"]))
//!     .build()?;
//!
//! plot.write_png("salaries.png")?;
//! # Ok::<(), trueno_multivar::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable parallel reductions in trueno
//!
//! ## Academic References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wickham, H. (2010). "A Layered Grammar of Graphics." JCGS 19(1).
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Kabacoff, R. (2020). *Data Visualization with R*. Chapter 4.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Data Modules
// ============================================================================

/// Columnar data frames and CSV ingest.
pub mod data;

/// Bundled example datasets.
pub mod datasets;

/// Group-by summaries (n, mean, sd, se).
pub mod summary;

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Scale functions for data-to-visual mappings.
pub mod scale;

// ============================================================================
// Visualization Modules
// ============================================================================

/// Grammar of Graphics implementation.
pub mod grammar;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rendering backends and rasterization.
pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

// ============================================================================
// Chapter
// ============================================================================

/// Chapter rendering configuration.
pub mod config;

/// The lesson sequence and Markdown document.
pub mod chapter;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-multivar operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_multivar::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::color::Rgba;
    pub use crate::data::{Column, DataFrame, Factor};
    pub use crate::datasets;
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::grammar::{
        Aes, BuiltGGPlot, Facet, FacetScales, GGPlot, Geom, Labels, Layer, LegendPosition,
        ScaleSpec, SmoothMethod, Theme,
    };
    pub use crate::render::{Canvas, PointShape};
    pub use crate::scale::{LabelFormat, LinearScale, Scale};
    pub use crate::summary::{group_summary, GroupSummary, SummaryTable};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
