//! Layered grammar of graphics.
//!
//! A plot is assembled declaratively from a data frame, aesthetic mappings,
//! one or more geometric layers, an optional facet specification, scales,
//! labels and a theme. [`GGPlot::build`] resolves all of it into panels of
//! pixel-independent [`Mark`]s plus legends; the built plot then renders to
//! any [`Canvas`](crate::render::Canvas).
//!
//! # Components
//!
//! - **Aesthetics**: column or constant mappings for x, y, color, fill, shape, size, alpha
//! - **Geometries**: point, line, histogram, bar, smooth, errorbar, reference lines
//! - **Statistics**: identity, binning, polynomial smoothing
//! - **Scales**: position, color, shape, size and alpha training
//! - **Facets**: wrapped panels or a row/column grid
//! - **Themes**: grey, bw, minimal, classic, dark
//!
//! # Example
//!
//! ```rust
//! use trueno_multivar::data::DataFrame;
//! use trueno_multivar::grammar::*;
//!
//! let df = DataFrame::new()
//!     .with_numeric("x", vec![1.0, 2.0, 3.0])
//!     .unwrap()
//!     .with_numeric("y", vec![4.0, 5.0, 6.0])
//!     .unwrap();
//! let plot = GGPlot::new()
//!     .data(df)
//!     .aes(Aes::new().x("x").y("y"))
//!     .geom(Geom::point())
//!     .build()
//!     .unwrap();
//! assert_eq!(plot.scenes().len(), 1);
//! ```
//!
//! # References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wickham, H. (2010). "A Layered Grammar of Graphics." Journal of Computational
//!   and Graphical Statistics.

mod aes;
mod draw;
mod facet;
mod geom;
mod ggplot;
mod labels;
mod legend;
mod marks;
mod scales;
mod stat;
mod theme;

pub use aes::{Aes, Channel};
pub use facet::{wrap_dims, Facet, FacetLayout, FacetScales, Panel};
pub use geom::{Geom, GeomType, PT};
pub use ggplot::{BuiltGGPlot, GGPlot, Layer, PanelScene};
pub use labels::Labels;
pub use legend::{Guide, KeyGlyph, Legend, LegendKey};
pub use marks::{Mark, Style};
pub use scales::{PositionScale, ScaleSpec};
pub use stat::{SmoothMethod, Stat};
pub use theme::{LegendPosition, Theme};
