//! Choropleth map of the German federal states.
//!
//! [`widget::ChoroplethWidget`] takes render payloads and keeps a retained
//! [`map::Surface`], which the terminal host paints and [`map::svg`] serialises.
pub mod app;
pub mod data;
pub mod i18n;
pub mod log;
pub mod map;
pub mod model;
pub mod raster;
pub mod settings;
pub mod ui;
pub mod widget;
