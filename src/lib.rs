//! `eyedropper` picks colors from rendered surfaces.
//!
//! # Structure
//!
//! A [`control::Picker`] owns a [`picker::PickSession`], which listens on an
//! [`picker::surface::InputSurface`] once armed. Captured clicks are rasterized through a
//! [`raster::Rasterizer`], sampled around the click point and blended into a
//! [`color::PickedColor`].

#[macro_use]
extern crate tracing;

pub mod color;
pub mod control;
pub mod image;
pub mod models;
pub mod picker;
pub mod raster;
pub mod serde;
