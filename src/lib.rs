//! # Night almanac
//!
//! Nightly visibility report for stars, planets and minor planets seen from a
//! fixed site: position on the sky, rise and set times over the next 24 hours,
//! solar elongation now and in the coming weeks or months, culmination of stars
//! and phase of the Moon.
//!
//! ## Layout
//!
//! | Module                | Role                                                  |
//! |-----------------------|-------------------------------------------------------|
//! | [`jpl_ephem`]         | SPK (DAF) kernel reader, barycentric states           |
//! | [`earth_orientation`] | precession, nutation, sidereal time                   |
//! | [`observers`]         | geodetic site, local horizon                          |
//! | [`orbit_type`]        | two-body propagation of minor planets                 |
//! | [`catalogs`]          | Hipparcos and MPCORB readers                          |
//! | [`bodies`]            | observable bodies and their barycentric positions     |
//! | [`astrometry`]        | apparent places, the [`astrometry::SkyEngine`] trait  |
//! | [`targets`]           | configured identifiers resolved to bodies             |
//! | [`search`]            | discrete event and maxima searches over time          |
//! | [`labels`]            | compass points, phase names, sexagesimal degrees      |
//! | [`report`]            | text blocks of the almanac                            |
//! | [`almanac`]           | run context and data loading                          |
//! | [`config`]            | TOML settings, [`data_files`] download cache          |
pub mod almanac;
pub mod almanac_errors;
pub mod astrometry;
pub mod bodies;
pub mod catalogs;
pub mod config;
pub mod constants;
pub mod data_files;
pub mod earth_orientation;
pub mod jpl_ephem;
pub mod labels;
pub mod observers;
pub mod orbit_type;
pub mod report;
pub mod search;
pub mod targets;
pub mod time;
