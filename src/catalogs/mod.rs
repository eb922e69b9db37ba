//! # Catalog readers
//!
//! - [`hipparcos`]: star positions and proper motions from the Hipparcos main catalog.
//! - [`mpcorb`]: osculating orbital elements of minor planets in the MPC format.
pub mod hipparcos;
pub mod mpcorb;
