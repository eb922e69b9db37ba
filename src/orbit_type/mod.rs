//! # Orbital element representations
//!
//! Only the classical Keplerian set is needed: minor planets are propagated as
//! heliocentric two-body orbits from their published osculating elements.
pub mod keplerian_element;
