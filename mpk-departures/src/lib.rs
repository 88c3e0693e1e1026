//! Live departures for MPK Łódź stops.
//!
//! Polls the `rozklady.lodz.pl` timetable feed for configured stops and
//! exposes each upcoming departure as an individually addressable,
//! periodically refreshed sensor.

pub mod config;
pub mod domain;
pub mod feed;
pub mod sensors;
pub mod stops;
pub mod web;
