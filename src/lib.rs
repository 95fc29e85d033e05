//! Cleaning, filtering and aggregation of the Alzheimer's & Healthy Aging
//! indicator survey, shared by the desktop viewer and its tests.

pub mod config;
pub mod data;
