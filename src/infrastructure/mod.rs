//! Infrastructure layer - page retrieval, delivery and chart rendering

pub mod chart;
pub mod delivery;
pub mod fetch;
