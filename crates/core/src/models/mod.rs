pub mod chart;
pub mod market;
pub mod model;
pub mod portfolio;
pub mod timestamp;
pub mod trade;
pub mod view;
