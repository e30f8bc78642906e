pub mod chart_builder;
pub mod dashboard_service;
