//! Use cases (application logic orchestration)

pub mod alert_tools;
