//! Bundler build plan generation for pagewright.
//!
//! Combines the resolved page entries with the project configuration into
//! a single declarative [`BuildPlan`] that an external bundler consumes.

pub mod builder;
pub mod plan;
pub mod rules;

pub use builder::{BuildResult, PlanBuilder, PlanError};
pub use plan::{
    BuildPlan, CacheGroup, CssExtract, DevServer, HtmlPage, LoaderUse, Output, Performance,
    Preset, Rule, SplitChunks, TranspilePreset,
};
