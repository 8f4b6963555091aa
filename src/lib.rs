pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::rules_client::HttpRuleEvaluator;
pub use app::server::{router, serve, AppState};
pub use config::{RuleSet, ServiceConfig};
pub use crate::core::{flow::FlowOrchestrator, pricing::PricingOrchestrator};
pub use utils::error::{PricingError, Result};
