use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "parts-pricing")]
#[command(about = "HTTP façade that prices parts through a remote rules service")]
pub struct ServiceConfig {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    #[arg(long, env = "SOLVER_KEY", default_value = "", hide_env_values = true)]
    pub solver_key: String,

    #[arg(long, env = "RULES_SERVICE_HOST", default_value = "")]
    pub service_host: String,

    #[arg(long, env = "MARKUP_RULE_ID", default_value = "")]
    pub markup_rule_id: String,

    #[arg(long, env = "DISCOUNT_RULE_ID", default_value = "")]
    pub discount_rule_id: String,

    #[arg(long, env = "MANUFACTURABILITY_RULE_ID", default_value = "")]
    pub manufacturability_rule_id: String,

    #[arg(long, env = "PRICING_FLOW_ID", default_value = "")]
    pub pricing_flow_id: String,

    #[arg(long, env = "RULE_VERSION", default_value = "latest")]
    pub rule_version: String,

    #[arg(long, env = "STATIC_FILE", default_value = "public/index.html")]
    pub static_file: String,

    /// Per-call timeout for the rules service. Unset means the client default.
    #[arg(long, env = "REMOTE_TIMEOUT_SECS")]
    pub remote_timeout_secs: Option<u64>,

    #[arg(long, env = "LOG_SUCCESS", help = "Log successful responses")]
    pub log_success: bool,

    #[arg(long, env = "LOG_JSON", help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, env = "VERBOSE", help = "Enable verbose output")]
    pub verbose: bool,
}

/// Identifiers of the remote rules and flow, plus the version to evaluate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub markup: String,
    pub discount: String,
    pub manufacturability: String,
    pub pricing_flow: String,
    pub version: String,
}

/// Connection settings for the remote rules service.
#[derive(Debug, Clone, Default)]
pub struct RemoteSettings {
    pub host: String,
    pub solver_key: String,
    pub timeout: Option<Duration>,
}

impl ServiceConfig {
    pub fn rule_set(&self) -> RuleSet {
        RuleSet {
            markup: self.markup_rule_id.clone(),
            discount: self.discount_rule_id.clone(),
            manufacturability: self.manufacturability_rule_id.clone(),
            pricing_flow: self.pricing_flow_id.clone(),
            version: self.rule_version.clone(),
        }
    }

    pub fn remote_settings(&self) -> RemoteSettings {
        RemoteSettings {
            host: self.service_host.clone(),
            solver_key: self.solver_key.clone(),
            timeout: self.remote_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    fn checks(&self) -> Vec<Result<()>> {
        vec![
            validate_url("service_host", &self.service_host),
            validate_non_empty_string("solver_key", &self.solver_key),
            validate_non_empty_string("markup_rule_id", &self.markup_rule_id),
            validate_non_empty_string("discount_rule_id", &self.discount_rule_id),
            validate_non_empty_string(
                "manufacturability_rule_id",
                &self.manufacturability_rule_id,
            ),
            validate_non_empty_string("pricing_flow_id", &self.pricing_flow_id),
        ]
    }

    /// Every validation problem, not just the first.
    ///
    /// Missing values are tolerated at startup; callers log these and carry on.
    pub fn problems(&self) -> Vec<String> {
        self.checks()
            .into_iter()
            .filter_map(|check| check.err().map(|e| e.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServiceConfig {
        let mut argv = vec!["parts-pricing"];
        argv.extend_from_slice(args);
        ServiceConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_full_configuration_validates() {
        let config = parse(&[
            "--service-host",
            "https://rules.example.com",
            "--solver-key",
            "key-123",
            "--markup-rule-id",
            "markup",
            "--discount-rule-id",
            "discount",
            "--manufacturability-rule-id",
            "feasible",
            "--pricing-flow-id",
            "pricing",
            "--port",
            "8081",
        ]);

        assert!(config.problems().is_empty());
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
        assert_eq!(config.rule_set().version, "latest");
        assert_eq!(config.rule_set().manufacturability, "feasible");
    }

    #[test]
    fn test_timeout_is_optional() {
        let config = parse(&["--remote-timeout-secs", "15"]);
        assert_eq!(config.remote_settings().timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_problems_list_every_missing_value() {
        let config = ServiceConfig {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            solver_key: String::new(),
            service_host: "ftp://rules.example.com".to_string(),
            markup_rule_id: "markup".to_string(),
            discount_rule_id: String::new(),
            manufacturability_rule_id: "feasible".to_string(),
            pricing_flow_id: String::new(),
            rule_version: "latest".to_string(),
            static_file: "public/index.html".to_string(),
            remote_timeout_secs: None,
            log_success: false,
            log_json: false,
            verbose: false,
        };

        let problems = config.problems();
        assert_eq!(problems.len(), 4);
        assert!(problems[0].contains("service_host"));
        assert!(problems[1].contains("solver_key"));
    }
}
