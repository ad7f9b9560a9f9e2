//! Fault policies by route
//!
//! Fault rules are part of route rules. The table holds the validated policy
//! of every route behind an `Arc`, so request handlers can look one up and
//! evaluate it without locking.

use std::collections::HashMap;
use std::sync::Arc;

use domain::{FaultOutcome, FaultPolicy, HttpFaultInjectionConfig};
use tracing::{debug, info};

use super::FaultDecisionEngine;
use crate::error::ApplicationError;
use crate::ports::{RandomSource, RequestHeaders};

/// Validated fault policies keyed by route name
#[derive(Debug, Clone, Default)]
pub struct RouteFaultTable {
    engine: FaultDecisionEngine,
    routes: HashMap<String, Arc<FaultPolicy>>,
}

impl RouteFaultTable {
    /// Create an empty table evaluated by the given engine
    pub fn new(engine: FaultDecisionEngine) -> Self {
        Self {
            engine,
            routes: HashMap::new(),
        }
    }

    /// Validate route configurations and build a table from them
    ///
    /// Fails on the first invalid policy or duplicate route name.
    pub fn from_configs<I, S>(engine: FaultDecisionEngine, routes: I) -> Result<Self, ApplicationError>
    where
        I: IntoIterator<Item = (S, HttpFaultInjectionConfig)>,
        S: Into<String>,
    {
        let mut table = Self::new(engine);
        for (route, config) in routes {
            let route = route.into();
            let policy = FaultPolicy::try_from(config)
                .map_err(|e| ApplicationError::invalid_route(route.clone(), e))?;
            table.insert(route, policy)?;
        }
        info!(routes = table.len(), "Loaded fault policies");
        Ok(table)
    }

    /// Register the policy of a route
    pub fn insert(
        &mut self,
        route: impl Into<String>,
        policy: FaultPolicy,
    ) -> Result<(), ApplicationError> {
        let route = route.into();
        if self.routes.contains_key(&route) {
            return Err(ApplicationError::Configuration(format!(
                "duplicate fault policy for route '{route}'"
            )));
        }
        if policy.is_noop() {
            debug!(route = %route, "Fault policy injects nothing");
        }
        self.routes.insert(route, Arc::new(policy));
        Ok(())
    }

    /// Shared policy of a route
    pub fn policy(&self, route: &str) -> Option<Arc<FaultPolicy>> {
        self.routes.get(route).cloned()
    }

    /// Engine used by [`Self::decide_for`]
    pub const fn engine(&self) -> &FaultDecisionEngine {
        &self.engine
    }

    /// Decide what to do with a request on the given route
    ///
    /// Routes without a policy pass every request.
    pub fn decide_for<H, R>(&self, route: &str, request: &H, rng: &mut R) -> FaultOutcome
    where
        H: RequestHeaders + ?Sized,
        R: RandomSource + ?Sized,
    {
        match self.routes.get(route) {
            Some(policy) => self.engine.decide(policy, request, rng),
            None => {
                debug!(route, "No fault policy for route");
                FaultOutcome::Pass
            },
        }
    }

    /// Route names in arbitrary order
    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Number of routes with a policy
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route has a policy
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use domain::{AbortCode, AbortConfig, AbortSpec, DelaySpec};

    use super::*;
    use crate::ports::{FixedSequence, MockRandomSource, NoHeaders};

    fn abort_config(status: i32) -> HttpFaultInjectionConfig {
        HttpFaultInjectionConfig {
            delay: None,
            abort: Some(AbortConfig {
                http_status: Some(status),
                ..AbortConfig::default()
            }),
        }
    }

    #[test]
    fn from_configs_builds_table() {
        let table = RouteFaultTable::from_configs(
            FaultDecisionEngine::new(),
            [("ratings", abort_config(400)), ("reviews", abort_config(503))],
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let mut names: Vec<_> = table.route_names().collect();
        names.sort_unstable();
        assert_eq!(names, ["ratings", "reviews"]);
        assert_eq!(
            table.policy("ratings").unwrap().abort,
            Some(AbortSpec::http_status(400))
        );
    }

    #[test]
    fn from_configs_reports_invalid_route() {
        let err = RouteFaultTable::from_configs(
            FaultDecisionEngine::new(),
            [("ratings", abort_config(400)), ("reviews", abort_config(700))],
        )
        .unwrap_err();

        assert!(err.is_invalid_policy());
        assert!(err.to_string().starts_with("Route 'reviews':"));
    }

    #[test]
    fn duplicate_routes_rejected() {
        let mut table = RouteFaultTable::default();
        table.insert("reviews", FaultPolicy::none()).unwrap();
        let err = table.insert("reviews", FaultPolicy::none()).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn unknown_route_passes_without_drawing() {
        let table = RouteFaultTable::default();
        let mut rng = MockRandomSource::new();
        rng.expect_next_unit().times(0);

        assert!(table.is_empty());
        assert_eq!(
            table.decide_for("missing", &NoHeaders, &mut rng),
            FaultOutcome::Pass
        );
    }

    #[test]
    fn decide_for_uses_route_policy() {
        let mut table = RouteFaultTable::new(FaultDecisionEngine::new());
        table
            .insert(
                "reviews",
                FaultPolicy::delay(DelaySpec::fixed(Duration::from_secs(5))),
            )
            .unwrap();
        table
            .insert("ratings", FaultPolicy::abort(AbortSpec::http_status(400)))
            .unwrap();
        let mut rng = FixedSequence::constant(0.0);

        assert_eq!(
            table.decide_for("reviews", &NoHeaders, &mut rng),
            FaultOutcome::Delay {
                duration: Duration::from_secs(5)
            }
        );
        assert_eq!(
            table.decide_for("ratings", &NoHeaders, &mut rng),
            FaultOutcome::Abort {
                code: AbortCode::HttpStatus(400)
            }
        );
    }

    #[test]
    fn policies_are_shared() {
        let mut table = RouteFaultTable::default();
        table.insert("reviews", FaultPolicy::none()).unwrap();
        let first = table.policy("reviews").unwrap();
        let second = table.policy("reviews").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
