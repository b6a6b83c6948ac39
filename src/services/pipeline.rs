//! Event processing pipeline
//!
//! Runs one event against a snapshot of the registered rules: every rule
//! whose condition holds has its action dispatched, in rule id order.

use crate::domain::Event;
use crate::engine::{matches, ActionDispatcher, ConditionEvaluator, ExprEvaluator};
use crate::registry::RuleRegistry;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of processing one event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    /// Number of rules evaluated
    pub evaluated: usize,
    /// Ids of rules whose action was dispatched, in dispatch order
    pub matched: Vec<String>,
}

/// Orchestrates registry, evaluator and dispatcher for incoming events
pub struct EventPipeline {
    registry: Arc<RuleRegistry>,
    evaluator: Box<dyn ConditionEvaluator>,
    dispatcher: Arc<ActionDispatcher>,
}

impl EventPipeline {
    /// Create a pipeline using the default expression evaluator
    pub fn new(registry: Arc<RuleRegistry>, dispatcher: Arc<ActionDispatcher>) -> Self {
        Self {
            registry,
            evaluator: Box::new(ExprEvaluator::new()),
            dispatcher,
        }
    }

    /// Evaluate every rule against the event and dispatch the matches
    ///
    /// Does not stop at the first match. A rule whose condition fails to
    /// parse or evaluate is skipped.
    pub fn process(&self, event: &Event) -> ProcessReport {
        let rules = self.registry.list();
        let mut report = ProcessReport {
            evaluated: rules.len(),
            matched: Vec::new(),
        };

        for rule in rules {
            if matches(self.evaluator.as_ref(), &rule.condition, event) {
                log::debug!("Rule {} matched {}", rule.id, event);
                self.dispatcher.dispatch(&rule.action);
                report.matched.push(rule.id);
            }
        }

        log::debug!(
            "Processed event against {} rule(s), {} matched",
            report.evaluated,
            report.matched.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rule;
    use crate::mock::RecordingHandler;
    use std::thread;

    fn pipeline_with(rules: &[Rule]) -> (EventPipeline, RecordingHandler) {
        let registry = Arc::new(RuleRegistry::in_memory());
        for rule in rules {
            registry.add(rule.clone()).unwrap();
        }
        let recorder = RecordingHandler::new("any");
        let dispatcher = Arc::new(ActionDispatcher::new(Box::new(recorder.clone())));
        (EventPipeline::new(registry, dispatcher), recorder)
    }

    #[test]
    fn test_high_temp_scenario() {
        let (pipeline, recorder) =
            pipeline_with(&[Rule::new("r1", "temp > 40", "alert('High Temp')")]);

        let report = pipeline.process(&Event::new().with("temp", 45));
        assert_eq!(recorder.calls(), vec!["alert('High Temp')"]);
        assert_eq!(report.matched, vec!["r1"]);

        recorder.clear();
        let report = pipeline.process(&Event::new().with("temp", 30));
        assert!(recorder.calls().is_empty());
        assert!(report.matched.is_empty());
        assert_eq!(report.evaluated, 1);
    }

    #[test]
    fn test_all_matching_rules_fire_in_id_order() {
        let (pipeline, recorder) = pipeline_with(&[
            Rule::new("b", "temp > 10", "second"),
            Rule::new("a", "temp > 20", "first"),
            Rule::new("c", "temp > 100", "never"),
        ]);

        let report = pipeline.process(&Event::new().with("temp", 50));
        assert_eq!(recorder.calls(), vec!["first", "second"]);
        assert_eq!(report.matched, vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_condition_does_not_stop_other_rules() {
        let (pipeline, recorder) = pipeline_with(&[
            Rule::new("a", "(temp > 40", "broken"),
            Rule::new("b", "missing_field > 1", "missing"),
            Rule::new("c", "temp > 40", "alert('High Temp')"),
        ]);

        let report = pipeline.process(&Event::new().with("temp", 45));
        assert_eq!(recorder.calls(), vec!["alert('High Temp')"]);
        assert_eq!(report.evaluated, 3);
    }

    #[test]
    fn test_each_match_dispatched_exactly_once() {
        let (pipeline, recorder) = pipeline_with(&[
            Rule::new("r1", "x == 1", "one"),
            Rule::new("r2", "x == 1", "one"),
        ]);

        pipeline.process(&Event::new().with("x", 1));
        assert_eq!(recorder.calls(), vec!["one", "one"]);
    }

    #[test]
    fn test_empty_registry() {
        let (pipeline, recorder) = pipeline_with(&[]);
        let report = pipeline.process(&Event::new().with("temp", 45));
        assert_eq!(report, ProcessReport::default());
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_concurrent_events() {
        let (pipeline, recorder) =
            pipeline_with(&[Rule::new("r1", "temp > 40", "alert('High Temp')")]);

        thread::scope(|s| {
            for i in 0..8 {
                let pipeline = &pipeline;
                s.spawn(move || {
                    pipeline.process(&Event::new().with("temp", 35 + i * 2));
                });
            }
        });

        // temp values 35..49 step 2: 41, 43, 45, 47, 49 match
        assert_eq!(recorder.calls().len(), 5);
    }
}
