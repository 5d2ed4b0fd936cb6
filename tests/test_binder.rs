//! Tests for binder lifecycle orchestration through the public `bind` and
//! `unbind` entry points.

extern crate outback;

use outback::dom::{DomEvent, Element};
use outback::runner::api::{bind, model_ref, unbind};
use outback::runner::binding::binder::{BindingSummary, Stage};
use outback::runner::binding::view::View;
use outback::runner::ds::directive::Directives;
use outback::runner::ds::error::{BindError, HandlerError};
use outback::runner::ds::model::{DataSource, Model, ModelEvent};
use outback::runner::ds::value::Value;
use outback::runner::plugin::{BinderConfig, BindingHandler, ErrorPolicy, HandlerRegistry};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// A handler that records every lifecycle call as `"<stage> <attribute>"`.
fn probe(log: &Log) -> BindingHandler {
    let (a, b, c) = (log.clone(), log.clone(), log.clone());
    BindingHandler::new()
        .on_init(move |binding| {
            a.borrow_mut().push(format!("init {}", binding.model_attr_name()));
            Ok(())
        })
        .on_update(move |binding| {
            b.borrow_mut().push(format!("update {}", binding.model_attr_name()));
            Ok(())
        })
        .on_remove(move |binding| {
            c.borrow_mut().push(format!("remove {}", binding.model_attr_name()));
            Ok(())
        })
}

fn config_with(registry: HandlerRegistry) -> BinderConfig {
    BinderConfig::new().with_registry(Rc::new(registry))
}

fn paragraphs(expressions: &[&str]) -> Element {
    expressions.iter().fold(Element::new("div"), |root, expression| {
        root.with_child(Element::new("p").with_attr("data-bind", expression))
    })
}

// ============================================================================
// Stage ordering
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_every_init_before_any_update() {
        let log = new_log();
        let mut registry = HandlerRegistry::with_standard();
        registry.register("probe", probe(&log));
        let model = Model::from_pairs(vec![("a", 1), ("b", 2), ("c", 3)]).shared();
        let mut view = View::new(paragraphs(&["probe: @a", "probe: @b", "probe: @c"]))
            .with_model(model.clone())
            .with_config(config_with(registry));

        let summary = bind(&mut view).unwrap();
        assert_eq!(summary.executable_bindings_installed, 3);
        assert_eq!(
            *log.borrow(),
            vec!["init a", "init b", "init c", "update a", "update b", "update c"]
        );
        assert!(view.is_bound());
    }

    #[test]
    fn test_initial_update_does_not_cascade() {
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let mut registry = HandlerRegistry::new();
        registry.register(
            "echo",
            BindingHandler::new().on_update(move |binding| {
                *counter.borrow_mut() += 1;
                let next = binding.value().to_number() + 1.0;
                binding
                    .write(next)
                    .map_err(|e| HandlerError::Message(e.to_string()))?;
                Ok(())
            }),
        );
        let model = Model::from_pairs(vec![("n", 0)]).shared();
        let mut view = View::new(paragraphs(&["echo: @n"]))
            .with_model(model.clone())
            .with_config(config_with(registry));

        bind(&mut view).unwrap();
        assert_eq!(*count.borrow(), 1);
        assert_eq!(model.get("n"), Value::Number(1.0));

        assert_eq!(model.listener_count("change:n"), 1);
    }

    #[test]
    fn test_unbind_halts_notifications() {
        let log = new_log();
        let mut registry = HandlerRegistry::new();
        registry.register("probe", probe(&log));
        let model = Model::from_pairs(vec![("a", 1)]).shared();
        let mut view = View::new(paragraphs(&["probe: @a"]))
            .with_model(model.clone())
            .with_config(config_with(registry));

        bind(&mut view).unwrap();
        model.set_attr("a", 2).unwrap();
        assert_eq!(log.borrow().len(), 3);

        unbind(&mut view).unwrap();
        assert!(!view.is_bound());
        assert_eq!(log.borrow().last().map(String::as_str), Some("remove a"));
        assert_eq!(model.listener_count("change:a"), 0);

        let before = log.borrow().len();
        model.set_attr("a", 3).unwrap();
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_unbind_without_bind_is_noop() {
        let mut view = View::new(Element::new("div")).with_model(Model::new().shared());
        assert!(unbind(&mut view).is_ok());
        assert!(!view.is_bound());
    }
}

// ============================================================================
// Skips, late binding and nesting
// ============================================================================

mod discovery_tests {
    use super::*;

    #[test]
    fn test_handler_without_update_is_skipped() {
        let inits = Rc::new(RefCell::new(0));
        let counter = inits.clone();
        let mut registry = HandlerRegistry::new();
        registry.register(
            "initOnly",
            BindingHandler::new().on_init(move |_| {
                *counter.borrow_mut() += 1;
                Ok(())
            }),
        );
        let mut view = View::new(paragraphs(&["initOnly: @a"]))
            .with_model(Model::new().shared())
            .with_config(config_with(registry));

        let summary = bind(&mut view).unwrap();
        assert_eq!(summary.executable_bindings_installed, 0);
        assert_eq!(summary.executable_bindings_skipped, 1);
        assert_eq!(*inits.borrow(), 0);
    }

    #[test]
    fn test_preview_binding_can_reject() {
        let first = Element::new("span").with_attr("data-bind", "text: @keep");
        let second = Element::new("span").with_attr("data-bind", "text: @drop");
        let root = Element::new("div")
            .with_child(first.clone())
            .with_child(second.clone());
        let model = Model::from_pairs(vec![("keep", "kept"), ("drop", "dropped")]).shared();
        let mut view = View::new(root)
            .with_model(model)
            .with_preview_binding(|binding| binding.model_attr_name() != "drop");

        let summary = bind(&mut view).unwrap();
        assert_eq!(summary.executable_bindings_installed, 1);
        assert_eq!(summary.executable_bindings_skipped, 1);
        assert_eq!(first.text(), "kept");
        assert_eq!(second.text(), "");
    }

    #[test]
    fn test_attribute_defined_after_bind() {
        let span = Element::new("span").with_attr("data-bind", "text: @later");
        let model = Model::new().shared();
        let mut view = View::new(Element::new("div").with_child(span.clone())).with_model(model.clone());

        bind(&mut view).unwrap();
        assert_eq!(span.text(), "");
        model.set_attr("later", "here now").unwrap();
        assert_eq!(span.text(), "here now");
    }

    #[test]
    fn test_nested_bindings_receive_parent_keys() {
        let seen = new_log();
        let recorder = seen.clone();
        let mut registry = HandlerRegistry::new();
        registry.register(
            "deep",
            BindingHandler::new().on_update(move |binding| {
                recorder
                    .borrow_mut()
                    .push(format!("{}<-{}", binding.model_attr_name(), binding.parents().join(",")));
                Ok(())
            }),
        );
        let mut view = View::new(paragraphs(&["deep: { foo: @a, outer: { bar: @b } }"]))
            .with_model(Model::new().shared())
            .with_config(config_with(registry));

        bind(&mut view).unwrap();
        assert_eq!(*seen.borrow(), vec!["a<-foo", "b<-bar,outer"]);
    }

    #[test]
    fn test_unmatched_selector_is_silent() {
        let mut view = View::new(Element::new("div").with_child(Element::new("p")))
            .with_model(Model::new().shared())
            .with_bindings(
                "modelBindings",
                "#missing",
                Directives::new().with("text", model_ref("name")),
            );
        let summary = bind(&mut view).unwrap();
        assert_eq!(summary, BindingSummary::default());
    }

    #[test]
    fn test_summary_reported_to_view() {
        let reported: Rc<RefCell<Option<BindingSummary>>> = Rc::new(RefCell::new(None));
        let sink = reported.clone();
        let mut view = View::new(paragraphs(&["text: @a", "visible: @b"]))
            .with_model(Model::new().shared())
            .with_binding_summary(move |summary| {
                sink.replace(Some(summary.clone()));
            });

        let summary = bind(&mut view).unwrap();
        assert_eq!(summary.executable_bindings_installed, 2);
        assert_eq!(reported.borrow().as_ref(), Some(&summary));
    }

    #[test]
    fn test_expression_error_is_reported() {
        let mut view = View::new(paragraphs(&["text @a"])).with_model(Model::new().shared());
        assert!(matches!(bind(&mut view), Err(BindError::Expression(_))));
    }

    #[test]
    fn test_custom_context_attribute_from_config() {
        let span = Element::new("span").with_attr("data-model", "text: @name");
        let config = BinderConfig::parse(
            r#"
            [context.model]
            attribute = "data-model"
            property = "modelBindings"
            "#,
        )
        .unwrap();
        let model = Model::from_pairs(vec![("name", "Ada")]).shared();
        let mut view = View::new(Element::new("div").with_child(span.clone()))
            .with_model(model)
            .with_config(config);

        bind(&mut view).unwrap();
        assert_eq!(span.text(), "Ada");
    }
}

// ============================================================================
// Error policy
// ============================================================================

mod error_policy_tests {
    use super::*;

    fn failing_registry(log: &Log) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register("probe", probe(log));
        let recorder = log.clone();
        registry.register(
            "broken",
            BindingHandler::new().on_update(move |binding| {
                recorder
                    .borrow_mut()
                    .push(format!("broken {}", binding.model_attr_name()));
                Err(HandlerError::Message("boom".to_string()))
            }),
        );
        registry
    }

    #[test]
    fn test_propagate_stops_at_first_failure() {
        let log = new_log();
        let mut view = View::new(paragraphs(&["broken: @x", "probe: @a"]))
            .with_model(Model::new().shared())
            .with_config(config_with(failing_registry(&log)));

        match bind(&mut view) {
            Err(BindError::Handler { directive, stage, .. }) => {
                assert_eq!(directive, "broken");
                assert_eq!(stage, Stage::Update);
            }
            other => panic!("expected a handler error, got {:?}", other),
        }
        assert_eq!(*log.borrow(), vec!["init a", "broken x"]);
        // the binder stays in the view so it can be torn down
        assert!(view.is_bound());
        unbind(&mut view).unwrap();
        assert_eq!(log.borrow().last().map(String::as_str), Some("remove a"));
    }

    #[test]
    fn test_isolate_collects_failures() {
        let log = new_log();
        let config = config_with(failing_registry(&log)).with_error_policy(ErrorPolicy::Isolate);
        let mut view = View::new(paragraphs(&["broken: @x", "probe: @a"]))
            .with_model(Model::new().shared())
            .with_config(config);

        let summary = bind(&mut view).unwrap();
        assert_eq!(summary.executable_bindings_installed, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].attribute, "x");
        assert_eq!(*log.borrow(), vec!["init a", "broken x", "update a"]);
    }

    #[test]
    fn test_unbind_runs_every_remove() {
        let calls = new_log();
        let recorder = calls.clone();
        let mut registry = HandlerRegistry::new();
        registry.register(
            "sticky",
            BindingHandler::new()
                .on_update(|_| Ok(()))
                .on_remove(move |binding| {
                    recorder.borrow_mut().push(binding.model_attr_name().to_string());
                    Err(HandlerError::Dom("still attached".to_string()))
                }),
        );
        let mut view = View::new(paragraphs(&["sticky: @a", "sticky: @b"]))
            .with_model(Model::new().shared())
            .with_config(config_with(registry));

        bind(&mut view).unwrap();
        match unbind(&mut view) {
            Err(BindError::Unbind { failures }) => {
                assert_eq!(failures.len(), 2);
                assert!(failures.iter().all(|f| f.stage == Stage::Remove));
            }
            other => panic!("expected unbind failures, got {:?}", other),
        }
        assert_eq!(*calls.borrow(), vec!["a", "b"]);
        assert!(!view.is_bound());
    }
}

// ============================================================================
// Error preview
// ============================================================================

mod error_preview_tests {
    use super::*;

    fn guarded(previews: &Log, prevent: bool) -> BindingHandler {
        let recorder = previews.clone();
        BindingHandler::new()
            .on_init(|binding| {
                let target = binding.clone();
                binding.element.on(
                    "change",
                    Some(binding.binding_id.as_str()),
                    Rc::new(move |event: &DomEvent| {
                        let _ = target.write(event.target.value());
                    }),
                );
                Ok(())
            })
            .on_update(|binding| {
                binding.element.set_value(&binding.display_value(false));
                Ok(())
            })
            .on_preview_error(move |_, preview| {
                recorder.borrow_mut().push(preview.error.to_string());
                if prevent {
                    preview.prevent_default();
                }
            })
    }

    fn validated_model() -> Rc<Model> {
        Model::from_pairs(vec![("age", 30)])
            .with_validator(|attributes| match attributes.get("age") {
                Some(Value::String(s)) if s.parse::<f64>().is_err() => {
                    Err(format!("{} is not a number", s))
                }
                _ => Ok(()),
            })
            .shared()
    }

    fn run(prevent: bool) -> (Log, Log) {
        let previews = new_log();
        let errors = new_log();
        let model = validated_model();
        let sink = errors.clone();
        model.on(
            "error",
            Rc::new(move |event: &ModelEvent| {
                if let Some(error) = &event.error {
                    sink.borrow_mut().push(error.to_string());
                }
            }),
        );

        let input = Element::new("input").with_attr("data-bind", "guarded: @age");
        let mut registry = HandlerRegistry::new();
        registry.register("guarded", guarded(&previews, prevent));
        let mut view = View::new(Element::new("div").with_child(input.clone()))
            .with_model(model.clone())
            .with_config(config_with(registry));
        bind(&mut view).unwrap();
        assert_eq!(input.value(), "30");

        input.set_value("old");
        input.trigger("change");
        assert_eq!(model.get("age"), Value::from(30));
        (previews, errors)
    }

    #[test]
    fn test_preview_sees_validation_error() {
        let (previews, errors) = run(false);
        assert_eq!(previews.borrow().len(), 1);
        assert!(previews.borrow()[0].contains("old is not a number"));
        assert_eq!(errors.borrow().len(), 1);
    }

    #[test]
    fn test_prevent_default_suppresses_error_event() {
        let (previews, errors) = run(true);
        assert_eq!(previews.borrow().len(), 1);
        assert!(errors.borrow().is_empty());
    }
}

// ============================================================================
// Rebinding
// ============================================================================

mod rebind_tests {
    use super::*;

    #[test]
    fn test_rebind_tears_down_previous_binder() {
        let span = Element::new("span").with_attr("data-bind", "text: @name");
        let model = Model::from_pairs(vec![("name", "a")]).shared();
        let mut view = View::new(Element::new("div").with_child(span.clone())).with_model(model.clone());

        bind(&mut view).unwrap();
        let first = view.binder().map(|b| b.id().to_string());
        for _ in 0..4 {
            bind(&mut view).unwrap();
        }
        let last = view.binder().map(|b| b.id().to_string());
        assert_ne!(first, last);
        assert_eq!(model.listener_count("change:name"), 1);

        model.set_attr("name", "b").unwrap();
        assert_eq!(span.text(), "b");

        unbind(&mut view).unwrap();
        assert_eq!(model.listener_count("change:name"), 0);
    }

    #[test]
    fn test_rebind_removes_dom_listeners_of_previous_binder() {
        let input = Element::new("input").with_attr("data-bind", "value: @name");
        let model = Model::from_pairs(vec![("name", "a")]).shared();
        let mut view = View::new(Element::new("div").with_child(input.clone())).with_model(model.clone());

        bind(&mut view).unwrap();
        bind(&mut view).unwrap();
        assert_eq!(input.listener_count("change"), 1);

        unbind(&mut view).unwrap();
        assert_eq!(input.listener_count("change"), 0);
        input.set_value("typed");
        input.trigger("change");
        assert_eq!(model.get("name"), Value::from("a"));
    }
}
