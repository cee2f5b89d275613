use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::sync::Arc;

use command_form_core::{
    Callback, CommandDescriptor, Context, MapEnv, ParamDescriptor, ParamType, ProcessError, Value,
};
use command_form_widgets::{
    ErrorKind, FixedComposite, Form, VariableComposite, Widget, WidgetBase, WidgetKind,
    WidgetSummary, build_form_widget,
};

fn ctx() -> Context {
    Context::new("test").with_env(MapEnv::new())
}

fn variable(param: ParamDescriptor) -> VariableComposite {
    let ty = param.param_type.clone();
    let shape = param.shape();
    VariableComposite::new(WidgetBase::new(Arc::new(param), ty, shape, false))
}

// ---------------------------------------------------------------------------
// Scalar controls
// ---------------------------------------------------------------------------

#[test]
fn test_applied_default_matches_direct_conversion() {
    let cases = [
        (ParamType::int(), Value::from("42")),
        (ParamType::float(), Value::Float(2.5)),
        (ParamType::String, Value::from("hello")),
        (ParamType::Bool, Value::Bool(true)),
        (ParamType::choice(&["red", "green"]), Value::from("green")),
        (ParamType::datetime(), Value::from("2023-01-02 03:04:05")),
        (ParamType::path(), Value::from("some/dir")),
        (ParamType::Uuid, Value::from("67e55044-10b1-426f-9247-bb680e5fe0c8")),
    ];
    for (ty, default) in cases {
        let param = ParamDescriptor::option("p", ty.clone()).with_default(default.clone());
        let mut widget = build_form_widget(&param);
        widget.set_value(default.clone());
        let expected = ty.convert(&default).ok();
        assert_eq!(widget.get_value(&ctx()), Ok(expected), "{ty:?}");
        assert!(widget.is_valid());
    }
}

#[test]
fn test_empty_text_takes_default_on_resolution() {
    let param = ParamDescriptor::option("name", ParamType::String).with_default("anon");
    let mut widget = build_form_widget(&param);
    assert!(widget.is_empty());
    assert_eq!(widget.get_value(&ctx()), Ok(Some(Value::from("anon"))));
    // the default is written back into the control
    assert_eq!(widget.widget_value(), Value::from("anon"));
}

#[test]
fn test_required_without_default_never_yields_a_value() {
    let params = [
        ParamDescriptor::argument("src", ParamType::String),
        ParamDescriptor::option("key", ParamType::String).hidden_input().required(),
        ParamDescriptor::argument("dest", ParamType::path()),
        ParamDescriptor::argument("files", ParamType::String).allow_multiple(),
        ParamDescriptor::argument("pair", ParamType::String).with_nargs(2),
    ];
    for param in params {
        let mut widget = build_form_widget(&param);
        let err = widget.get_value(&ctx()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Required, "{}", param.name);
        assert_eq!(err.widget, param.name);
        assert!(!widget.is_valid() || widget.kind() == WidgetKind::VariableGroup);
    }
}

#[test]
fn test_optional_empty_still_runs_callback() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let param = ParamDescriptor::option("note", ParamType::String).with_callback(Callback::new(
        move |_, _, value| {
            log.borrow_mut().push(value.clone());
            Ok(value)
        },
    ));
    let mut widget = build_form_widget(&param);
    assert_eq!(widget.get_value(&ctx()), Ok(None));
    assert_eq!(*seen.borrow(), vec![None]);
}

#[test]
fn test_callback_failure_is_a_processing_error() {
    let param = ParamDescriptor::option("port", ParamType::int()).with_callback(Callback::new(
        |_, _, value| match value.as_ref().and_then(Value::as_int) {
            Some(p) if p < 1024 => Err(ProcessError::Failed(format!("port {p} is privileged"))),
            _ => Ok(value),
        },
    ));
    let mut widget = build_form_widget(&param);
    widget.set_value(Value::Int(80));
    let err = widget.get_value(&ctx()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Processing);
    assert_eq!(err.to_string(), "invalid value for 'port': port 80 is privileged");
    assert!(!widget.is_valid());

    widget.set_value(Value::Int(8080));
    assert_eq!(widget.get_value(&ctx()), Ok(Some(Value::Int(8080))));
    assert!(widget.is_valid());
}

#[test]
fn test_default_factory_is_invoked() {
    let param = ParamDescriptor::option("user", ParamType::String)
        .with_default_factory(|| Value::from("from-factory"));
    let mut widget = build_form_widget(&param);
    assert_eq!(widget.get_value(&ctx()), Ok(Some(Value::from("from-factory"))));
}

#[test]
fn test_resolution_is_idempotent() {
    let params = [
        ParamDescriptor::option("n", ParamType::int()).with_default(3),
        ParamDescriptor::option("name", ParamType::String).with_default("x"),
        ParamDescriptor::option("tag", ParamType::String)
            .allow_multiple()
            .with_default(vec!["a", "b"]),
        ParamDescriptor::option("size", ParamType::int()).with_nargs(2),
        ParamDescriptor::option("bad", ParamType::int()),
    ];
    for param in params {
        let mut widget = build_form_widget(&param);
        if param.name == "bad" {
            widget.set_value("nope".into());
        }
        let first = widget.get_value(&ctx());
        let second = widget.get_value(&ctx());
        assert_eq!(first, second, "{}", param.name);
    }
}

// ---------------------------------------------------------------------------
// Fixed composites
// ---------------------------------------------------------------------------

#[test]
fn test_repeated_group_round_trips_three_values() {
    let param = ParamDescriptor::option("rgb", ParamType::int_range(Some(0), Some(255))).with_nargs(3);
    let mut widget = build_form_widget(&param);
    assert_eq!(widget.kind(), WidgetKind::RepeatedGroup);
    assert_eq!(widget.children().len(), 3);

    let raw = vec![Value::from("10"), Value::Int(20), Value::from("30")];
    widget.set_value(Value::List(raw.clone()));
    let expected: Vec<Value> = raw
        .iter()
        .map(|v| param.param_type.convert(v))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(widget.get_value(&ctx()), Ok(Some(Value::List(expected))));
}

#[test]
fn test_tuple_children_use_slot_types() {
    let param = ParamDescriptor::option(
        "entry",
        ParamType::tuple(vec![ParamType::String, ParamType::float(), ParamType::Bool]),
    );
    let mut widget = build_form_widget(&param);
    assert_eq!(widget.kind(), WidgetKind::Tuple);
    widget.set_value(Value::List(vec!["k".into(), "1.5".into(), Value::Bool(true)]));
    assert_eq!(
        widget.get_value(&ctx()),
        Ok(Some(Value::List(vec![
            "k".into(),
            Value::Float(1.5),
            Value::Bool(true)
        ])))
    );
}

#[test]
fn test_invalid_slot_marks_composite_invalid() {
    let param = ParamDescriptor::option(
        "entry",
        ParamType::tuple(vec![ParamType::int(), ParamType::int()]),
    );
    let base = WidgetBase::new(
        Arc::new(param.clone()),
        param.param_type.clone(),
        param.shape(),
        false,
    );
    let mut group = FixedComposite::new(base);
    group.set_value(Value::from(vec!["1", "two"]));
    let err = group.get_value(&ctx()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conversion);
    assert_eq!(err.detail.as_deref(), Some("#2: 'two' is not a valid integer"));
    assert!(!group.is_valid());
    assert!(group.children().iter().all(|c| !c.is_valid()));
}

// ---------------------------------------------------------------------------
// Variable-arity groups
// ---------------------------------------------------------------------------

#[test]
fn test_removing_first_of_two_entries_keeps_second() {
    let mut group = variable(ParamDescriptor::option("tag", ParamType::String).allow_multiple());
    let first = group.add_pair(Some("one".into()));
    let second = group.add_pair(Some("two".into()));
    assert!(group.remove_pair(first));
    assert_eq!(group.len(), 1);
    assert_eq!(group.pair_ids(), vec![second]);
    assert_eq!(
        group.pair(second).map(|w| w.widget_value()),
        Some(Value::from("two"))
    );
    assert_eq!(group.get_value(&ctx()), Ok(Some(Value::from(vec!["two"]))));
}

#[test]
fn test_conversion_failures_are_reported_together() {
    let mut group = variable(ParamDescriptor::option("n", ParamType::int()).allow_multiple());
    group.set_value(Value::from(vec!["1", "bad", "3"]));
    let err = group.get_value(&ctx()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conversion);
    assert_eq!(err.detail.as_deref(), Some("#2: 'bad' is not a valid integer"));

    group.set_value(Value::from(vec!["x", "2", "y"]));
    let err = group.get_value(&ctx()).unwrap_err();
    let detail = err.detail.unwrap_or_default();
    assert!(detail.starts_with('['), "{detail}");
    assert!(detail.contains("#1: 'x'") && detail.contains("#3: 'y'"), "{detail}");
}

#[test]
fn test_environment_populates_empty_group() {
    let ctx = Context::new("test").with_env(MapEnv::new().with("PORTS", "80 443 8080"));
    let param = ParamDescriptor::option("port", ParamType::int())
        .allow_multiple()
        .with_envvar("PORTS");
    let mut group = variable(param);
    assert_eq!(group.len(), 0);
    assert_eq!(
        group.get_value(&ctx),
        Ok(Some(Value::from(vec![80, 443, 8080])))
    );
    assert_eq!(group.len(), 3);
}

#[test]
fn test_incomplete_environment_group_is_dropped() {
    let ctx = Context::new("test").with_env(MapEnv::new().with("PTS", "1 2 3"));
    let param = ParamDescriptor::option("point", ParamType::int())
        .with_nargs(2)
        .allow_multiple()
        .with_envvar("PTS");
    let mut group = variable(param);
    assert_eq!(
        group.get_value(&ctx),
        Ok(Some(Value::List(vec![Value::from(vec![1, 2])])))
    );
    assert_eq!(group.len(), 1);
}

#[test]
fn test_auto_prefixed_environment_populates_pairs_of_values() {
    let ctx = Context::new("test")
        .with_env(MapEnv::new().with("APP_POINT", "1 2 3 4"))
        .with_auto_envvar_prefix("app");
    let param = ParamDescriptor::option("point", ParamType::int())
        .with_nargs(2)
        .allow_multiple();
    let mut group = variable(param);
    assert_eq!(
        group.get_value(&ctx),
        Ok(Some(Value::List(vec![
            Value::from(vec![1, 2]),
            Value::from(vec![3, 4])
        ])))
    );
}

#[test]
fn test_multi_select_resolves_checked_choices() {
    let param = ParamDescriptor::option("feature", ParamType::choice(&["a", "b", "c"]))
        .allow_multiple()
        .with_default(vec!["b"]);
    let mut widget = build_form_widget(&param);
    assert_eq!(widget.kind(), WidgetKind::CheckableComboBox);
    assert_eq!(widget.get_value(&ctx()), Ok(Some(Value::from(vec!["b"]))));

    widget.set_value(Value::from(vec!["c", "a"]));
    assert_eq!(widget.get_value(&ctx()), Ok(Some(Value::from(vec!["a", "c"]))));
}

// ---------------------------------------------------------------------------
// Confirmation gate and forms
// ---------------------------------------------------------------------------

#[test]
fn test_declined_confirmation_resolves_false_before_callback() {
    let answers = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&answers);
    let param = ParamDescriptor::flag("wipe")
        .with_prompt("Wipe the disk?")
        .with_callback(Callback::new(move |_, _, value| {
            seen.borrow_mut().push(value.clone());
            Ok(value)
        }));
    let mut widget = build_form_widget(&param);
    assert_eq!(widget.kind(), WidgetKind::Confirmation);

    let ctx = ctx().with_prompter(|_: &str| false);
    assert_eq!(widget.get_value(&ctx), Ok(Some(Value::Bool(false))));
    assert_eq!(widget.widget_value(), Value::Bool(false));
    assert_eq!(*answers.borrow(), vec![Some(Value::Bool(false))]);
}

#[test]
fn test_form_from_descriptor_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("archive.yaml");
    fs::write(
        &path,
        r#"name: archive
program: [tar]
params:
  - name: output
    type: { kind: path }
    opts: ["-f"]
    required: true
  - name: level
    type: { kind: int, min: 1, max: 9 }
    default: 6
  - name: exclude
    multiple: true
  - name: inputs
    kind: argument
    multiple: true
    required: true
"#,
    )
    .unwrap();
    let cmd = CommandDescriptor::load(&path).unwrap();
    let mut form = Form::new(&cmd, &ctx());

    let kinds: Vec<_> = form.widgets().map(|w| w.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            WidgetKind::PathField,
            WidgetKind::IntField,
            WidgetKind::VariableGroup,
            WidgetKind::VariableGroup
        ]
    );

    form.widget_mut("output").unwrap().set_value("out.tar".into());
    form.widget_mut("inputs")
        .unwrap()
        .set_value(Value::from(vec!["a", "b"]));
    let values = form.resolve(&ctx());
    assert!(values.is_ok(), "{:?}", values.errors());
    let values = values.into_values().unwrap();
    assert_eq!(values[1], ("level".to_string(), Some(Value::Int(6))));
    assert_eq!(values[2], ("exclude".to_string(), None));
    assert_eq!(values[3].1, Some(Value::from(vec!["a", "b"])));

    let summaries: Vec<WidgetSummary> = form.summaries();
    let json = serde_json::to_value(&summaries).unwrap();
    assert_eq!(json[1]["kind"], "int_field");
    assert_eq!(json[3]["children"].as_array().map(Vec::len), Some(2));
}
