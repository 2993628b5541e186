//! Integration tests for lifecycle callbacks

use f_validate::*;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn recorder(log: &Log, label: &'static str) -> impl FnMut(&Notification<'_, NodeId>) + 'static {
    let log = Rc::clone(log);
    move |notification| {
        let entry = match notification {
            Notification::ElementError { rule, .. } => format!("{}:{}", label, rule),
            _ => label.to_string(),
        };
        log.borrow_mut().push(entry);
    }
}

#[test]
fn test_success_and_error_are_exclusive() {
    let log: Log = Rc::default();
    let mut doc = MemoryDocument::parse(r#"<form name="f"><input required></form>"#);
    let input = doc.query("input").unwrap();
    let mut validation = FormValidation::new(&mut doc, "f", Options::default()).unwrap();

    validation.on("success", recorder(&log, "success"));
    validation.on("error", recorder(&log, "error"));

    validation.is_valid(&mut doc).unwrap();
    doc.set_value(input, "x");
    validation.is_valid(&mut doc).unwrap();

    assert_eq!(*log.borrow(), vec!["error", "success"]);
}

#[test]
fn test_hooks_register_first() {
    let log: Log = Rc::default();
    let mut doc = MemoryDocument::parse(r#"<form name="f"><input required maxlength="1" value=""></form>"#);
    let hooks = Hooks {
        on_success: Some(Box::new(recorder(&log, "hook-success"))),
        on_error: Some(Box::new(recorder(&log, "hook-error"))),
        on_element_error: Some(Box::new(recorder(&log, "hook-element"))),
    };
    let mut validation = FormValidation::with_hooks(&mut doc, "f", Options::default(), hooks).unwrap();
    validation.on("error", recorder(&log, "later-error"));

    validation.is_valid(&mut doc).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["hook-element:required", "hook-error", "later-error"]
    );
}

#[test]
fn test_element_error_per_failed_rule() {
    let seen: Rc<RefCell<Vec<(NodeId, Rule)>>> = Rc::default();
    let mut doc = MemoryDocument::parse(
        r#"<form name="f">
            <input name="a" required>
            <input name="b" type="email" minlength="10" value="abc">
        </form>"#,
    );
    let inputs = doc.query_all("input");
    let mut validation = FormValidation::new(&mut doc, "f", Options::default()).unwrap();

    let sink = Rc::clone(&seen);
    validation.on(EventName::ElementError, move |notification| {
        if let Notification::ElementError { field, rule } = notification {
            sink.borrow_mut().push((**field, *rule));
        }
    });

    validation.is_valid(&mut doc).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            (inputs[0], Rule::Required),
            (inputs[1], Rule::MinLength),
            (inputs[1], Rule::Email),
        ]
    );
}

#[test]
fn test_custom_events_fire_on_emit() {
    let log: Log = Rc::default();
    let mut doc = MemoryDocument::parse(r#"<form name="f"></form>"#);
    let mut validation = FormValidation::new(&mut doc, "f", Options::default()).unwrap();

    validation.on("basketUpdated", recorder(&log, "first"));
    validation.on("basketUpdated", recorder(&log, "second"));

    validation.emit("somethingElse");
    validation.emit("basketUpdated");

    assert_eq!(*log.borrow(), vec!["first", "second"]);
    assert_eq!(
        validation.callbacks().count(&EventName::from("basketUpdated")),
        2
    );
}

#[test]
fn test_emit_reaches_lifecycle_callbacks() {
    let log: Log = Rc::default();
    let mut doc = MemoryDocument::parse(r#"<form name="f"></form>"#);
    let mut validation = FormValidation::new(&mut doc, "f", Options::default()).unwrap();

    validation.on("success", recorder(&log, "success"));
    validation.on("error", recorder(&log, "error"));

    validation.emit("success");

    assert_eq!(*log.borrow(), vec!["success"]);
}
