//! f-validate WASM
//!
//! Binds [`f_validate::FormValidation`] to a live form. Every listener the
//! controller records is attached as a real DOM listener and forwarded back
//! through `dispatch`. The listeners own the controller, so the handle returned
//! to JavaScript may be discarded.
//!
//! JavaScript callbacks run once the pass has finished, so they may read
//! `errorMessages()` or start another pass.
//!
//! # Example (JavaScript)
//! ```javascript
//! const validation = new FormValidation('signup', {
//!     groupErrorPlacement: 'top',
//!     customEmailRegex: /^[a-z]+@just-eat\.com$/i,
//!     onError: () => console.log('invalid'),
//! });
//! validation.addCustomValidation('isBob', field => field.value === 'bob');
//! validation.isValid();
//! ```

mod dom;

pub use dom::WebDom;

use std::cell::RefCell;
use std::rc::Rc;

use f_validate::{
    Callback, DomEvent, Error, EventKind, FormRef, Hooks, Notification, Options, RuleContext,
};
use js_sys::{Array, Function, Object, Reflect, RegExp};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent};

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Option keys holding JS values serde cannot read
const HOOK_KEYS: [(&str, &str); 3] = [
    ("onSuccess", "success"),
    ("onError", "error"),
    ("onElementError", "elementError"),
];
const EMAIL_REGEX_KEY: &str = "customEmailRegex";

fn to_js(error: Error) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// JS callbacks queued during a pass
#[derive(Clone, Default)]
struct Deferred(Rc<RefCell<Vec<(Function, Array)>>>);

impl Deferred {
    fn push(&self, function: &Function, args: Array) {
        self.0.borrow_mut().push((function.clone(), args));
    }

    /// Calls everything queued so far. Must run with the controller released.
    fn flush(&self) {
        let calls = std::mem::take(&mut *self.0.borrow_mut());
        for (function, args) in calls {
            if let Err(e) = function.apply(&JsValue::NULL, &args) {
                web_sys::console::error_1(&e);
            }
        }
    }
}

/// Wraps a JS function as a lifecycle callback
fn js_callback(function: Function, deferred: &Deferred) -> Callback<Element> {
    let deferred = deferred.clone();
    Box::new(move |notification: &Notification<'_, Element>| {
        let args = match notification {
            Notification::ElementError { field, rule } => {
                Array::of2(field, &JsValue::from_str(rule.name()))
            }
            _ => Array::new(),
        };
        deferred.push(&function, args);
    })
}

fn as_function(value: JsValue, event: &str) -> Result<Function, JsValue> {
    value.dyn_into::<Function>().map_err(|_| {
        to_js(Error::CallbackNotCallable {
            event: event.to_string(),
        })
    })
}

/// Reads `onSuccess` / `onError` / `onElementError` from the options object
fn hooks(options: &JsValue, deferred: &Deferred) -> Result<Hooks<Element>, JsValue> {
    let mut hooks = Hooks::default();
    if !options.is_object() {
        return Ok(hooks);
    }

    for (key, event) in HOOK_KEYS {
        let value = Reflect::get(options, &JsValue::from_str(key))?;
        if value.is_undefined() || value.is_null() {
            continue;
        }

        let callback = js_callback(as_function(value, event)?, deferred);
        match event {
            "success" => hooks.on_success = Some(callback),
            "error" => hooks.on_error = Some(callback),
            _ => hooks.on_element_error = Some(callback),
        }
    }

    Ok(hooks)
}

/// Deserializes the plain options. Hooks and a `RegExp` email pattern are
/// read separately; an email pattern that is not a `RegExp` is ignored.
fn parse_options(options: &JsValue) -> Result<Options, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(Options::default());
    }

    let Some(object) = options.dyn_ref::<Object>() else {
        return serde_wasm_bindgen::from_value(options.clone())
            .map_err(|e| to_js(Error::Options(e.to_string())));
    };

    let email_key = JsValue::from_str(EMAIL_REGEX_KEY);
    let email = Reflect::get(object, &email_key)?;

    let plain = Object::assign(&Object::new(), object);
    Reflect::delete_property(&plain, &email_key)?;
    for (key, _) in HOOK_KEYS {
        Reflect::delete_property(&plain, &JsValue::from_str(key))?;
    }

    let mut parsed: Options = serde_wasm_bindgen::from_value(plain.into())
        .map_err(|e| to_js(Error::Options(e.to_string())))?;

    if let Some(pattern) = email.dyn_ref::<RegExp>() {
        let source = String::from(pattern.source());
        parsed.custom_email_regex =
            Some(Options::email_regex(&source, pattern.ignore_case()).map_err(to_js)?);
    }

    Ok(parsed)
}

fn form_ref(form: JsValue) -> Result<FormRef<Element>, JsValue> {
    if let Some(name) = form.as_string() {
        return Ok(FormRef::Name(name));
    }
    if form.is_undefined() || form.is_null() {
        return Err(to_js(Error::MissingForm));
    }

    form.dyn_into::<Element>()
        .map(FormRef::Node)
        .map_err(|_| to_js(Error::FormNotFound))
}

struct Inner {
    dom: WebDom,
    validation: f_validate::FormValidation<WebDom>,
}

impl Inner {
    fn dispatch(&mut self, target: &Element, event: &Event) -> Result<bool, Error> {
        let Some(kind) = event_kind(&event.type_()) else {
            return Ok(false);
        };
        let key = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key);

        self.validation
            .dispatch(&mut self.dom, target, &DomEvent { kind, key })
    }
}

fn event_kind(name: &str) -> Option<EventKind> {
    [
        EventKind::Submit,
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::Blur,
    ]
    .into_iter()
    .find(|kind| kind.as_str() == name)
}

/// Form validation bound to one form of the current document
#[wasm_bindgen]
pub struct FormValidation {
    inner: Rc<RefCell<Inner>>,
    deferred: Deferred,
}

#[wasm_bindgen]
impl FormValidation {
    /// `form` is a form element or the name of one; `options` is a plain
    /// object using the camelCase option names
    #[wasm_bindgen(constructor)]
    pub fn new(form: JsValue, options: JsValue) -> Result<FormValidation, JsValue> {
        let mut dom = WebDom::current().ok_or_else(|| JsValue::from_str("f-validate: no document"))?;
        let deferred = Deferred::default();
        let parsed = parse_options(&options)?;
        let hooks = hooks(&options, &deferred)?;

        let validation = f_validate::FormValidation::with_hooks(&mut dom, form_ref(form)?, parsed, hooks)
            .map_err(to_js)?;

        let inner = Rc::new(RefCell::new(Inner { dom, validation }));
        attach(&inner, &deferred)?;

        Ok(FormValidation { inner, deferred })
    }

    /// Full pass; returns whether the form is valid
    #[wasm_bindgen(js_name = isValid)]
    pub fn is_valid(&self) -> Result<bool, JsValue> {
        let result = {
            let mut inner = self.inner.borrow_mut();
            let Inner { dom, validation } = &mut *inner;
            validation.is_valid(dom)
        };
        self.deferred.flush();
        result.map_err(to_js)
    }

    pub fn on(&self, event: &str, callback: JsValue) -> Result<(), JsValue> {
        let function = as_function(callback, event)?;
        self.inner
            .borrow_mut()
            .validation
            .on(event, js_callback(function, &self.deferred));
        Ok(())
    }

    pub fn emit(&self, name: &str) {
        self.inner.borrow_mut().validation.emit(name);
        self.deferred.flush();
    }

    /// The handler receives the field element and returns whether it is
    /// valid. It runs during the pass, so it must not call back into this
    /// instance.
    #[wasm_bindgen(js_name = addCustomValidation)]
    pub fn add_custom_validation(&self, name: JsValue, handler: JsValue) -> Result<(), JsValue> {
        let name = name
            .as_string()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| to_js(Error::MissingHandlerName))?;
        let handler = handler
            .dyn_into::<Function>()
            .map_err(|_| to_js(Error::MissingHandler))?;

        self.inner
            .borrow_mut()
            .validation
            .add_custom_validation(&name, move |cx: &RuleContext<'_, WebDom>| {
                handler
                    .call1(&JsValue::NULL, cx.field)
                    .map(|result| result.is_truthy())
                    .unwrap_or(false)
            })
            .map_err(to_js)
    }

    /// Messages of the last pass
    #[wasm_bindgen(js_name = errorMessages)]
    pub fn error_messages(&self) -> Result<JsValue, JsValue> {
        let inner = self.inner.borrow();
        Ok(serde_wasm_bindgen::to_value(inner.validation.error_messages())?)
    }

    /// Effective options, defaults included
    pub fn options(&self) -> Result<JsValue, JsValue> {
        let inner = self.inner.borrow();
        Ok(serde_wasm_bindgen::to_value(inner.validation.options())?)
    }
}

/// Adds one DOM listener per recorded listener entry. The closures live as
/// long as the page and keep the controller alive with them.
fn attach(inner: &Rc<RefCell<Inner>>, deferred: &Deferred) -> Result<(), JsValue> {
    let entries: Vec<(Element, EventKind)> = inner
        .borrow()
        .validation
        .listeners()
        .iter()
        .map(|listener| (listener.target.clone(), listener.kind))
        .collect();

    let mut seen: Vec<(Element, EventKind)> = Vec::new();

    for (target, kind) in entries {
        // dispatch runs every action recorded for (target, kind)
        if seen.contains(&(target.clone(), kind)) {
            continue;
        }
        seen.push((target.clone(), kind));

        let inner = Rc::clone(inner);
        let deferred = deferred.clone();
        let element = target.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let result = inner.borrow_mut().dispatch(&element, &event);
            if let Ok(true) = result {
                event.prevent_default();
            }
            deferred.flush();
            if let Err(e) = result {
                wasm_bindgen::throw_str(&e.to_string());
            }
        });

        target.add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}
