//! Core types for sprig.
//!
//! These types define what a declarative tree can carry: property values
//! staged on virtual nodes, and the event callbacks a host fires back into.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

// =============================================================================
// Events
// =============================================================================

/// Callback bound to a host event.
///
/// Using `Rc<dyn Fn>` instead of `Box<dyn Fn>` allows cloning callbacks
/// into the host's listener table without ownership issues.
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// Payload the host hands back when a bound event fires.
///
/// The core never constructs these itself; it only routes handlers to the
/// host. `detail` carries whatever host-specific data the event has.
#[derive(Debug, Clone)]
pub struct Event {
    /// Host event name, e.g. `click`.
    pub name: String,
    /// Host-specific event data.
    pub detail: Value,
}

impl Event {
    /// Create an event with no detail payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: Value::Null,
        }
    }

    /// Create an event carrying a detail payload.
    pub fn with_detail(name: impl Into<String>, detail: Value) -> Self {
        Self {
            name: name.into(),
            detail,
        }
    }
}

// =============================================================================
// Property values
// =============================================================================

/// A property value staged on a virtual node.
///
/// Scalar variants compare by value. `Handler` is composite and compares
/// by identity (`Rc::ptr_eq`): two closures with the same body are still
/// different properties.
#[derive(Clone)]
pub enum PropValue {
    /// String-valued property.
    Text(String),
    /// Numeric property.
    Number(f64),
    /// Boolean property.
    Bool(bool),
    /// Event callback, bound rather than set when the name matches `on*`.
    Handler(EventHandler),
}

impl PropValue {
    /// Wrap a closure as a handler property.
    pub fn handler(f: impl Fn(&Event) + 'static) -> Self {
        PropValue::Handler(Rc::new(f))
    }

    /// The string value, if this is a text property.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric value, if this is a number property.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean value, if this is a bool property.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The callback, if this is a handler property.
    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(h) => Some(h),
            _ => None,
        }
    }

    /// Whether this property is a scalar (non-handler) value.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, PropValue::Handler(_))
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            // Identity, not structure: a re-created closure is a new value.
            (PropValue::Handler(a), PropValue::Handler(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            PropValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            PropValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            PropValue::Handler(h) => write!(f, "Handler({:p})", Rc::as_ptr(h)),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

// =============================================================================
// Tests
// =============================================================================
