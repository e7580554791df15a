use std::{cmp::Ordering, fmt, rc::Rc};

use indexmap::IndexMap;

use super::EvalError;

/// Runtime values flowing through spec bodies and matchers.
///
/// Lists and objects are reference counted: binding the same list twice yields two
/// handles to one value, which is what identity (`===`) compares.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Rc<Vec<Value>>),
    Object(Rc<IndexMap<String, Value>>),
    /// A primitive wrapped in an object; matchers compare the wrapped primitive.
    Boxed(Box<Value>),
    /// A constructor such as `String` or `Array`, used by `be_a`.
    Type(TypeName),
    Callable(Callable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum TypeName {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Function,
}

/// A zero-argument operation, used by `throw_error`.
#[derive(Clone)]
pub struct Callable {
    source: Rc<str>,
    invoke: Rc<dyn Fn() -> Result<Value, EvalError>>,
}

impl Callable {
    pub fn new<F>(source: impl Into<Rc<str>>, invoke: F) -> Self
    where
        F: Fn() -> Result<Value, EvalError> + 'static,
    {
        Self {
            source: source.into(),
            invoke: Rc::new(invoke),
        }
    }

    pub fn call(&self) -> Result<Value, EvalError> {
        (self.invoke)()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.invoke, &other.invoke)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.source)
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(Rc::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn boxed(value: Value) -> Self {
        Value::Boxed(Box::new(value))
    }

    /// Primitive projection: boxed values unwrap to what they hold.
    pub fn unboxed(self) -> Value {
        match self {
            Value::Boxed(inner) => inner.unboxed(),
            other => other,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Value::List(_) | Value::Object(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_) | Value::Type(_))
    }

    /// Dynamic type name, as reported by `typeof`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Null | Value::List(_) | Value::Object(_) | Value::Boxed(_) => "object",
            Value::Type(_) | Value::Callable(_) => "function",
        }
    }

    /// The constructor a value was built with. Absent values have none.
    pub fn constructor(&self) -> Option<TypeName> {
        match self {
            Value::Undefined | Value::Null => None,
            Value::Bool(_) => Some(TypeName::Boolean),
            Value::Number(_) => Some(TypeName::Number),
            Value::String(_) => Some(TypeName::String),
            Value::List(_) => Some(TypeName::Array),
            Value::Object(_) => Some(TypeName::Object),
            Value::Boxed(inner) => inner.constructor(),
            Value::Type(_) | Value::Callable(_) => Some(TypeName::Function),
        }
    }

    pub fn length(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Boxed(inner) => inner.length(),
            _ => None,
        }
    }

    /// Property lookup; anything missing is `undefined`.
    pub fn property(&self, name: &str) -> Value {
        match self {
            Value::Object(fields) if fields.contains_key(name) => {
                fields.get(name).cloned().unwrap_or_default()
            }
            Value::List(items) if name.parse::<usize>().is_ok() => name
                .parse::<usize>()
                .ok()
                .and_then(|idx| items.get(idx).cloned())
                .unwrap_or_default(),
            Value::Boxed(inner) => inner.property(name),
            _ => match name {
                "length" => self
                    .length()
                    .map(|len| Value::Number(len as f64))
                    .unwrap_or_default(),
                "constructor" => self.constructor().map(Value::Type).unwrap_or_default(),
                _ => Value::Undefined,
            },
        }
    }

    /// Own enumerable fields in enumeration order. Lists enumerate their indices.
    pub fn fields(&self) -> Vec<(String, &Value)> {
        match self {
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(idx, v)| (idx.to_string(), v))
                .collect(),
            Value::Object(fields) => fields.iter().map(|(k, v)| (k.clone(), v)).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Boxed(inner) => inner.to_number(),
            Value::List(_) | Value::Object(_) => string_to_number(&self.stringify()),
            Value::Type(_) | Value::Callable(_) => f64::NAN,
        }
    }

    /// The value's own string form.
    pub fn stringify(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.stringify(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Boxed(inner) => inner.stringify(),
            Value::Type(name) => name.to_string(),
            Value::Callable(callable) => callable.source().to_string(),
        }
    }

    /// Rendering used in assertion messages.
    pub fn printed(&self) -> String {
        match self {
            Value::Undefined => String::new(),
            Value::Null => "null".to_string(),
            Value::String(s) => format!("'{}'", s),
            Value::List(_) => format!("[{}]", self.stringify()),
            other => other.stringify(),
        }
    }

    /// `===`: same type and value; composites and callables by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Boxed(a), Value::Boxed(b)) => std::ptr::eq(a.as_ref(), b.as_ref()),
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// `==`: loose equality with the usual coercions between numbers, strings,
    /// booleans and composites.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
            (Value::Bool(_), _) => Value::Number(self.to_number()).loose_eq(other),
            (_, Value::Bool(_)) => self.loose_eq(&Value::Number(other.to_number())),
            (Value::Number(a), Value::String(_)) => *a == other.to_number(),
            (Value::String(_), Value::Number(b)) => self.to_number() == *b,
            (Value::Boxed(a), _) => a.loose_eq(other),
            (_, Value::Boxed(b)) => self.loose_eq(b),
            (Value::List(_) | Value::Object(_), Value::Number(_) | Value::String(_)) => {
                Value::String(self.stringify()).loose_eq(other)
            }
            (Value::Number(_) | Value::String(_), Value::List(_) | Value::Object(_)) => {
                self.loose_eq(&Value::String(other.stringify()))
            }
            _ => self.strict_eq(other),
        }
    }

    /// Relational ordering used by `<`, `>`, `<=`, `>=`. Strings compare
    /// lexicographically, everything else numerically; `None` when incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stringify())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(fields) => f.debug_map().entries(fields.iter()).finish(),
            Value::Boxed(inner) => write!(f, "Boxed({:?})", inner),
            Value::Type(name) => write!(f, "Type({})", name),
            Value::Callable(callable) => write!(f, "{:?}", callable),
        }
    }
}

/// Structural comparison for tests and change detection; unlike [`Value::strict_eq`]
/// composites compare by content.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Boxed(a), Value::Boxed(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self.strict_eq(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}
