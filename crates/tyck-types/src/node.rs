//! The type-node algebra.
//!
//! A `TType` describes one type form as a tagged sum; a type graph is a
//! tree of `TType` nodes with `Name` nodes as indirections into a
//! `TypeSuite`. Nodes are immutable once constructed. Failure messages
//! that depend only on the node ("is not a Person", `is not "a"`) are
//! precomputed at construction time.

use std::fmt;

use indexmap::IndexMap;
use tyck_common::Value;

/// A literal scalar: the payload of `Literal` nodes and enum members.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Lit {
    /// Exact value equality against a dynamic value.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Lit::Bool(a), Value::Bool(b)) => a == b,
            (Lit::Number(a), Value::Number(b)) => a == b,
            (Lit::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lit::Bool(b) => write!(f, "{b}"),
            Lit::Number(n) => write!(f, "{}", format_number(*n)),
            Lit::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Render a number the way source literals are written: integral values
/// without a trailing `.0`.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<bool> for Lit {
    fn from(v: bool) -> Self {
        Lit::Bool(v)
    }
}

impl From<f64> for Lit {
    fn from(v: f64) -> Self {
        Lit::Number(v)
    }
}

impl From<i64> for Lit {
    fn from(v: i64) -> Self {
        Lit::Number(v as f64)
    }
}

impl From<&str> for Lit {
    fn from(v: &str) -> Self {
        Lit::String(v.to_string())
    }
}

impl From<String> for Lit {
    fn from(v: String) -> Self {
        Lit::String(v)
    }
}

/// A type node. One arm per type form.
#[derive(Debug, Clone)]
pub enum TType {
    Basic(TBasic),
    Name(TName),
    Literal(TLiteral),
    Array(TArray),
    Tuple(TTuple),
    Rest(TRest),
    Union(TUnion),
    Intersection(TIntersection),
    Partial(TPartial),
    Enum(TEnum),
    EnumLiteral(TEnumLiteral),
    Iface(TIface),
    Optional(TOptional),
    Func(TFunc),
    ParamList(TParamList),
}

/// String shorthand: `"number"` means `name("number")`, matching the
/// feel of suite definitions in the upstream ecosystem.
impl From<&str> for TType {
    fn from(name: &str) -> Self {
        TType::Name(TName::new(name))
    }
}

/// A leaf test over a primitive or native shape.
#[derive(Debug, Clone, Copy)]
pub struct TBasic {
    pub name: &'static str,
    pub pred: fn(&Value) -> bool,
    pub message: &'static str,
}

/// An indirect reference, resolved against a suite. Supports recursive
/// definitions.
#[derive(Debug, Clone)]
pub struct TName {
    pub name: String,
    /// Appended to failures of the resolved checker, e.g. "is not a Person".
    pub fail_message: String,
}

impl TName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let fail_message = format!("is not a {name}");
        TName { name, fail_message }
    }
}

/// Exact value equality against one scalar.
#[derive(Debug, Clone)]
pub struct TLiteral {
    pub value: Lit,
    pub fail_message: String,
}

impl TLiteral {
    pub fn new(value: Lit) -> Self {
        let fail_message = format!("is not {value}");
        TLiteral { value, fail_message }
    }
}

#[derive(Debug, Clone)]
pub struct TArray {
    pub item: Box<TType>,
}

/// Fixed-arity prefix with an optional variadic tail.
///
/// Construction lifts a trailing `Rest` out of the element list and
/// stamps it with the fixed-arity length; a `Rest` anywhere else is left
/// in place and rejected at compilation.
#[derive(Debug, Clone)]
pub struct TTuple {
    pub items: Vec<TType>,
    pub rest: Option<Box<TRest>>,
}

impl TTuple {
    pub fn new(mut items: Vec<TType>) -> Self {
        let mut rest = None;
        if matches!(items.last(), Some(TType::Rest(_))) {
            if let Some(TType::Rest(mut r)) = items.pop() {
                r.start = items.len();
                rest = Some(Box::new(r));
            }
        }
        TTuple { items, rest }
    }
}

/// Variadic tail of a tuple; `start` is the fixed-arity length of the
/// owning tuple.
#[derive(Debug, Clone)]
pub struct TRest {
    pub item: Box<TType>,
    pub start: usize,
}

/// Value satisfies at least one alternative.
#[derive(Debug, Clone)]
pub struct TUnion {
    pub alts: Vec<TType>,
    /// Summary used when no alternative gives a more specific diagnostic.
    pub fail_message: String,
}

impl TUnion {
    pub fn new(alts: Vec<TType>) -> Self {
        let names: Vec<String> = alts
            .iter()
            .filter_map(|t| match t {
                TType::Name(n) => Some(n.name.clone()),
                TType::Basic(b) => Some(b.name.to_string()),
                TType::Literal(l) => Some(l.value.to_string()),
                _ => None,
            })
            .collect();
        let fail_message = if names.is_empty() {
            format!("is none of {} types", alts.len())
        } else {
            format!("is none of {}", names.join(", "))
        };
        TUnion { alts, fail_message }
    }
}

/// Value satisfies every member.
#[derive(Debug, Clone)]
pub struct TIntersection {
    pub members: Vec<TType>,
}

/// Makes every required property of the inner type optional; also accepts
/// the absent value outright.
#[derive(Debug, Clone)]
pub struct TPartial {
    pub inner: Box<TType>,
}

/// A name → scalar mapping; a value must equal one of the mapped scalars.
#[derive(Debug, Clone)]
pub struct TEnum {
    pub members: IndexMap<String, Lit>,
}

/// A single member of a named enum.
#[derive(Debug, Clone)]
pub struct TEnumLiteral {
    pub enum_name: String,
    pub member: String,
    pub fail_message: String,
}

impl TEnumLiteral {
    pub fn new(enum_name: impl Into<String>, member: impl Into<String>) -> Self {
        let enum_name = enum_name.into();
        let member = member.into();
        let fail_message = format!("is not {enum_name}.{member}");
        TEnumLiteral {
            enum_name,
            member,
            fail_message,
        }
    }
}

/// An object shape: named bases to inherit from plus own properties.
/// An index signature is encoded as a property named `INDEX_KEY`.
#[derive(Debug, Clone)]
pub struct TIface {
    pub bases: Vec<String>,
    pub props: Vec<TProp>,
}

/// One interface property.
#[derive(Debug, Clone)]
pub struct TProp {
    pub name: String,
    pub ttype: TType,
    pub optional: bool,
}

/// Marks a property or parameter type as omissible.
#[derive(Debug, Clone)]
pub struct TOptional {
    pub inner: Box<TType>,
}

/// A function signature. At validation time only callability is checked;
/// the parameter list and result are navigable through the facade.
#[derive(Debug, Clone)]
pub struct TFunc {
    pub params: TParamList,
    pub result: Box<TType>,
}

/// Tuple-like structure used to validate argument arrays to methods.
#[derive(Debug, Clone)]
pub struct TParamList {
    pub params: Vec<TParam>,
}

/// One function parameter.
#[derive(Debug, Clone)]
pub struct TParam {
    pub name: String,
    pub ttype: TType,
    pub optional: bool,
}
