//! Free-function constructors for assembling type graphs.
//!
//! These mirror the constructor set of the upstream type-description
//! format: `name`, `lit`, `array`, `tuple`, `rest`, `union`,
//! `intersection`, `partial`, `enumtype`, `enumlit`, `iface`, `opt`,
//! `func`, `param`. Everywhere a type is expected, a `&str` works as a
//! shorthand for `name(..)`.

use crate::node::{
    Lit, TArray, TEnum, TEnumLiteral, TFunc, TIface, TIntersection, TLiteral, TName, TOptional,
    TParam, TParamList, TPartial, TProp, TRest, TTuple, TType, TUnion,
};

/// The sentinel property name that encodes an interface's index
/// signature. At most one per interface; string and numeric keys are not
/// distinguished.
pub const INDEX_KEY: &str = "[key]";

/// A reference to a named type in the suite.
pub fn name(name: impl Into<String>) -> TType {
    TType::Name(TName::new(name))
}

/// An exact scalar value.
pub fn lit(value: impl Into<Lit>) -> TType {
    TType::Literal(TLiteral::new(value.into()))
}

/// An array of uniform element type.
pub fn array(item: impl Into<TType>) -> TType {
    TType::Array(TArray {
        item: Box::new(item.into()),
    })
}

/// A fixed-arity tuple. A trailing `rest(..)` element becomes the
/// variadic tail.
pub fn tuple<I, T>(items: I) -> TType
where
    I: IntoIterator<Item = T>,
    T: Into<TType>,
{
    TType::Tuple(TTuple::new(items.into_iter().map(Into::into).collect()))
}

/// A variadic tuple tail. Only valid as the last element of `tuple(..)`.
pub fn rest(item: impl Into<TType>) -> TType {
    TType::Rest(TRest {
        item: Box::new(item.into()),
        start: 0,
    })
}

/// A value satisfying at least one alternative.
pub fn union<I, T>(alts: I) -> TType
where
    I: IntoIterator<Item = T>,
    T: Into<TType>,
{
    TType::Union(TUnion::new(alts.into_iter().map(Into::into).collect()))
}

/// A value satisfying every member.
pub fn intersection<I, T>(members: I) -> TType
where
    I: IntoIterator<Item = T>,
    T: Into<TType>,
{
    TType::Intersection(TIntersection {
        members: members.into_iter().map(Into::into).collect(),
    })
}

/// Every required property of the inner type becomes optional; the
/// absent value is accepted outright.
pub fn partial(inner: impl Into<TType>) -> TType {
    TType::Partial(TPartial {
        inner: Box::new(inner.into()),
    })
}

/// An enum: a name → scalar mapping.
pub fn enumtype<I, S, L>(members: I) -> TType
where
    I: IntoIterator<Item = (S, L)>,
    S: Into<String>,
    L: Into<Lit>,
{
    TType::Enum(TEnum {
        members: members
            .into_iter()
            .map(|(member, value)| (member.into(), value.into()))
            .collect(),
    })
}

/// A single member of a named enum.
pub fn enumlit(enum_name: impl Into<String>, member: impl Into<String>) -> TType {
    TType::EnumLiteral(TEnumLiteral::new(enum_name, member))
}

/// An interface: named bases plus own properties.
pub fn iface<P>(bases: &[&str], props: P) -> TType
where
    P: IntoIterator<Item = TProp>,
{
    TType::Iface(TIface {
        bases: bases.iter().map(|b| b.to_string()).collect(),
        props: props.into_iter().collect(),
    })
}

/// One interface property. Wrap the type in `opt(..)` to make it
/// optional.
pub fn prop(name: impl Into<String>, ttype: impl Into<TType>) -> TProp {
    TProp {
        name: name.into(),
        ttype: ttype.into(),
        optional: false,
    }
}

/// Marks a property or parameter type as omissible.
pub fn opt(inner: impl Into<TType>) -> TType {
    TType::Optional(TOptional {
        inner: Box::new(inner.into()),
    })
}

/// A function signature: result type plus parameters.
pub fn func<I>(result: impl Into<TType>, params: I) -> TType
where
    I: IntoIterator<Item = TParam>,
{
    TType::Func(TFunc {
        params: TParamList {
            params: params.into_iter().collect(),
        },
        result: Box::new(result.into()),
    })
}

/// One function parameter. Wrap the type in `opt(..)` to make it
/// optional.
pub fn param(name: impl Into<String>, ttype: impl Into<TType>) -> TParam {
    TParam {
        name: name.into(),
        ttype: ttype.into(),
        optional: false,
    }
}
