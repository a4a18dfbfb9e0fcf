//! Checker compilation.
//!
//! A `Compiler` walks a type node and produces a checker closure per
//! (type, mode) pair. Checkers are pure once compiled; the only mutable
//! compilation state is the per-name cache whose in-progress slot doubles
//! as the recursion trampoline for cyclic type definitions.

use std::sync::{Arc, OnceLock};

use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet};
use tyck_common::{CompileError, Value};
use tyck_types::{
    INDEX_KEY, TArray, TBasic, TEnum, TEnumLiteral, TIface, TIntersection, TLiteral, TName,
    TOptional, TParamList, TPartial, TRest, TTuple, TType, TUnion, TypeSuite,
};

use crate::context::{Ctx, Key};

bitflags! {
    /// Compilation modes. Every (type, flags) pair compiles to one
    /// independent checker.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CompileFlags: u8 {
        /// Reject unknown object keys and excess tuple elements.
        const STRICT = 1 << 0;
        /// Missing required interface properties are tolerated.
        const PARTIAL = 1 << 1;
    }
}

/// A compiled checker: writes failure frames into the context on
/// rejection. Checkers are immutable once compiled and may be invoked
/// from multiple threads concurrently, provided the diagnostic context
/// per invocation is unshared.
pub type CheckFn = Arc<dyn Fn(&Value, &mut Ctx) -> bool + Send + Sync>;

// Stack headroom for deeply recursive data. Grown at the named-type
// recursion points, the only place checkers can nest unboundedly.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

enum NameSlot {
    /// Compilation for this name is on the stack; the slot is sealed
    /// before any checker can run.
    InProgress(Arc<OnceLock<CheckFn>>),
    Done(CheckFn),
}

/// Strict-mode property allowance for one object level: an interface,
/// its transitive bases, and sibling intersection conjuncts all
/// contribute to the same set.
#[derive(Default)]
struct AllowedProps {
    names: FxHashSet<String>,
    has_index: bool,
    /// Set when at least one interface contributed; levels without an
    /// interface never scan for extraneous keys.
    active: bool,
}

pub(crate) struct Compiler<'a> {
    suite: &'a TypeSuite,
    cache: FxHashMap<(String, CompileFlags), NameSlot>,
    /// Interface bases currently being compiled; a repeat is a cycle.
    base_stack: Vec<String>,
}

impl<'a> Compiler<'a> {
    pub fn new(suite: &'a TypeSuite) -> Self {
        Compiler {
            suite,
            cache: FxHashMap::default(),
            base_stack: Vec::new(),
        }
    }

    fn resolve(&self, name: &str) -> Result<&'a TType, CompileError> {
        self.suite
            .get(name)
            .ok_or_else(|| CompileError::UnknownType(name.to_string()))
    }

    /// Resolve through name indirections to a concrete node.
    fn resolve_deep<'t>(&self, ttype: &'t TType) -> Result<&'t TType, CompileError>
    where
        'a: 't,
    {
        let mut t = ttype;
        let mut hops = 0;
        while let TType::Name(n) = t {
            t = self.resolve(&n.name)?;
            hops += 1;
            if hops > self.suite.len() {
                return Err(CompileError::UnknownType(n.name.clone()));
            }
        }
        Ok(t)
    }

    /// Compile a type at a fresh value position. In strict mode this
    /// computes the level's allowed-property set and wraps the checker
    /// with the extraneous-key scan; an index signature anywhere at the
    /// level replaces the scan with per-key validation.
    pub fn compile(&mut self, ttype: &TType, flags: CompileFlags) -> Result<CheckFn, CompileError> {
        let inner = self.compile_node(ttype, flags)?;
        if !flags.contains(CompileFlags::STRICT) {
            return Ok(inner);
        }
        let mut allowed = AllowedProps::default();
        let mut seen = FxHashSet::default();
        self.collect_allowed(ttype, &mut allowed, &mut seen)?;
        if !allowed.active || allowed.has_index {
            return Ok(inner);
        }
        let names = allowed.names;
        let extraneous: Arc<str> = Arc::from("is extraneous");
        Ok(Arc::new(move |value, ctx| {
            if !inner(value, ctx) {
                return false;
            }
            let Value::Object(map) = value else {
                return true;
            };
            let mut ok = true;
            for key in map.keys() {
                if names.contains(key.as_str()) {
                    continue;
                }
                let mut f = ctx.fork();
                f.fail(Key::Prop(Arc::from(key.as_str())), Some(&extraneous), 2);
                ok = false;
                if !ctx.complete_fork(f) {
                    return false;
                }
            }
            ok
        }))
    }

    /// Accumulate the property names admitted at one object level.
    /// Interface bases and intersection conjuncts share the accumulator;
    /// name, partial and optional nodes pass through; everything else
    /// contributes nothing.
    fn collect_allowed(
        &self,
        ttype: &TType,
        allowed: &mut AllowedProps,
        seen: &mut FxHashSet<String>,
    ) -> Result<(), CompileError> {
        match ttype {
            TType::Iface(i) => {
                allowed.active = true;
                for p in &i.props {
                    if p.name == INDEX_KEY {
                        allowed.has_index = true;
                    } else {
                        allowed.names.insert(p.name.clone());
                    }
                }
                for base in &i.bases {
                    if seen.insert(base.clone()) {
                        self.collect_allowed(self.resolve(base)?, allowed, seen)?;
                    }
                }
                Ok(())
            }
            TType::Intersection(x) => {
                for member in &x.members {
                    self.collect_allowed(member, allowed, seen)?;
                }
                Ok(())
            }
            TType::Name(n) => {
                if seen.insert(n.name.clone()) {
                    self.collect_allowed(self.resolve(&n.name)?, allowed, seen)?;
                }
                Ok(())
            }
            TType::Partial(p) => self.collect_allowed(&p.inner, allowed, seen),
            TType::Optional(o) => self.collect_allowed(&o.inner, allowed, seen),
            _ => Ok(()),
        }
    }

    /// Compile one node without starting a new object level.
    fn compile_node(&mut self, ttype: &TType, flags: CompileFlags) -> Result<CheckFn, CompileError> {
        match ttype {
            TType::Basic(b) => Ok(Self::compile_basic(b)),
            TType::Name(n) => self.compile_name(n, flags),
            TType::Literal(l) => Ok(Self::compile_literal(l)),
            TType::Array(a) => self.compile_array(a, flags),
            TType::Tuple(t) => self.compile_tuple(t, flags),
            TType::Rest(_) => Err(CompileError::MisplacedRest),
            TType::Union(u) => self.compile_union(u, flags),
            TType::Intersection(x) => self.compile_intersection(x, flags),
            TType::Partial(p) => self.compile_partial(p, flags),
            TType::Enum(e) => Ok(Self::compile_enum(e)),
            TType::EnumLiteral(el) => self.compile_enum_literal(el),
            TType::Iface(i) => self.compile_iface(i, flags),
            TType::Optional(o) => self.compile_optional(o, flags),
            TType::Func(_) => Ok(Self::compile_func()),
            TType::ParamList(p) => self.compile_param_list(p, flags),
        }
    }

    fn compile_basic(basic: &TBasic) -> CheckFn {
        let pred = basic.pred;
        let message: Arc<str> = Arc::from(basic.message);
        Arc::new(move |value, ctx| pred(value) || ctx.fail(Key::None, Some(&message), 0))
    }

    fn compile_literal(literal: &TLiteral) -> CheckFn {
        let lit = literal.value.clone();
        let message: Arc<str> = Arc::from(literal.fail_message.as_str());
        Arc::new(move |value, ctx| lit.matches(value) || ctx.fail(Key::None, Some(&message), -1))
    }

    fn compile_name(&mut self, tname: &TName, flags: CompileFlags) -> Result<CheckFn, CompileError> {
        let key = (tname.name.clone(), flags);
        match self.cache.get(&key) {
            Some(NameSlot::Done(checker)) => return Ok(checker.clone()),
            Some(NameSlot::InProgress(slot)) => {
                // recursive reference: defer through the slot
                let slot = slot.clone();
                return Ok(Arc::new(move |value, ctx| {
                    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || match slot.get() {
                        Some(checker) => checker(value, ctx),
                        None => false,
                    })
                }));
            }
            None => {}
        }

        tracing::trace!(name = %tname.name, ?flags, "compiling named type");
        let slot = Arc::new(OnceLock::new());
        self.cache
            .insert(key.clone(), NameSlot::InProgress(slot.clone()));
        let target = match self.resolve(&tname.name) {
            Ok(t) => t,
            Err(err) => {
                self.cache.remove(&key);
                return Err(err);
            }
        };
        let compiled = match self.compile_node(target, flags) {
            Ok(f) => f,
            Err(err) => {
                self.cache.remove(&key);
                return Err(err);
            }
        };

        // Append "is not a Name" on failure, except when the target is
        // itself a basic or a name (which already carry a message layer).
        let checker: CheckFn = if matches!(target, TType::Basic(_) | TType::Name(_)) {
            compiled
        } else {
            let message: Arc<str> = Arc::from(tname.fail_message.as_str());
            Arc::new(move |value, ctx| {
                stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
                    if compiled(value, ctx) {
                        true
                    } else {
                        ctx.fail(Key::None, Some(&message), 0)
                    }
                })
            })
        };
        let _ = slot.set(checker.clone());
        self.cache.insert(key, NameSlot::Done(checker.clone()));
        Ok(checker)
    }

    fn compile_array(&mut self, arr: &TArray, flags: CompileFlags) -> Result<CheckFn, CompileError> {
        let item = self.compile(&arr.item, flags)?;
        let message: Arc<str> = Arc::from("is not an array");
        Ok(Arc::new(move |value, ctx| {
            let Value::Array(items) = value else {
                return ctx.fail(Key::None, Some(&message), 0);
            };
            let mut ok = true;
            for (i, v) in items.iter().enumerate() {
                let mut f = ctx.fork();
                if !item(v, &mut f) {
                    f.fail(Key::Index(i), None, 1);
                    ok = false;
                }
                if !ctx.complete_fork(f) {
                    return false;
                }
            }
            ok
        }))
    }

    fn compile_tuple(&mut self, tuple: &TTuple, flags: CompileFlags) -> Result<CheckFn, CompileError> {
        let items: Vec<CheckFn> = tuple
            .items
            .iter()
            .map(|t| self.compile(t, flags))
            .collect::<Result<_, _>>()?;
        let rest = match &tuple.rest {
            Some(r) => Some(self.compile_rest(r, flags)?),
            None => None,
        };
        let strict = flags.contains(CompileFlags::STRICT);
        let arity = items.len();
        let not_array: Arc<str> = Arc::from("is not an array");
        let extraneous: Arc<str> = Arc::from("is extraneous");
        Ok(Arc::new(move |value, ctx| {
            let Value::Array(vals) = value else {
                return ctx.fail(Key::None, Some(&not_array), 0);
            };
            let mut ok = true;
            for (i, item) in items.iter().enumerate() {
                let v = vals.get(i).unwrap_or(&Value::Undefined);
                let mut f = ctx.fork();
                if !item(v, &mut f) {
                    f.fail(Key::Index(i), None, 1);
                    ok = false;
                }
                if !ctx.complete_fork(f) {
                    return false;
                }
            }
            if let Some(rest) = &rest {
                if !rest(value, ctx) {
                    ok = false;
                }
            } else if strict && vals.len() > arity {
                let mut f = ctx.fork();
                f.fail(Key::Index(arity), Some(&extraneous), 2);
                ok = false;
                if !ctx.complete_fork(f) {
                    return false;
                }
            }
            ok
        }))
    }

    /// A rest tail `...T[]` validates each element of the sequence from
    /// its start offset against the array's element type.
    fn compile_rest(&mut self, rest: &TRest, flags: CompileFlags) -> Result<CheckFn, CompileError> {
        let inner = self.resolve_deep(&rest.item)?;
        let item = match inner {
            TType::Array(a) => self.compile(&a.item, flags)?,
            other => self.compile(other, flags)?,
        };
        let start = rest.start;
        Ok(Arc::new(move |value, ctx| {
            let Value::Array(vals) = value else {
                // the owning tuple has already established the shape
                return false;
            };
            let mut ok = true;
            for i in start..vals.len() {
                let mut f = ctx.fork();
                if !item(&vals[i], &mut f) {
                    f.fail(Key::Index(i), None, 1);
                    ok = false;
                }
                if !ctx.complete_fork(f) {
                    return false;
                }
            }
            ok
        }))
    }

    fn compile_union(&mut self, union: &TUnion, flags: CompileFlags) -> Result<CheckFn, CompileError> {
        let alts: Vec<CheckFn> = union
            .alts
            .iter()
            .map(|t| self.compile(t, flags))
            .collect::<Result<_, _>>()?;
        let message: Arc<str> = Arc::from(union.fail_message.as_str());
        Ok(Arc::new(move |value, ctx| {
            let mut resolver = ctx.union_resolver();
            for alt in &alts {
                let mut branch = resolver.branch();
                if alt(value, &mut branch) {
                    return true;
                }
                resolver.commit(branch);
            }
            ctx.resolve_union(resolver);
            ctx.fail(Key::None, Some(&message), 0)
        }))
    }

    fn compile_intersection(
        &mut self,
        intersection: &TIntersection,
        flags: CompileFlags,
    ) -> Result<CheckFn, CompileError> {
        // conjuncts share this object level, so they are compiled
        // without starting a new one; the level's extraneous scan sees
        // the union of their property sets
        let members: Vec<CheckFn> = intersection
            .members
            .iter()
            .map(|t| self.compile_node(t, flags))
            .collect::<Result<_, _>>()?;
        Ok(Arc::new(move |value, ctx| {
            let mut ok = true;
            for member in &members {
                let mut f = ctx.fork();
                if !member(value, &mut f) {
                    ok = false;
                }
                if !ctx.complete_fork(f) {
                    return false;
                }
            }
            ok
        }))
    }

    fn compile_partial(
        &mut self,
        partial: &TPartial,
        flags: CompileFlags,
    ) -> Result<CheckFn, CompileError> {
        let inner = self.compile_node(&partial.inner, flags | CompileFlags::PARTIAL)?;
        Ok(Arc::new(move |value, ctx| {
            value.is_undefined() || inner(value, ctx)
        }))
    }

    fn compile_enum(tenum: &TEnum) -> CheckFn {
        let members: Vec<_> = tenum.members.values().cloned().collect();
        let message: Arc<str> = Arc::from("is not a valid enum value");
        Arc::new(move |value, ctx| {
            members.iter().any(|m| m.matches(value)) || ctx.fail(Key::None, Some(&message), -1)
        })
    }

    fn compile_enum_literal(&mut self, el: &TEnumLiteral) -> Result<CheckFn, CompileError> {
        let target = self.resolve_deep(self.resolve(&el.enum_name)?)?;
        let TType::Enum(tenum) = target else {
            return Err(CompileError::NotAnEnumType(el.enum_name.clone()));
        };
        let Some(lit) = tenum.members.get(&el.member) else {
            return Err(CompileError::UnknownEnumMember {
                enum_name: el.enum_name.clone(),
                member: el.member.clone(),
            });
        };
        let lit = lit.clone();
        let message: Arc<str> = Arc::from(el.fail_message.as_str());
        Ok(Arc::new(move |value, ctx| {
            lit.matches(value) || ctx.fail(Key::None, Some(&message), -1)
        }))
    }

    fn compile_iface(&mut self, iface: &TIface, flags: CompileFlags) -> Result<CheckFn, CompileError> {
        let mut bases = Vec::with_capacity(iface.bases.len());
        for base in &iface.bases {
            if self.base_stack.contains(base) {
                return Err(CompileError::CircularBases(base.clone()));
            }
            let target = self.resolve(base)?;
            self.base_stack.push(base.clone());
            let compiled = self.compile_node(target, flags);
            self.base_stack.pop();
            bases.push(compiled?);
        }

        struct PropSlot {
            name: Arc<str>,
            checker: CheckFn,
            required: bool,
        }
        let mut props = Vec::new();
        let mut index_sig: Option<CheckFn> = None;
        let mut declared: FxHashSet<String> = FxHashSet::default();
        for p in &iface.props {
            if p.name == INDEX_KEY {
                index_sig = Some(self.compile(&p.ttype, flags)?);
                continue;
            }
            let checker = self.compile(&p.ttype, flags)?;
            let optional = p.optional || matches!(p.ttype, TType::Optional(_));
            // required iff not optional and the type itself rejects the
            // absent value
            let required = !optional && !accepts_undefined(&checker);
            declared.insert(p.name.clone());
            props.push(PropSlot {
                name: Arc::from(p.name.as_str()),
                checker,
                required,
            });
        }

        let partial = flags.contains(CompileFlags::PARTIAL);
        let not_object: Arc<str> = Arc::from("is not an object");
        let missing: Arc<str> = Arc::from("is missing");
        Ok(Arc::new(move |value, ctx| {
            let Value::Object(map) = value else {
                return ctx.fail(Key::None, Some(&not_object), 0);
            };
            let mut ok = true;
            for base in &bases {
                let mut f = ctx.fork();
                if !base(value, &mut f) {
                    ok = false;
                }
                if !ctx.complete_fork(f) {
                    return false;
                }
            }
            for slot in &props {
                let v = map.get(slot.name.as_ref()).unwrap_or(&Value::Undefined);
                if v.is_undefined() {
                    if slot.required && !partial {
                        let mut f = ctx.fork();
                        f.fail(Key::Prop(slot.name.clone()), Some(&missing), 1);
                        ok = false;
                        if !ctx.complete_fork(f) {
                            return false;
                        }
                    }
                } else {
                    let mut f = ctx.fork();
                    if !(slot.checker)(v, &mut f) {
                        f.fail(Key::Prop(slot.name.clone()), None, 1);
                        ok = false;
                    }
                    if !ctx.complete_fork(f) {
                        return false;
                    }
                }
            }
            if let Some(index_sig) = &index_sig {
                // undeclared keys are validated, never flagged extraneous
                for (key, v) in map {
                    if declared.contains(key.as_str()) {
                        continue;
                    }
                    let mut f = ctx.fork();
                    if !index_sig(v, &mut f) {
                        f.fail(Key::Prop(Arc::from(key.as_str())), None, 1);
                        ok = false;
                    }
                    if !ctx.complete_fork(f) {
                        return false;
                    }
                }
            }
            ok
        }))
    }

    fn compile_optional(
        &mut self,
        optional: &TOptional,
        flags: CompileFlags,
    ) -> Result<CheckFn, CompileError> {
        let inner = self.compile_node(&optional.inner, flags)?;
        Ok(Arc::new(move |value, ctx| {
            value.is_undefined() || inner(value, ctx)
        }))
    }

    fn compile_func() -> CheckFn {
        let message: Arc<str> = Arc::from("is not a function");
        Arc::new(move |value, ctx| {
            matches!(value, Value::Function(_)) || ctx.fail(Key::None, Some(&message), 0)
        })
    }

    fn compile_param_list(
        &mut self,
        list: &TParamList,
        flags: CompileFlags,
    ) -> Result<CheckFn, CompileError> {
        struct ParamSlot {
            name: Arc<str>,
            checker: CheckFn,
            required: bool,
        }
        let params: Vec<ParamSlot> = list
            .params
            .iter()
            .map(|p| -> Result<ParamSlot, CompileError> {
                let checker = self.compile(&p.ttype, flags)?;
                let optional = p.optional || matches!(p.ttype, TType::Optional(_));
                let required = !optional && !accepts_undefined(&checker);
                Ok(ParamSlot {
                    name: Arc::from(p.name.as_str()),
                    checker,
                    required,
                })
            })
            .collect::<Result<_, _>>()?;
        let strict = flags.contains(CompileFlags::STRICT);
        let partial = flags.contains(CompileFlags::PARTIAL);
        let arity = params.len();
        let not_array: Arc<str> = Arc::from("is not an array");
        let missing: Arc<str> = Arc::from("is missing");
        let extraneous: Arc<str> = Arc::from("is extraneous");
        Ok(Arc::new(move |value, ctx| {
            let Value::Array(args) = value else {
                return ctx.fail(Key::None, Some(&not_array), 0);
            };
            let mut ok = true;
            for (i, slot) in params.iter().enumerate() {
                let v = args.get(i).unwrap_or(&Value::Undefined);
                if v.is_undefined() {
                    if slot.required && !partial {
                        let mut f = ctx.fork();
                        f.fail(Key::Prop(slot.name.clone()), Some(&missing), 1);
                        ok = false;
                        if !ctx.complete_fork(f) {
                            return false;
                        }
                    }
                } else {
                    let mut f = ctx.fork();
                    if !(slot.checker)(v, &mut f) {
                        f.fail(Key::Prop(slot.name.clone()), None, 1);
                        ok = false;
                    }
                    if !ctx.complete_fork(f) {
                        return false;
                    }
                }
            }
            if strict && args.len() > arity {
                let mut f = ctx.fork();
                f.fail(Key::Index(arity), Some(&extraneous), 2);
                ok = false;
                if !ctx.complete_fork(f) {
                    return false;
                }
            }
            ok
        }))
    }
}

/// Compile-time probe: does this checker accept the absent value?
fn accepts_undefined(checker: &CheckFn) -> bool {
    let mut probe = Ctx::noop();
    checker(&Value::Undefined, &mut probe)
}
