//! The user-facing checker facade.
//!
//! A `Checker` is bound to one type at construction time and holds two
//! compiled functions, plain and strict. `create_checkers` builds one
//! checker per named type in the given suites, layered over the
//! built-in suite.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tyck_common::{CompileError, ErrorDetail, FacadeError, ValidationError, Value};
use tyck_types::{TFunc, TIface, TType, TypeSuite, builtin_suite};

use crate::compile::{CheckFn, CompileFlags, Compiler};
use crate::context::Ctx;

/// The default root path used in rendered error messages.
const DEFAULT_PATH: &str = "value";

/// A validator bound to one type.
///
/// Checkers are immutable after construction and safe to share across
/// threads (e.g. behind `Arc`); every call builds its own diagnostic
/// context.
pub struct Checker {
    suite: Arc<TypeSuite>,
    ttype: TType,
    plain: CheckFn,
    strict: CheckFn,
    path: String,
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Checker {
    /// Compile a checker for an ad-hoc type against the built-in suite
    /// plus the given suites.
    pub fn new(suites: &[TypeSuite], ttype: impl Into<TType>) -> Result<Checker, CompileError> {
        Checker::for_type(Arc::new(merge_suites(suites)), ttype.into(), DEFAULT_PATH.to_string())
    }

    fn for_type(suite: Arc<TypeSuite>, ttype: TType, path: String) -> Result<Checker, CompileError> {
        let (plain, strict) = {
            let mut compiler = Compiler::new(&suite);
            (
                compiler.compile(&ttype, CompileFlags::empty())?,
                compiler.compile(&ttype, CompileFlags::STRICT)?,
            )
        };
        Ok(Checker {
            suite,
            ttype,
            plain,
            strict,
            path,
        })
    }

    /// Override the root path prefix used in error messages.
    pub fn set_reported_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// The underlying type node.
    pub fn get_type(&self) -> &TType {
        &self.ttype
    }

    /// Fast boolean conformance test; tolerates unknown properties.
    pub fn test(&self, value: &Value) -> bool {
        let mut ctx = Ctx::noop();
        (self.plain)(value, &mut ctx)
    }

    /// Like `test`, but unknown properties and excess tuple elements are
    /// rejected.
    pub fn strict_test(&self, value: &Value) -> bool {
        let mut ctx = Ctx::noop();
        (self.strict)(value, &mut ctx)
    }

    /// Err with a rendered diagnostic if the value does not conform.
    pub fn check(&self, value: &Value) -> Result<(), ValidationError> {
        run_check(&self.plain, value, &self.path)
    }

    pub fn strict_check(&self, value: &Value) -> Result<(), ValidationError> {
        run_check(&self.strict, value, &self.path)
    }

    /// Every failure location, or `None` when the value conforms.
    pub fn validate(&self, value: &Value) -> Option<Vec<ErrorDetail>> {
        run_validate(&self.plain, value, &self.path)
    }

    pub fn strict_validate(&self, value: &Value) -> Option<Vec<ErrorDetail>> {
        run_validate(&self.strict, value, &self.path)
    }

    /// A checker for one property of the bound interface type, reported
    /// under `path.name`. Inherited properties are found through bases.
    pub fn get_prop(&self, name: &str) -> Result<Checker, FacadeError> {
        let iface = self.as_iface()?;
        let Some(ttype) = self.lookup_prop(iface, name)? else {
            return Err(FacadeError::NoSuchProperty(name.to_string()));
        };
        Ok(Checker::for_type(
            self.suite.clone(),
            ttype,
            format!("{}.{}", self.path, name),
        )?)
    }

    /// A checker for the argument list of the named method, for
    /// validating argument arrays.
    pub fn method_args(&self, name: &str) -> Result<Checker, FacadeError> {
        let func = self.method_type(name)?;
        Ok(Checker::for_type(
            self.suite.clone(),
            TType::ParamList(func.params),
            format!("{}.{}", self.path, name),
        )?)
    }

    /// A checker for the result type of the named method.
    pub fn method_result(&self, name: &str) -> Result<Checker, FacadeError> {
        let func = self.method_type(name)?;
        Ok(Checker::for_type(
            self.suite.clone(),
            *func.result,
            format!("{}.{}", self.path, name),
        )?)
    }

    /// A checker for the parameter list of the bound function type.
    pub fn get_args(&self) -> Result<Checker, FacadeError> {
        let func = self.as_func()?;
        Ok(Checker::for_type(
            self.suite.clone(),
            TType::ParamList(func.params),
            self.path.clone(),
        )?)
    }

    /// A checker for the result type of the bound function type.
    pub fn get_result(&self) -> Result<Checker, FacadeError> {
        let func = self.as_func()?;
        Ok(Checker::for_type(
            self.suite.clone(),
            *func.result,
            self.path.clone(),
        )?)
    }

    /// The bound node, resolved through name indirections.
    fn resolved(&self) -> Result<&TType, CompileError> {
        let mut t = &self.ttype;
        let mut hops = 0;
        while let TType::Name(n) = t {
            t = self
                .suite
                .get(&n.name)
                .ok_or_else(|| CompileError::UnknownType(n.name.clone()))?;
            hops += 1;
            if hops > self.suite.len() {
                return Err(CompileError::UnknownType(n.name.clone()));
            }
        }
        Ok(t)
    }

    fn as_iface(&self) -> Result<&TIface, FacadeError> {
        match self.resolved()? {
            TType::Iface(iface) => Ok(iface),
            _ => Err(FacadeError::NotAnInterface),
        }
    }

    fn as_func(&self) -> Result<TFunc, FacadeError> {
        match self.resolved()? {
            TType::Func(func) => Ok(func.clone()),
            _ => Err(FacadeError::NotAFunction),
        }
    }

    /// Own properties first, then transitive bases.
    fn lookup_prop(&self, iface: &TIface, name: &str) -> Result<Option<TType>, CompileError> {
        for p in &iface.props {
            if p.name == name {
                return Ok(Some(p.ttype.clone()));
            }
        }
        for base in &iface.bases {
            let mut t = self
                .suite
                .get(base)
                .ok_or_else(|| CompileError::UnknownType(base.clone()))?;
            let mut hops = 0;
            while let TType::Name(n) = t {
                hops += 1;
                if hops > self.suite.len() {
                    return Err(CompileError::UnknownType(n.name.clone()));
                }
                t = self
                    .suite
                    .get(&n.name)
                    .ok_or_else(|| CompileError::UnknownType(n.name.clone()))?;
            }
            if let TType::Iface(b) = t {
                if let Some(found) = self.lookup_prop(b, name)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }

    fn method_type(&self, name: &str) -> Result<TFunc, FacadeError> {
        let iface = self.as_iface()?;
        let Some(mut ttype) = self.lookup_prop(iface, name)? else {
            return Err(FacadeError::NoSuchProperty(name.to_string()));
        };
        let mut hops = 0;
        loop {
            match ttype {
                TType::Func(func) => return Ok(func),
                TType::Optional(opt) => ttype = *opt.inner,
                TType::Name(n) => {
                    hops += 1;
                    if hops > self.suite.len() {
                        return Err(CompileError::UnknownType(n.name).into());
                    }
                    ttype = self
                        .suite
                        .get(&n.name)
                        .ok_or_else(|| CompileError::UnknownType(n.name.clone()))
                        .map_err(FacadeError::from)?
                        .clone();
                }
                _ => return Err(FacadeError::NotAMethod(name.to_string())),
            }
        }
    }
}

fn run_check(checker: &CheckFn, value: &Value, path: &str) -> Result<(), ValidationError> {
    // exploratory pass first; build the message only on failure
    let mut probe = Ctx::noop();
    if checker(value, &mut probe) {
        return Ok(());
    }
    let mut ctx = Ctx::detail();
    checker(value, &mut ctx);
    Err(ctx.error(path))
}

fn run_validate(checker: &CheckFn, value: &Value, path: &str) -> Option<Vec<ErrorDetail>> {
    let mut probe = Ctx::noop();
    if checker(value, &mut probe) {
        return None;
    }
    let mut ctx = Ctx::detail();
    checker(value, &mut ctx);
    Some(ctx.error_details(path))
}

fn merge_suites(suites: &[TypeSuite]) -> TypeSuite {
    let mut merged = builtin_suite().clone();
    for suite in suites {
        merged.extend(suite);
    }
    merged
}

/// Create one checker per type named in the given suites, layered over
/// the built-in suite; later suites override earlier ones.
pub fn create_checkers(suites: &[TypeSuite]) -> Result<IndexMap<String, Checker>, CompileError> {
    let merged = Arc::new(merge_suites(suites));
    let mut checkers = IndexMap::new();
    for suite in suites {
        for (name, ttype) in suite.iter() {
            let checker =
                Checker::for_type(merged.clone(), ttype.clone(), DEFAULT_PATH.to_string())?;
            checkers.insert(name.to_string(), checker);
        }
    }
    tracing::debug!(count = checkers.len(), "created checkers");
    Ok(checkers)
}
