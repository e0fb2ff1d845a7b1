//! file: core/src/ir/lower/lower_expr.rs
//! description: expression lowering.
//!
//! `lower_exp` returns either a single value or, for a call, the call's
//! result pack. Expression kinds without a lowering yet are rejected with
//! their construct name.
//!
use crate::ast::{Exp, ExpKind, NumberClass, NumberLit, PrefixExp, Var, VarOrExp};
use crate::ir::value::{NumberValue, RefValue};
use crate::location::Located;

use super::err::LowerError;
use super::function_builder::FunctionBuilder;
use super::lower_call::lower_call;
use super::pack::{Lowered, adjust_to_one};

pub fn lower_exp(fb: &mut FunctionBuilder, exp: &Exp) -> Result<Lowered, LowerError> {
    match &exp.kind {
        ExpKind::Nil => {
            let loc = fb.start_loc(exp);
            Ok(Lowered::Value(fb.ops().nil(loc)?))
        }
        ExpKind::Number(lit) => {
            let value = number_value(lit).ok_or_else(|| match lit.class {
                NumberClass::HexFloat => LowerError::unsupported("hexfloat", fb.span(exp)),
                _ => LowerError::invariant(format!("malformed number literal '{}'", lit.text), Some(fb.start_loc(exp))),
            })?;
            let loc = fb.start_loc(exp);
            Ok(Lowered::Value(fb.ops().number(value, loc)?))
        }
        ExpKind::Prefix(prefix) => lower_prefixexp(fb, prefix, exp),
        other => Err(LowerError::unsupported(other.construct_name(), fb.span(exp))),
    }
}

/// Lower an expression list left to right. Only the last expression may
/// produce a pack.
pub fn lower_explist(fb: &mut FunctionBuilder, exps: &[Exp]) -> Result<Vec<Lowered>, LowerError> {
    let mut lowered = Vec::with_capacity(exps.len());
    for (index, exp) in exps.iter().enumerate() {
        let value = lower_exp(fb, exp)?;
        if value.is_pack() && index + 1 < exps.len() {
            return Err(LowerError::unsupported("multivalue", fb.span(exp)));
        }
        lowered.push(value);
    }
    Ok(lowered)
}

/// A variable or parenthesized expression, optionally followed by one call.
pub fn lower_prefixexp(fb: &mut FunctionBuilder, prefix: &PrefixExp, node: &impl Located) -> Result<Lowered, LowerError> {
    let head = match &prefix.head {
        VarOrExp::Var(var) => lower_var(fb, var)?,
        VarOrExp::Paren(exp) => {
            let inner = lower_exp(fb, exp)?;
            let loc = fb.start_loc(&**exp);
            adjust_to_one(fb, inner, loc)?
        }
    };
    match prefix.calls.as_slice() {
        [] => Ok(Lowered::Value(head)),
        [call] => {
            let loc = fb.start_loc(node);
            Ok(Lowered::Pack(lower_call(fb, head, call, loc)?))
        }
        [_, second, ..] => Err(LowerError::unsupported("chainedcall", fb.span(second))),
    }
}

/// The storage cell of a bare-name variable.
pub fn lower_var(fb: &mut FunctionBuilder, var: &Var) -> Result<RefValue, LowerError> {
    match var.kind.as_name() {
        Some(name) => {
            let loc = fb.start_loc(var);
            fb.resolve_or_declare(name, loc)
        }
        None => Err(LowerError::unsupported("varSuffix", fb.span(var))),
    }
}

/// Constant denoted by a number literal. Decimal integers that do not fit
/// in 64 bits become floats; hexadecimal integers wrap around. Hex floats
/// have no conversion.
pub fn number_value(lit: &NumberLit) -> Option<NumberValue> {
    match lit.class {
        NumberClass::Int => match lit.text.parse::<i64>() {
            Ok(v) => Some(NumberValue::Int(v)),
            Err(_) => lit.text.parse::<f64>().ok().map(NumberValue::Float),
        },
        NumberClass::Hex => {
            let digits = lit.text.get(2..)?;
            let mut value: u64 = 0;
            for c in digits.chars() {
                value = value.wrapping_mul(16).wrapping_add(u64::from(c.to_digit(16)?));
            }
            Some(NumberValue::Int(value as i64))
        }
        NumberClass::Float => lit.text.parse::<f64>().ok().map(NumberValue::Float),
        NumberClass::HexFloat => None,
    }
}
