use crate::ast::{Args, CallSuffix};
use crate::ir::value::{PackValue, RefValue};
use crate::location::Location;

use super::err::LowerError;
use super::function_builder::FunctionBuilder;
use super::lower_expr::{lower_exp, lower_explist};
use super::pack::{Lowered, adjust_to_one, pack};

/// Lower `callee(args)`: pack the arguments, emit `lua.call` and return the
/// result pack.
pub fn lower_call(
    fb: &mut FunctionBuilder,
    callee: RefValue,
    call: &CallSuffix,
    loc: Location,
) -> Result<PackValue, LowerError> {
    if call.method.is_some() {
        return Err(LowerError::unsupported("methodcall", fb.span(call)));
    }

    let args = match &call.args {
        Args::List(exps) => lower_explist(fb, exps)?,
        Args::Table(exp) | Args::Str(exp) => {
            let arg = lower_exp(fb, exp)?;
            let arg_loc = fb.start_loc(&**exp);
            vec![Lowered::Value(adjust_to_one(fb, arg, arg_loc)?)]
        }
    };

    let args = pack(fb, &args, loc.clone())?;
    Ok(fb.ops().call(callee, args, loc)?)
}
