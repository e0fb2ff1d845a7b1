//! file: core/src/ast/expr.rs
//! description: tree building for expressions, prefix expressions and literals.
//!
//! Operator expressions are assembled with the Pratt parser kept in the
//! `ParseContext`; everything else maps one grammar rule to one node kind.
//!
use pest::iterators::Pair;

use super::kind::{
    Access, BinaryOperator, ExpKind, Field, NumberClass, NumberLit, PrefixExp, TableConstructor,
    UnaryOperator, VarKind, VarOrExp, VarRoot, VarSuffix,
};
use super::node::{Args, CallSuffix, Exp, Var};
use super::rules::{ParseContext, ParseResult, Rule};
use super::stmt::parse_funcbody_rule;
use crate::location::TextRange;

pub(crate) fn parse_explist_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Vec<Exp>> {
    pair.into_inner().map(|exp| parse_exp_rule(exp, ctx)).collect()
}

/// Parse an `exp` rule, resolving operator precedence.
pub(crate) fn parse_exp_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Exp> {
    ctx.pratt
        .map_primary(|primary| parse_primary_rule(primary, ctx))
        .map_prefix(|op, operand| {
            let operand = operand?;
            let range = TextRange::join(ParseContext::range(&op), operand.range);
            let op = match op.as_rule() {
                Rule::op_not => UnaryOperator::Not,
                Rule::op_neg => UnaryOperator::Neg,
                Rule::op_len => UnaryOperator::Len,
                Rule::op_bnot => UnaryOperator::BNot,
                _ => return Err(ctx.unexpected(&op, "luair.ast.expr.parse_exp_rule")),
            };
            Ok(Exp::new(ExpKind::Unary { op, operand: Box::new(operand) }, range))
        })
        .map_infix(|lhs, op, rhs| {
            let (lhs, rhs) = (lhs?, rhs?);
            let range = TextRange::join(lhs.range, rhs.range);
            let op = binary_operator(op.as_rule())
                .ok_or_else(|| ctx.unexpected(&op, "luair.ast.expr.parse_exp_rule"))?;
            Ok(Exp::new(ExpKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, range))
        })
        .parse(pair.into_inner())
}

fn binary_operator(rule: Rule) -> Option<BinaryOperator> {
    let op = match rule {
        Rule::op_or => BinaryOperator::Or,
        Rule::op_and => BinaryOperator::And,
        Rule::op_lt => BinaryOperator::Lt,
        Rule::op_gt => BinaryOperator::Gt,
        Rule::op_le => BinaryOperator::Le,
        Rule::op_ge => BinaryOperator::Ge,
        Rule::op_eq => BinaryOperator::Eq,
        Rule::op_ne => BinaryOperator::Ne,
        Rule::op_bor => BinaryOperator::BOr,
        Rule::op_bxor => BinaryOperator::BXor,
        Rule::op_band => BinaryOperator::BAnd,
        Rule::op_shl => BinaryOperator::Shl,
        Rule::op_shr => BinaryOperator::Shr,
        Rule::op_concat => BinaryOperator::Concat,
        Rule::op_add => BinaryOperator::Add,
        Rule::op_sub => BinaryOperator::Sub,
        Rule::op_mul => BinaryOperator::Mul,
        Rule::op_div => BinaryOperator::Div,
        Rule::op_idiv => BinaryOperator::IDiv,
        Rule::op_mod => BinaryOperator::Mod,
        Rule::op_pow => BinaryOperator::Pow,
        _ => return None,
    };
    Some(op)
}

fn parse_primary_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Exp> {
    let range = ParseContext::range(&pair);
    let kind = match pair.as_rule() {
        Rule::nil_lit => ExpKind::Nil,
        Rule::false_lit => ExpKind::False,
        Rule::true_lit => ExpKind::True,
        Rule::varargs => ExpKind::VarArgs,
        Rule::number => ExpKind::Number(parse_number_rule(pair, ctx)?),
        Rule::string => ExpKind::Str(parse_string_rule(pair, ctx)?),
        Rule::functiondef => {
            let mut inner = ParseContext::children(pair);
            ExpKind::Function(parse_funcbody_rule(ctx.next(&mut inner, range)?, ctx)?)
        }
        Rule::tableconstructor => ExpKind::Table(parse_table_rule(pair, ctx)?),
        Rule::prefixexp => ExpKind::Prefix(parse_prefix_parts(ParseContext::children(pair), ctx, range)?),
        _ => return Err(ctx.unexpected(&pair, "luair.ast.expr.parse_primary_rule")),
    };
    Ok(Exp::new(kind, range))
}

/// Build a prefix expression from the children of a `prefixexp` or
/// `stat_call` pair: a head followed by zero or more call suffixes.
pub(crate) fn parse_prefix_parts<'a>(
    mut inner: impl Iterator<Item = Pair<'a, Rule>>,
    ctx: &ParseContext,
    range: Option<TextRange>,
) -> ParseResult<PrefixExp> {
    let head_pair = ctx.next(&mut inner, range)?;
    let head = match head_pair.as_rule() {
        Rule::var => VarOrExp::Var(parse_var_rule(head_pair, ctx)?),
        Rule::paren_exp => VarOrExp::Paren(Box::new(parse_paren_exp_rule(head_pair, ctx)?)),
        _ => return Err(ctx.unexpected(&head_pair, "luair.ast.expr.parse_prefix_parts")),
    };
    let calls = inner.map(|suffix| parse_call_suffix_rule(suffix, ctx)).collect::<ParseResult<Vec<_>>>()?;
    Ok(PrefixExp { head, calls })
}

fn parse_paren_exp_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Exp> {
    let range = ParseContext::range(&pair);
    let mut inner = ParseContext::children(pair);
    parse_exp_rule(ctx.next(&mut inner, range)?, ctx)
}

pub(crate) fn parse_var_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Var> {
    let range = ParseContext::range(&pair);
    let mut inner = ParseContext::children(pair);
    let first = ctx.next(&mut inner, range)?;
    let root = match first.as_rule() {
        Rule::NAME => VarRoot::Name(first.as_str().to_string()),
        Rule::paren_exp => VarRoot::Paren(Box::new(parse_paren_exp_rule(first, ctx)?)),
        _ => return Err(ctx.unexpected(&first, "luair.ast.expr.parse_var_rule")),
    };
    let suffixes = inner.map(|suffix| parse_var_suffix_rule(suffix, ctx)).collect::<ParseResult<Vec<_>>>()?;
    Ok(Var::new(VarKind { root, suffixes }, range))
}

fn parse_var_suffix_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<VarSuffix> {
    let range = ParseContext::range(&pair);
    let mut calls = Vec::new();
    let mut access = None;
    for part in ParseContext::children(pair) {
        let part_range = ParseContext::range(&part);
        match part.as_rule() {
            Rule::call_suffix => calls.push(parse_call_suffix_rule(part, ctx)?),
            Rule::index => {
                let key = parse_exp_rule(ctx.next(&mut ParseContext::children(part), part_range)?, ctx)?;
                access = Some(Access::Index(Box::new(key)));
            }
            Rule::member => {
                let name = ctx.next(&mut ParseContext::children(part), part_range)?.as_str().to_string();
                access = Some(Access::Member(name));
            }
            _ => return Err(ctx.unexpected(&part, "luair.ast.expr.parse_var_suffix_rule")),
        }
    }
    match access {
        Some(access) => Ok(VarSuffix { calls, access }),
        None => Err(ctx.error("Variable suffix without an access.", "luair.ast.expr.parse_var_suffix_rule", range)),
    }
}

fn parse_call_suffix_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<CallSuffix> {
    let range = ParseContext::range(&pair);
    let mut method = None;
    let mut args = None;
    for part in ParseContext::children(pair) {
        let part_range = ParseContext::range(&part);
        match part.as_rule() {
            Rule::method => {
                method = Some(ctx.next(&mut ParseContext::children(part), part_range)?.as_str().to_string());
            }
            Rule::call_args => {
                let list = match ParseContext::children(part).next() {
                    Some(explist) => parse_explist_rule(explist, ctx)?,
                    None => Vec::new(),
                };
                args = Some(Args::List(list));
            }
            Rule::tableconstructor | Rule::string => {
                let arg = parse_primary_rule(part.clone(), ctx)?;
                args = Some(match part.as_rule() {
                    Rule::string => Args::Str(Box::new(arg)),
                    _ => Args::Table(Box::new(arg)),
                });
            }
            _ => return Err(ctx.unexpected(&part, "luair.ast.expr.parse_call_suffix_rule")),
        }
    }
    match args {
        Some(args) => Ok(CallSuffix { method, args, range }),
        None => Err(ctx.error("Call without arguments.", "luair.ast.expr.parse_call_suffix_rule", range)),
    }
}

fn parse_table_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<TableConstructor> {
    let mut fields = Vec::new();
    for field in ParseContext::children(pair) {
        let range = ParseContext::range(&field);
        let rule = field.as_rule();
        let mut parts = ParseContext::children(field.clone());
        let field = match rule {
            Rule::field_keyed => {
                let key = parse_exp_rule(ctx.next(&mut parts, range)?, ctx)?;
                let value = parse_exp_rule(ctx.next(&mut parts, range)?, ctx)?;
                Field::Keyed { key, value }
            }
            Rule::field_named => {
                let name = ctx.next(&mut parts, range)?.as_str().to_string();
                let value = parse_exp_rule(ctx.next(&mut parts, range)?, ctx)?;
                Field::Named { name, value }
            }
            Rule::field_positional => Field::Positional(parse_exp_rule(ctx.next(&mut parts, range)?, ctx)?),
            _ => return Err(ctx.unexpected(&field, "luair.ast.expr.parse_table_rule")),
        };
        fields.push(field);
    }
    Ok(TableConstructor { fields })
}

fn parse_number_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<NumberLit> {
    let range = ParseContext::range(&pair);
    let text = pair.as_str();
    let literal = ctx.next(&mut pair.into_inner(), range)?;
    let class = match literal.as_rule() {
        Rule::int => NumberClass::Int,
        Rule::hex_int => NumberClass::Hex,
        Rule::float => NumberClass::Float,
        Rule::hex_float => NumberClass::HexFloat,
        _ => return Err(ctx.unexpected(&literal, "luair.ast.expr.parse_number_rule")),
    };
    Ok(NumberLit::new(class, text))
}

fn parse_string_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<String> {
    let range = ParseContext::range(&pair);
    let literal = ctx.next(&mut pair.into_inner(), range)?;
    let text = literal.as_str();
    match literal.as_rule() {
        Rule::long_string => Ok(long_string_body(text).to_string()),
        Rule::quoted_string => {
            let body = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();
            unescape(body).map_err(|message| ctx.error(message, "luair.ast.expr.parse_string_rule", range))
        }
        _ => Err(ctx.unexpected(&literal, "luair.ast.expr.parse_string_rule")),
    }
}

/// Strip the `[==[` / `]==]` brackets and a leading newline.
fn long_string_body(text: &str) -> &str {
    let level = text.bytes().skip(1).take_while(|b| *b == b'=').count();
    let open = level + 2;
    let body = text.get(open..text.len().saturating_sub(open)).unwrap_or_default();
    ["\r\n", "\n\r", "\n", "\r"]
        .iter()
        .find_map(|nl| body.strip_prefix(nl))
        .unwrap_or(body)
}

/// Decode the escape sequences of a quoted string body.
///
/// Byte escapes above 0x7f are mapped to the Unicode scalar of the same
/// value since the tree stores strings as UTF-8.
fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('v') => out.push('\u{0B}'),
            Some(c @ ('\\' | '"' | '\'')) => out.push(c),
            Some(nl @ ('\n' | '\r')) => {
                // CR LF and LF CR are a single line break
                if chars.peek().is_some_and(|next| matches!(next, '\n' | '\r') && *next != nl) {
                    chars.next();
                }
                out.push('\n');
            }
            Some('z') => {
                while chars.peek().is_some_and(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}')) {
                    chars.next();
                }
            }
            Some('x') => {
                let digits: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&digits, 16)
                    .map_err(|_| format!("invalid hexadecimal escape '\\x{}'", digits))?;
                out.push(char::from(byte));
            }
            Some('u') => {
                if chars.next() != Some('{') {
                    return Err("missing '{' in '\\u{xxxx}' escape".to_string());
                }
                let digits: String = chars.by_ref().take_while(|c| *c != '}').collect();
                let scalar = u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid unicode escape '\\u{{{}}}'", digits))?;
                out.push(scalar);
            }
            Some(d) if d.is_ascii_digit() => {
                let mut value = d.to_digit(10).unwrap_or_default();
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(10)) {
                        Some(digit) => {
                            value = value * 10 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                let byte = u8::try_from(value).map_err(|_| format!("decimal escape '\\{}' too large", value))?;
                out.push(char::from(byte));
            }
            Some(other) => return Err(format!("invalid escape sequence '\\{}'", other)),
            None => return Err("unfinished escape sequence".to_string()),
        }
    }
    Ok(out)
}
