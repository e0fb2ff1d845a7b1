//! file: core/src/ast/stmt.rs
//! description: tree building for chunks, blocks and statements.
//!
//! Each function consumes one `pest` pair of a known rule and returns the
//! matching syntax tree node. Nodes keep the byte range of the pair so the
//! location resolver can later point back at their first and last tokens.
//!
use pest::iterators::Pair;

use super::expr::{parse_exp_rule, parse_explist_rule, parse_prefix_parts, parse_var_rule};
use super::kind::{AttName, CondClause, FuncBody, FuncName, StatKind};
use super::node::{Block, Chunk, RetStat, Stat, Var};
use super::rules::{ParseContext, ParseResult, Rule};

/// Parse the top-level `chunk` rule.
pub(crate) fn parse_chunk_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Chunk> {
    let range = ParseContext::range(&pair);
    let mut inner = ParseContext::children(pair).filter(|p| p.as_rule() != Rule::shebang);
    let block_pair = ctx.next(&mut inner, range)?;
    if block_pair.as_rule() != Rule::block {
        return Err(ctx.unexpected(&block_pair, "luair.ast.stmt.parse_chunk_rule"));
    }
    let block = parse_block_rule(block_pair, ctx)?;
    Ok(Chunk { block, range })
}

pub(crate) fn parse_block_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Block> {
    let range = ParseContext::range(&pair);
    let mut stats = Vec::new();
    let mut ret = None;
    for inner in ParseContext::children(pair) {
        match inner.as_rule() {
            Rule::retstat => ret = Some(parse_retstat_rule(inner, ctx)?),
            _ => stats.push(parse_statement_rule(inner, ctx)?),
        }
    }
    Ok(Block { stats, ret, range })
}

fn parse_retstat_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<RetStat> {
    let range = ParseContext::range(&pair);
    let values = match ParseContext::children(pair).next() {
        Some(explist) => parse_explist_rule(explist, ctx)?,
        None => Vec::new(),
    };
    Ok(RetStat { values, range })
}

/// Parse one statement pair. Empty statements (`;`) never reach here because
/// `ParseContext::children` drops their pairs.
fn parse_statement_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Stat> {
    let range = ParseContext::range(&pair);
    let rule = pair.as_rule();
    let mut inner = ParseContext::children(pair.clone());

    let kind = match rule {
        Rule::stat_assign => {
            let targets = parse_varlist_rule(ctx.next(&mut inner, range)?, ctx)?;
            let values = parse_explist_rule(ctx.next(&mut inner, range)?, ctx)?;
            StatKind::Assign { targets, values }
        }
        Rule::stat_call => StatKind::Call(parse_prefix_parts(inner, ctx, range)?),
        Rule::stat_label => StatKind::Label(ctx.next(&mut inner, range)?.as_str().to_string()),
        Rule::stat_break => StatKind::Break,
        Rule::stat_goto => StatKind::Goto(ctx.next(&mut inner, range)?.as_str().to_string()),
        Rule::stat_do => StatKind::Do(parse_block_rule(ctx.next(&mut inner, range)?, ctx)?),
        Rule::stat_while => {
            let cond = parse_exp_rule(ctx.next(&mut inner, range)?, ctx)?;
            let body = parse_block_rule(ctx.next(&mut inner, range)?, ctx)?;
            StatKind::While { cond, body }
        }
        Rule::stat_repeat => {
            let body = parse_block_rule(ctx.next(&mut inner, range)?, ctx)?;
            let cond = parse_exp_rule(ctx.next(&mut inner, range)?, ctx)?;
            StatKind::Repeat { body, cond }
        }
        Rule::stat_if => {
            let cond = parse_exp_rule(ctx.next(&mut inner, range)?, ctx)?;
            let body = parse_block_rule(ctx.next(&mut inner, range)?, ctx)?;
            let mut clauses = vec![CondClause { cond, body }];
            let mut otherwise = None;
            for clause in inner {
                let clause_range = ParseContext::range(&clause);
                match clause.as_rule() {
                    Rule::elseif_clause => {
                        let mut parts = ParseContext::children(clause);
                        let cond = parse_exp_rule(ctx.next(&mut parts, clause_range)?, ctx)?;
                        let body = parse_block_rule(ctx.next(&mut parts, clause_range)?, ctx)?;
                        clauses.push(CondClause { cond, body });
                    }
                    Rule::else_clause => {
                        let mut parts = ParseContext::children(clause);
                        otherwise = Some(parse_block_rule(ctx.next(&mut parts, clause_range)?, ctx)?);
                    }
                    _ => return Err(ctx.unexpected(&clause, "luair.ast.stmt.parse_statement_rule")),
                }
            }
            StatKind::If { clauses, otherwise }
        }
        Rule::stat_numeric_for => {
            let var = ctx.next(&mut inner, range)?.as_str().to_string();
            let start = parse_exp_rule(ctx.next(&mut inner, range)?, ctx)?;
            let limit = parse_exp_rule(ctx.next(&mut inner, range)?, ctx)?;
            let third = ctx.next(&mut inner, range)?;
            let (step, body_pair) = if third.as_rule() == Rule::exp {
                (Some(parse_exp_rule(third, ctx)?), ctx.next(&mut inner, range)?)
            } else {
                (None, third)
            };
            let body = parse_block_rule(body_pair, ctx)?;
            StatKind::NumericFor { var, start, limit, step, body }
        }
        Rule::stat_generic_for => {
            let names = parse_namelist_rule(ctx.next(&mut inner, range)?);
            let exps = parse_explist_rule(ctx.next(&mut inner, range)?, ctx)?;
            let body = parse_block_rule(ctx.next(&mut inner, range)?, ctx)?;
            StatKind::GenericFor { names, exps, body }
        }
        Rule::stat_function => {
            let name = parse_funcname_rule(ctx.next(&mut inner, range)?, ctx)?;
            let body = parse_funcbody_rule(ctx.next(&mut inner, range)?, ctx)?;
            StatKind::Function { name, body }
        }
        Rule::stat_local_function => {
            let name = ctx.next(&mut inner, range)?.as_str().to_string();
            let body = parse_funcbody_rule(ctx.next(&mut inner, range)?, ctx)?;
            StatKind::LocalFunction { name, body }
        }
        Rule::stat_local => {
            let names = parse_attnamelist_rule(ctx.next(&mut inner, range)?, ctx)?;
            let values = match inner.next() {
                Some(explist) => parse_explist_rule(explist, ctx)?,
                None => Vec::new(),
            };
            StatKind::Local { names, values }
        }
        _ => return Err(ctx.unexpected(&pair, "luair.ast.stmt.parse_statement_rule")),
    };

    Ok(Stat::new(kind, range))
}

fn parse_varlist_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Vec<Var>> {
    pair.into_inner().map(|var| parse_var_rule(var, ctx)).collect()
}

pub(crate) fn parse_namelist_rule(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner().map(|name| name.as_str().to_string()).collect()
}

fn parse_attnamelist_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<Vec<AttName>> {
    let mut names = Vec::new();
    for attname in pair.into_inner() {
        let range = ParseContext::range(&attname);
        let mut parts = ParseContext::children(attname);
        let name = ctx.next(&mut parts, range)?.as_str().to_string();
        let attrib = match parts.next() {
            Some(attrib) => {
                let attrib_range = ParseContext::range(&attrib);
                Some(ctx.next(&mut ParseContext::children(attrib), attrib_range)?.as_str().to_string())
            }
            None => None,
        };
        names.push(AttName { name, attrib });
    }
    Ok(names)
}

fn parse_funcname_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<FuncName> {
    let mut path = Vec::new();
    let mut method = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::NAME => path.push(part.as_str().to_string()),
            Rule::method_suffix => {
                let range = ParseContext::range(&part);
                method = Some(ctx.next(&mut ParseContext::children(part), range)?.as_str().to_string());
            }
            _ => return Err(ctx.unexpected(&part, "luair.ast.stmt.parse_funcname_rule")),
        }
    }
    Ok(FuncName { path, method })
}

pub(crate) fn parse_funcbody_rule(pair: Pair<Rule>, ctx: &ParseContext) -> ParseResult<FuncBody> {
    let mut params = Vec::new();
    let mut is_vararg = false;
    let mut body = None;
    for part in ParseContext::children(pair) {
        match part.as_rule() {
            Rule::parlist => {
                for param in part.into_inner() {
                    match param.as_rule() {
                        Rule::namelist => params = parse_namelist_rule(param),
                        Rule::varargs => is_vararg = true,
                        _ => return Err(ctx.unexpected(&param, "luair.ast.stmt.parse_funcbody_rule")),
                    }
                }
            }
            Rule::block => body = Some(parse_block_rule(part, ctx)?),
            _ => return Err(ctx.unexpected(&part, "luair.ast.stmt.parse_funcbody_rule")),
        }
    }
    Ok(FuncBody { params, is_vararg, body: body.unwrap_or_default() })
}
