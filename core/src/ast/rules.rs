use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::error::{Level, LuairErrorExt};
use crate::location::{SourceMap, TextRange};
use crate::script::Script;

#[derive(Parser)]
#[grammar = "ast/lua.pest"]
pub struct LuaParser;

pub(crate) type ParseResult<T> = Result<T, Box<dyn LuairErrorExt>>;

/// State shared by the tree-building functions of one parse.
pub(crate) struct ParseContext<'s> {
    pub(crate) sources: SourceMap<'s>,
    pub(crate) pratt: PrattParser<Rule>,
}

impl<'s> ParseContext<'s> {
    pub(crate) fn new(script: &'s Script) -> Self {
        ParseContext { sources: script.source_map(), pratt: lua_operator_table() }
    }

    pub(crate) fn range(pair: &Pair<'_, Rule>) -> Option<TextRange> {
        let span = pair.as_span();
        Some(TextRange::new(span.start(), last_token_start(pair), span.end()))
    }

    /// Inner pairs that build tree nodes, without the closing terminals.
    pub(crate) fn children<'a>(pair: Pair<'a, Rule>) -> impl Iterator<Item = Pair<'a, Rule>> {
        pair.into_inner().filter(|inner| !is_closing_terminal(inner.as_rule()))
    }

    /// Pull the next inner pair, failing with a syntax error at `range` when
    /// the grammar produced fewer children than expected.
    pub(crate) fn next<'a>(
        &self,
        pairs: &mut impl Iterator<Item = Pair<'a, Rule>>,
        range: Option<TextRange>,
    ) -> ParseResult<Pair<'a, Rule>> {
        match pairs.next() {
            Some(pair) => Ok(pair),
            None => Err(self.error(
                "Expected more inner pairs but found none.",
                "luair.ast.rules.next",
                range,
            )),
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>, issuer: &str, range: Option<TextRange>) -> Box<dyn LuairErrorExt> {
        let (location, span) = match range {
            Some(range) => {
                let span = crate::location::Span::new(
                    self.sources.location(range.start),
                    self.sources.location(range.last),
                );
                (Some(span.start.clone()), Some(span))
            }
            None => (None, None),
        };
        Box::new(super::err::SyntaxError::with(Level::Error, message.into(), issuer.to_string(), location, span))
    }

    pub(crate) fn unexpected(&self, pair: &Pair<'_, Rule>, issuer: &str) -> Box<dyn LuairErrorExt> {
        self.error(format!("Unexpected rule {:?}.", pair.as_rule()), issuer, Self::range(pair))
    }
}

fn is_closing_terminal(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_end
            | Rule::close_paren
            | Rule::close_bracket
            | Rule::close_brace
            | Rule::close_label
            | Rule::close_attrib
            | Rule::semicolon
    )
}

/// Start of the rightmost non-empty leaf below `pair`.
///
/// Whitespace and comments never form pairs, so that leaf is the last token
/// of the pair even when the pair's span runs over trailing trivia.
fn last_token_start(pair: &Pair<'_, Rule>) -> usize {
    let mut last = pair.clone();
    while let Some(child) = last.clone().into_inner().filter(|p| !p.as_str().is_empty()).last() {
        last = child;
    }
    last.as_span().start()
}

/// Lua operator precedence, lowest first.
fn lua_operator_table() -> PrattParser<Rule> {
    PrattParser::new()
        .op(Op::infix(Rule::op_or, Assoc::Left))
        .op(Op::infix(Rule::op_and, Assoc::Left))
        .op(Op::infix(Rule::op_lt, Assoc::Left)
            | Op::infix(Rule::op_gt, Assoc::Left)
            | Op::infix(Rule::op_le, Assoc::Left)
            | Op::infix(Rule::op_ge, Assoc::Left)
            | Op::infix(Rule::op_ne, Assoc::Left)
            | Op::infix(Rule::op_eq, Assoc::Left))
        .op(Op::infix(Rule::op_bor, Assoc::Left))
        .op(Op::infix(Rule::op_bxor, Assoc::Left))
        .op(Op::infix(Rule::op_band, Assoc::Left))
        .op(Op::infix(Rule::op_shl, Assoc::Left) | Op::infix(Rule::op_shr, Assoc::Left))
        .op(Op::infix(Rule::op_concat, Assoc::Right))
        .op(Op::infix(Rule::op_add, Assoc::Left) | Op::infix(Rule::op_sub, Assoc::Left))
        .op(Op::infix(Rule::op_mul, Assoc::Left)
            | Op::infix(Rule::op_div, Assoc::Left)
            | Op::infix(Rule::op_idiv, Assoc::Left)
            | Op::infix(Rule::op_mod, Assoc::Left))
        .op(Op::prefix(Rule::op_not) | Op::prefix(Rule::op_neg) | Op::prefix(Rule::op_len) | Op::prefix(Rule::op_bnot))
        .op(Op::infix(Rule::op_pow, Assoc::Right))
}
