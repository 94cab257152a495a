//! Right-recursive descent parser
//!
//! Grammar, exactly as parsed:
//!
//! ```text
//! expr      := primary (('+' | '*') expr)?
//! primary   := NUMBER | '(' expr ')'
//! statement := expr ';'
//! ```
//!
//! The operand after an operator is a fresh `expr`, so every operator chain
//! groups to the right whatever the operators are: `2*3+4` is `2*(3+4)`.
//! A `)` or `;` simply ends the current call; parenthesis depth is never
//! checked beyond that.

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::config::runtime::SyntaxPreferences;
use crate::lexical::Scanner;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::syntax::tree::SyntaxTree;
use crate::tokens::{Token, TokenKind, TokenSource};
use crate::log_debug;

/// Parser pulling one token at a time from a [`TokenSource`]
pub struct Parser<S> {
    source: S,
    depth: usize,
    max_depth: usize,
    tokens_consumed: usize,
    trace: bool,
}

impl<S: TokenSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            depth: 0,
            max_depth: MAX_PARSE_DEPTH,
            tokens_consumed: 0,
            trace: false,
        }
    }

    pub fn with_preferences(source: S, preferences: &SyntaxPreferences) -> Self {
        let mut parser = Self::new(source);
        parser.trace = preferences.trace_decisions;
        parser
    }

    /// Lower the nesting limit below the compiled default
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn tokens_consumed(&self) -> usize {
        self.tokens_consumed
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parse one expression
    ///
    /// Depth counts open groups only; an operator chain of any length is read
    /// in a loop and folded to the right afterwards.
    pub fn parse(&mut self) -> SyntaxResult<SyntaxTree> {
        if self.depth >= self.max_depth {
            return Err(SyntaxError::max_recursion_depth(self.depth));
        }

        self.depth += 1;
        let result = self.parse_chain();
        self.depth -= 1;
        result
    }

    fn parse_chain(&mut self) -> SyntaxResult<SyntaxTree> {
        let first = self.parse_operand()?;
        let mut rest = Vec::new();

        loop {
            let token = self.next()?;

            if token.kind.is_operator() {
                self.trace_decision("binary", &token);
                let operand = self.parse_operand()?;
                rest.push((token, operand));
            } else if token.kind.is_terminator() {
                self.trace_decision("close", &token);
                break;
            } else {
                return Err(SyntaxError::unexpected_token(&token));
            }
        }

        Ok(fold_right(first, rest))
    }

    /// A number or a parenthesised group
    fn parse_operand(&mut self) -> SyntaxResult<SyntaxTree> {
        let token = self.next()?;

        match token.kind {
            TokenKind::LeftParen => {
                self.trace_decision("open group", &token);
                let inner = self.parse()?;
                Ok(SyntaxTree::paren(token, inner))
            }
            TokenKind::Number => Ok(SyntaxTree::number(token)),
            // The statement ended where an operand was required
            TokenKind::Semicolon => Err(SyntaxError::UnexpectedEof),
            _ => Err(SyntaxError::unexpected_token(&token)),
        }
    }

    fn next(&mut self) -> SyntaxResult<Token> {
        match self.source.next_token()? {
            Some(token) => {
                self.tokens_consumed += 1;
                Ok(token)
            }
            None => Err(SyntaxError::UnexpectedEof),
        }
    }

    fn trace_decision(&self, decision: &str, token: &Token) {
        if self.trace {
            log_debug!("Parser decision",
                "decision" => decision,
                "token" => token.text,
                "at" => token.span,
                "depth" => self.depth
            );
        }
    }
}

/// `a o1 b o2 c` becomes `o1(a, o2(b, c))`
fn fold_right(first: SyntaxTree, mut rest: Vec<(Token, SyntaxTree)>) -> SyntaxTree {
    let Some((mut operator, mut right)) = rest.pop() else {
        return first;
    };

    while let Some((previous, operand)) = rest.pop() {
        right = binary(operator, operand, right);
        operator = previous;
    }

    binary(operator, first, right)
}

fn binary(operator: Token, left: SyntaxTree, right: SyntaxTree) -> SyntaxTree {
    if operator.kind == TokenKind::Star {
        SyntaxTree::star(operator, left, right)
    } else {
        SyntaxTree::plus(operator, left, right)
    }
}

/// Parse one expression from any token source
pub fn parse<S: TokenSource>(source: &mut S) -> SyntaxResult<SyntaxTree> {
    Parser::new(source).parse()
}

/// Scan and parse an in-memory statement
pub fn parse_statement(text: &str) -> SyntaxResult<SyntaxTree> {
    let mut scanner = Scanner::new(text.as_bytes());
    parse(&mut scanner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::{tokenize, LexerError};
    use crate::tokens::TokenStream;
    use assert_matches::assert_matches;

    fn shape(tree: &SyntaxTree) -> String {
        match tree {
            SyntaxTree::Plus { left, right, .. } => format!("+({},{})", shape(left), shape(right)),
            SyntaxTree::Star { left, right, .. } => format!("*({},{})", shape(left), shape(right)),
            SyntaxTree::Paren { inner, .. } => format!("[{}]", shape(inner)),
            SyntaxTree::Number { token } => token.text.clone(),
        }
    }

    fn parse_shape(text: &str) -> String {
        shape(&parse_statement(text).unwrap())
    }

    #[test]
    fn test_single_number() {
        assert_eq!(parse_shape("42;"), "42");
    }

    #[test]
    fn test_operator_chains_group_right() {
        assert_eq!(parse_shape("2+3*4;"), "+(2,*(3,4))");
        assert_eq!(parse_shape("2*3+4;"), "*(2,+(3,4))");
        assert_eq!(parse_shape("1+2+3+4;"), "+(1,+(2,+(3,4)))");
        assert_eq!(parse_shape("1*2*3;"), "*(1,*(2,3))");
    }

    #[test]
    fn test_parens_force_grouping() {
        assert_eq!(parse_shape("(1+2)*3;"), "*([+(1,2)],3)");
        assert_eq!(parse_shape("((7));"), "[[7]]");
        assert_eq!(parse_shape("2*(3+4)+1;"), "*(2,+([+(3,4)],1))");
    }

    #[test]
    fn test_close_paren_ends_current_call() {
        // The stray ')' ends parsing and the rest is never read
        assert_eq!(parse_shape("1)+2;"), "1");
    }

    #[test]
    fn test_operator_in_operand_position() {
        let error = parse_statement("2+*3;").unwrap_err();
        assert_matches!(error, SyntaxError::UnexpectedToken { ref found, span } if found == "*" && span.start.column == 3);
        assert_eq!(error.to_string(), "syntax error: unexpected '*' at 1:3");
    }

    #[test]
    fn test_unexpected_after_operand() {
        assert_matches!(
            parse_statement("1 ( 2;"),
            Err(SyntaxError::UnexpectedToken { ref found, .. }) if found == "("
        );
        assert_matches!(
            parse_statement(")1;"),
            Err(SyntaxError::UnexpectedToken { ref found, .. }) if found == ")"
        );
    }

    #[test]
    fn test_terminator_in_operand_position() {
        assert_matches!(parse_statement("1+;"), Err(SyntaxError::UnexpectedEof));
        assert_matches!(parse_statement(";"), Err(SyntaxError::UnexpectedEof));
    }

    #[test]
    fn test_truncated_input() {
        assert_matches!(parse_statement("2+"), Err(SyntaxError::UnexpectedEof));
        assert_matches!(parse_statement("(1+2;"), Err(SyntaxError::UnexpectedEof));
        assert_matches!(parse_statement(""), Err(SyntaxError::UnexpectedEof));
        assert_matches!(parse_statement("7"), Err(SyntaxError::UnexpectedEof));
    }

    #[test]
    fn test_bad_token_propagates_verbatim() {
        let error = parse_statement("1+a;").unwrap_err();
        assert_matches!(
            error,
            SyntaxError::Lexical(LexerError::BadToken { character: 'a', .. })
        );
        assert_eq!(error.to_string(), "bad token 'a' at 1:3");
    }

    #[test]
    fn test_parse_from_token_stream() {
        let mut stream = TokenStream::new(tokenize("(5);").unwrap());
        let tree = parse(&mut stream).unwrap();

        assert_eq!(shape(&tree), "[5]");
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_depth_guard() {
        let deep = format!("{}1{};", "(".repeat(10), ")".repeat(10));
        let mut scanner = Scanner::new(deep.as_bytes());
        let result = Parser::new(&mut scanner).with_max_depth(5).parse();

        assert_matches!(result, Err(SyntaxError::MaxRecursionDepth { depth: 5 }));
        assert!(parse_statement(&deep).is_ok());
    }

    #[test]
    fn test_long_chain_does_not_count_as_nesting() {
        let chain = format!("{}1;", "1+".repeat(20));
        let tree = Parser::new(Scanner::new(chain.as_bytes()))
            .with_max_depth(2)
            .parse()
            .unwrap();

        assert_eq!(tree.node_count(), 41);
        assert_eq!(tree.depth(), 21);
    }

    #[test]
    fn test_chain_beyond_depth_limit() {
        let terms = 5000;
        assert!(terms > MAX_PARSE_DEPTH);
        let chain = format!("{}2;", "1*".repeat(terms - 1));

        let tree = parse_statement(&chain).unwrap();
        assert_eq!(tree.node_count(), 2 * terms - 1);
        assert_matches!(tree, SyntaxTree::Star { .. });
    }

    #[test]
    fn test_fold_keeps_operator_per_link() {
        assert_eq!(parse_shape("1+2*3+4*5;"), "+(1,*(2,+(3,*(4,5))))");
        assert_eq!(parse_shape("(1+2)*(3*4)+5;"), "*([+(1,2)],+([*(3,4)],5))");
    }

    #[test]
    fn test_tokens_consumed() {
        let mut parser = Parser::new(Scanner::new(&b"1 + 2 ;"[..]));
        parser.parse().unwrap();

        assert_eq!(parser.tokens_consumed(), 4);
        assert!(parser.source().is_finished());
    }

    #[test]
    fn test_trace_preference_parses_identically() {
        let prefs = SyntaxPreferences {
            trace_decisions: true,
        };
        let tree = Parser::with_preferences(Scanner::new(&b"(1+2)*3;"[..]), &prefs)
            .parse()
            .unwrap();

        assert_eq!(shape(&tree), "*([+(1,2)],3)");
    }
}
