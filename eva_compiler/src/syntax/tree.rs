//! Expression tree produced by the parser

use crate::tokens::Token;
use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// One parsed statement; each node owns its children outright
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyntaxTree {
    Plus {
        op: Token,
        left: Box<SyntaxTree>,
        right: Box<SyntaxTree>,
    },
    Star {
        op: Token,
        left: Box<SyntaxTree>,
        right: Box<SyntaxTree>,
    },
    Paren {
        open: Token,
        inner: Box<SyntaxTree>,
    },
    Number {
        token: Token,
    },
}

impl SyntaxTree {
    pub fn plus(op: Token, left: SyntaxTree, right: SyntaxTree) -> Self {
        Self::Plus {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn star(op: Token, left: SyntaxTree, right: SyntaxTree) -> Self {
        Self::Star {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn paren(open: Token, inner: SyntaxTree) -> Self {
        Self::Paren {
            open,
            inner: Box::new(inner),
        }
    }

    pub fn number(token: Token) -> Self {
        Self::Number { token }
    }

    /// The token stored on this node
    pub fn token(&self) -> &Token {
        match self {
            Self::Plus { op, .. } | Self::Star { op, .. } => op,
            Self::Paren { open, .. } => open,
            Self::Number { token } => token,
        }
    }

    pub fn children(&self) -> Vec<&SyntaxTree> {
        match self {
            Self::Plus { left, right, .. } | Self::Star { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            Self::Paren { inner, .. } => vec![inner.as_ref()],
            Self::Number { .. } => Vec::new(),
        }
    }

    /// Levels from this node to its deepest leaf, counting both
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        self.walk(|_, level| deepest = deepest.max(level + 1));
        deepest
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    /// Source range from the leftmost to the rightmost stored token
    pub fn span(&self) -> Span {
        let mut first = self;
        while let Self::Plus { left, .. } | Self::Star { left, .. } = first {
            first = left.as_ref();
        }

        let mut last = self;
        loop {
            match last {
                Self::Plus { right, .. } | Self::Star { right, .. } => last = right.as_ref(),
                Self::Paren { inner, .. } => last = inner.as_ref(),
                Self::Number { .. } => break,
            }
        }

        first.token().span.to(last.token().span)
    }

    /// Indented outline: one line per node, one tab per level
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.walk(|node, level| {
            for _ in 0..level {
                out.push('\t');
            }
            out.push_str(&node.token().text);
            out.push('\n');
        });
        out
    }

    /// Pre-order visit with an explicit stack, so long operator chains do not recurse
    fn walk<'a>(&'a self, mut visit: impl FnMut(&'a SyntaxTree, usize)) {
        let mut pending = vec![(self, 0)];

        while let Some((node, level)) = pending.pop() {
            visit(node, level);
            for child in node.children().into_iter().rev() {
                pending.push((child, level + 1));
            }
        }
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::default())
    }

    fn num(text: &str) -> SyntaxTree {
        SyntaxTree::number(tok(TokenKind::Number, text))
    }

    // (1+2)*3
    fn sample() -> SyntaxTree {
        SyntaxTree::star(
            tok(TokenKind::Star, "*"),
            SyntaxTree::paren(
                tok(TokenKind::LeftParen, "("),
                SyntaxTree::plus(tok(TokenKind::Plus, "+"), num("1"), num("2")),
            ),
            num("3"),
        )
    }

    #[test]
    fn test_render() {
        assert_eq!(sample().render(), "*\n\t(\n\t\t+\n\t\t\t1\n\t\t\t2\n\t3\n");
        assert_eq!(num("42").to_string(), "42\n");
    }

    #[test]
    fn test_shape_metrics() {
        let tree = sample();
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.node_count(), 6);
        assert!(matches!(tree, SyntaxTree::Star { .. }));
        assert_eq!(tree.children().len(), 2);
        assert_eq!(num("1").depth(), 1);
    }

    #[test]
    fn test_token_accessor() {
        let tree = sample();
        assert_eq!(tree.token().text, "*");
        assert_eq!(tree.children()[0].token().kind, TokenKind::LeftParen);
    }

    #[test]
    fn test_span_covers_leftmost_to_rightmost_token() {
        let tree = crate::syntax::parse_statement("(1+2)*30;").unwrap();
        let span = tree.span();

        assert_eq!(span.start.offset, 0);
        assert_eq!(span.end.offset, 8);
    }

    #[test]
    fn test_long_chain_metrics() {
        let terms = 5000;
        let mut tree = num("1");
        for _ in 1..terms {
            tree = SyntaxTree::plus(tok(TokenKind::Plus, "+"), num("1"), tree);
        }

        assert_eq!(tree.node_count(), 2 * terms - 1);
        assert_eq!(tree.depth(), terms);
        assert!(tree.span().is_empty());
    }
}
