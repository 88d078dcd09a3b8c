//! Turns a stream of source characters into a stream of `Token`s.

mod lexer;
mod token;

pub use self::lexer::Lexer;
pub use self::token::Token;

/// Characters that may appear in a user-defined operator.
pub const OPERATOR_CHARS: &str = "<>=!&|~+-*/%$^";

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().expect("lex error in test input");
            let done = tok == Token::Eof;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            tokens("def foo extern bar"),
            vec![
                Token::Def,
                Token::Ident("foo".into()),
                Token::Extern,
                Token::Ident("bar".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_numbers() {
        assert_eq!(tokens("3.5"), vec![Token::Number(3.5), Token::Eof]);
    }

    #[test]
    fn lexes_multi_char_operator_as_one_token() {
        assert_eq!(
            tokens("a <= b"),
            vec![
                Token::Ident("a".into()),
                Token::Op("<=".into()),
                Token::Ident("b".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn skips_comments_to_end_of_line() {
        assert_eq!(
            tokens("1 # a comment\n+ 2"),
            vec![
                Token::Number(1.0),
                Token::Op("+".into()),
                Token::Number(2.0),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn passes_through_punctuation() {
        assert_eq!(
            tokens("foo(a, b)"),
            vec![
                Token::Ident("foo".into()),
                Token::Char('('),
                Token::Ident("a".into()),
                Token::Char(','),
                Token::Ident("b".into()),
                Token::Char(')'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn end_sentinel_is_a_keyword() {
        assert_eq!(tokens("end"), vec![Token::End, Token::Eof]);
    }
}
