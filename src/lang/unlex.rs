use super::token::*;

/// Renders a token stream back to source text. Stops quietly at the first
/// byte that does not decode.
pub fn untokenize(bytes: &[u8]) -> String {
    let mut s = String::new();
    let mut prev: Option<Token> = None;
    for token in Cursor::new(bytes) {
        if let Some(prev) = prev {
            if wants_space(prev, token) {
                s.push(' ');
            }
        }
        match token {
            Token::Keyword(kw) => s.push_str(&kw.to_string()),
            Token::Number(n) => s.push_str(&number_to_string(n)),
            Token::String(bytes) => {
                let text = String::from_utf8_lossy(bytes);
                if prev == Some(Token::Keyword(Keyword::Rem)) {
                    s.push_str(&text);
                } else {
                    s.push('"');
                    s.push_str(&text);
                    s.push('"');
                }
            }
            Token::NumberVar(name) => s.push_str(&name.to_ascii_lowercase()),
            Token::StringVar(name) => {
                s.push_str(&name.to_ascii_lowercase());
                s.push('$');
            }
            Token::Symbol(sym) => s.push_str(&sym.to_string()),
        }
        prev = Some(token);
    }
    s
}

/// Only variables and function keywords bind to a following `(`.
/// Statement keywords keep the space, so `PRINT (A)` lists as written.
fn wants_space(prev: Token, token: Token) -> bool {
    match token {
        Token::Symbol(Symbol::Comma)
        | Token::Symbol(Symbol::Semicolon)
        | Token::Symbol(Symbol::RParen) => return false,
        Token::Symbol(Symbol::LParen) => match prev {
            Token::NumberVar(_) | Token::StringVar(_) => return false,
            Token::Keyword(kw) if kw.is_function() => return false,
            _ => {}
        },
        _ => {}
    }
    prev != Token::Symbol(Symbol::LParen)
}

/// Shortest text that parses back to the same `f32`.
pub fn number_to_string(n: f32) -> String {
    let magnitude = n.abs();
    if magnitude >= 1e16 || (magnitude < 1e-5 && magnitude != 0.0) {
        format!("{:e}", n)
    } else {
        format!("{}", n)
    }
}
