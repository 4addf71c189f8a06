//! Movetext import and PGN export.
//!
//! Import is two steps: [`tokenize_movetext`] strips everything that is not a
//! move (tag pairs, comments, variations, move numbers, annotation glyphs and
//! result markers), then each token is matched against the legal moves of the
//! current position with [`match_token`]. Matching parses the token
//! structurally, so `Nf3`, `Ng1f3`, `Ng1-f3` and `g1f3` all find the same move.

use crate::board::GameResult;
use crate::moves::Move;
use crate::piece::PieceKind;
use crate::square::{col_of, file_index, rank_index, row_of, square_at, SquareId};

/// Maximum line width of exported movetext.
const LINE_WIDTH: usize = 80;

/// Split a PGN document or bare movetext into move tokens.
pub fn tokenize_movetext(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    let mut chars = text.chars();
    let mut variation_depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '[' => skip_until(&mut chars, ']'),
            '{' => skip_until(&mut chars, '}'),
            ';' => skip_until(&mut chars, '\n'),
            '(' => variation_depth += 1,
            ')' => variation_depth = variation_depth.saturating_sub(1),
            _ if variation_depth > 0 => continue,
            _ => {
                cleaned.push(c);
                continue;
            }
        }
        cleaned.push(' ');
    }

    cleaned
        .split_whitespace()
        .filter(|word| !matches!(*word, "*" | "1-0" | "0-1" | "1/2-1/2"))
        .map(strip_move_number)
        .filter(|word| !word.is_empty() && !word.starts_with('$'))
        .map(str::to_string)
        .collect()
}

/// Drop a "12." or "12..." prefix, which may be glued to the move.
fn strip_move_number(word: &str) -> &str {
    let rest = word.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == word.len() {
        return word;
    }
    let after_dots = rest.trim_start_matches('.');
    if after_dots.len() == rest.len() {
        word
    } else {
        after_dots
    }
}

fn skip_until(chars: &mut std::str::Chars<'_>, end: char) {
    for c in chars.by_ref() {
        if c == end {
            break;
        }
    }
}

/// Parsed shape of a move token.
#[derive(Debug, Default, PartialEq, Eq)]
struct TokenShape {
    kind: Option<PieceKind>,
    from_col: Option<usize>,
    from_row: Option<usize>,
    to: Option<SquareId>,
    castle_long: Option<bool>,
}

fn parse_token(token: &str) -> Option<TokenShape> {
    let token = token.trim_end_matches(['+', '#', '!', '?']);
    match token {
        "O-O" | "0-0" => {
            return Some(TokenShape {
                kind: Some(PieceKind::King),
                castle_long: Some(false),
                ..TokenShape::default()
            });
        }
        "O-O-O" | "0-0-0" => {
            return Some(TokenShape {
                kind: Some(PieceKind::King),
                castle_long: Some(true),
                ..TokenShape::default()
            });
        }
        _ => {}
    }

    let mut chars: Vec<char> = token.chars().collect();
    // promotion suffix: only queens are ever produced
    if let Some(&last) = chars.last() {
        if last.is_ascii_alphabetic() && chars.len() >= 3 {
            let before = chars[chars.len() - 2];
            if before == '=' || before.is_ascii_digit() {
                if !matches!(last, 'Q' | 'q') {
                    return None;
                }
                chars.pop();
                if chars.last() == Some(&'=') {
                    chars.pop();
                }
            }
        }
    }

    let mut shape = TokenShape::default();
    let body: &[char] = match chars.first().copied().and_then(PieceKind::from_letter) {
        Some(kind) => {
            shape.kind = Some(kind);
            &chars[1..]
        }
        None => &chars[..],
    };
    if body.len() < 2 {
        return None;
    }
    let (rest, dest) = body.split_at(body.len() - 2);
    shape.to = Some(square_at(file_index(dest[0])?, rank_index(dest[1])?));
    for &c in rest {
        match c {
            'x' | 'X' | '-' | ':' => {}
            c if file_index(c).is_some() => shape.from_col = file_index(c),
            c if rank_index(c).is_some() => shape.from_row = rank_index(c),
            _ => return None,
        }
    }
    Some(shape)
}

/// Find the unique legal move a token describes.
///
/// A token without a piece letter matches by squares alone when it names both
/// the start and destination square (`e2e4`); otherwise it means a pawn move.
pub fn match_token<'a>(token: &str, moves: &'a [Move]) -> Option<&'a Move> {
    let shape = parse_token(token)?;
    let coordinate = shape.kind.is_none() && shape.from_col.is_some() && shape.from_row.is_some();
    let mut found = moves.iter().filter(|mv| {
        if let Some(long) = shape.castle_long {
            return mv.is_castling() && (col_of(mv.to) < col_of(mv.from)) == long;
        }
        if mv.is_castling() || Some(mv.to) != shape.to {
            return false;
        }
        let kind_ok = match shape.kind {
            Some(kind) => mv.piece_kind == kind,
            None => coordinate || mv.is_pawn_move(),
        };
        kind_ok
            && shape.from_col.is_none_or(|c| col_of(mv.from) == c)
            && shape.from_row.is_none_or(|r| row_of(mv.from) == r)
    });
    let first = found.next()?;
    match found.next() {
        Some(_) => None,
        None => Some(first),
    }
}

/// Render the numbered movetext followed by the result marker.
pub fn movetext(moves: &[Move], result: GameResult) -> String {
    let mut words: Vec<String> = Vec::with_capacity(moves.len() * 3 / 2 + 1);
    for (ply, mv) in moves.iter().enumerate() {
        if ply % 2 == 0 {
            words.push(format!("{}.", ply / 2 + 1));
        }
        words.push(mv.san());
    }
    words.push(result.tag().to_string());

    let mut out = String::new();
    let mut line_len = 0;
    for word in words {
        if line_len > 0 && line_len + 1 + word.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        line_len += word.len();
        out.push_str(&word);
    }
    out
}

/// Full PGN document: tag pairs, a blank line, then the movetext.
pub fn export_pgn(tags: &[(&str, String)], moves: &[Move], result: GameResult) -> String {
    let mut out = String::new();
    for (name, value) in tags {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        out.push_str(&format!("[{name} \"{escaped}\"]\n"));
    }
    out.push('\n');
    out.push_str(&movetext(moves, result));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_markup() {
        let text = r#"[Event "Test"]
[White "A"]

1. e4 {best by test} e5 2.Nf3 (2. f4 exf4) Nc6 $1 3. Bb5 a6; the Ruy
4. Ba4 1/2-1/2"#;
        assert_eq!(
            tokenize_movetext(text),
            vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4"]
        );
    }

    #[test]
    fn test_tokenize_black_move_numbers() {
        assert_eq!(tokenize_movetext("12... Qxd5 13. O-O 1-0"), vec!["Qxd5", "O-O"]);
        assert_eq!(tokenize_movetext("1. e4 e5 *"), vec!["e4", "e5"]);
        assert_eq!(tokenize_movetext("9. 0-0 0-0-0"), vec!["0-0", "0-0-0"]);
    }

    #[test]
    fn test_parse_token_shapes() {
        let shape = parse_token("Nbd7").unwrap();
        assert_eq!(shape.kind, Some(PieceKind::Knight));
        assert_eq!(shape.from_col, Some(1));
        assert_eq!(shape.from_row, None);

        let shape = parse_token("exd8=Q+").unwrap();
        assert_eq!(shape.kind, None);
        assert_eq!(shape.from_col, Some(4));
        assert_eq!(shape.to, Some(3));

        assert!(parse_token("e8=N").is_none());
        assert!(parse_token("Zz9").is_none());
        assert_eq!(parse_token("0-0-0").unwrap().castle_long, Some(true));
    }
}
