//! Parsing of scripted move sequences such as `"LLUR"` or `"wasd"`.

use tilemerge_core::Direction;

/// Errors that can occur while parsing a move script.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ScriptError {
    #[error("unknown move '{symbol}' at position {position}")]
    UnknownMove { symbol: char, position: usize },
}

/// Parses a move script into directions.
///
/// `U`/`W` move up, `D`/`S` down, `L`/`A` left and `R` right. Letters are
/// case-insensitive and whitespace is ignored. Because `D` already means
/// down, right has no WASD alias.
pub(crate) fn parse_moves(script: &str) -> Result<Vec<Direction>, ScriptError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_whitespace())
        .map(|(position, symbol)| match symbol.to_ascii_uppercase() {
            'U' | 'W' => Ok(Direction::Up),
            'D' | 'S' => Ok(Direction::Down),
            'L' | 'A' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            _ => Err(ScriptError::UnknownMove { symbol, position }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_in_any_case() {
        assert_eq!(
            parse_moves("uDlR").expect("valid script"),
            vec![
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right
            ]
        );
    }

    #[test]
    fn accepts_wasd_aliases_and_whitespace() {
        assert_eq!(
            parse_moves("w a\ns").expect("valid script"),
            vec![Direction::Up, Direction::Left, Direction::Down]
        );
    }

    #[test]
    fn reports_position_of_unknown_symbol() {
        assert_eq!(
            parse_moves("LUX"),
            Err(ScriptError::UnknownMove {
                symbol: 'X',
                position: 2
            })
        );
    }
}
