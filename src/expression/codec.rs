//! Conversion between sum-of-products text and minterm sets

use super::pattern::{check_variable_count, BitPattern, Literal};
use crate::error::KmapError;
use crate::kmap::VARIABLE_NAMES;
use itertools::Itertools;
use std::collections::BTreeSet;
use tracing::debug;

/// Characters that complement the variable written just before them
const NEGATION_MARKERS: [char; 5] = ['\'', '\u{2019}', '!', '\u{0305}', '\u{0304}'];

/// Explicit AND operators, accepted and ignored inside a term
const AND_OPERATORS: [char; 5] = ['*', '.', '\u{00B7}', '&', '\u{2227}'];

/// Parse a sum-of-products expression into its sorted minterm set.
///
/// Terms are separated by `+`. Inside a term each variable letter may be
/// followed by negation markers (`'`, `’`, `!` or a combining overline),
/// each of which toggles the literal. `1` and `0` are constant terms.
/// Whitespace is ignored, so `A 'B` reads as `A'B`. Characters that are not
/// variables of this map are skipped; a term fails only when nothing in it
/// is a variable or a constant.
///
/// A term naming a variable both plain and complemented (`AA'`) is a
/// contradiction and covers no minterms.
pub fn parse(expression: &str, num_vars: u32) -> Result<Vec<u32>, KmapError> {
    let minterms: BTreeSet<u32> = parse_patterns(expression, num_vars)?
        .iter()
        .flat_map(BitPattern::covered_minterms)
        .collect();

    debug!(expression, num_vars, count = minterms.len(), "parsed expression");
    Ok(minterms.into_iter().collect())
}

/// Parse an expression into one pattern per satisfiable term.
///
/// Terms that can never be true (`0`, or `AA'`) produce no pattern.
pub fn parse_patterns(expression: &str, num_vars: u32) -> Result<Vec<BitPattern>, KmapError> {
    check_variable_count(num_vars)?;

    let malformed = |reason: String| KmapError::MalformedExpression {
        expression: expression.to_string(),
        reason,
    };

    let terms: Vec<&str> = expression
        .split('+')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .collect();

    if terms.is_empty() {
        return Err(malformed("no terms found".to_string()));
    }

    let mut patterns = Vec::with_capacity(terms.len());
    for term in terms {
        if let Some(pattern) = parse_term(term, num_vars).map_err(&malformed)? {
            patterns.push(pattern);
        }
    }
    Ok(patterns)
}

/// Parse one product term. `Ok(None)` means the term is unsatisfiable.
fn parse_term(term: &str, num_vars: u32) -> Result<Option<BitPattern>, String> {
    let names = &VARIABLE_NAMES[..num_vars as usize];

    let mut mask = 0u32;
    let mut value = 0u32;
    let mut contradiction = false;
    let mut saw_token = false;

    let mut chars = term.chars().filter(|ch| !ch.is_whitespace()).peekable();
    while let Some(raw) = chars.next() {
        let ch = raw.to_ascii_uppercase();

        if AND_OPERATORS.contains(&ch) {
            continue;
        }

        match ch {
            '1' => saw_token = true,
            '0' => {
                saw_token = true;
                contradiction = true;
            }
            _ => {
                let Some(variable) = names.iter().position(|&name| name == ch) else {
                    debug!(term, character = %raw, num_vars, "skipping unrecognised character");
                    continue;
                };
                saw_token = true;

                let mut negated = false;
                while chars.peek().is_some_and(|next| NEGATION_MARKERS.contains(next)) {
                    chars.next();
                    negated = !negated;
                }

                let literal = Literal::new(variable, negated);
                let bit = 1u32 << (num_vars as usize - 1 - literal.variable);
                let required = if literal.negated { 0 } else { bit };
                if mask & bit != 0 && value & bit != required {
                    contradiction = true;
                }
                mask |= bit;
                value = (value & !bit) | required;
            }
        }
    }

    if !saw_token {
        return Err(format!(
            "term '{}' has no variables or constants for {} variables",
            term, num_vars
        ));
    }
    if contradiction {
        return Ok(None);
    }

    BitPattern::new(num_vars, mask, value)
        .map(Some)
        .map_err(|err| err.to_string())
}

/// Render a pattern as a product term, e.g. `"0-1"` -> `A'C`.
/// A pattern with no fixed positions renders as `1`.
pub fn render(pattern: &BitPattern) -> String {
    let literals = pattern.literals();
    if literals.is_empty() {
        "1".to_string()
    } else {
        literals.iter().join("")
    }
}

/// Render a textual bit pattern, checking it has `num_vars` positions
pub fn render_term(pattern: &str, num_vars: u32) -> Result<String, KmapError> {
    Ok(render(&pattern_for(pattern, num_vars)?))
}

/// Minterms consistent with a textual bit pattern
pub fn covered_minterms(pattern: &str, num_vars: u32) -> Result<Vec<u32>, KmapError> {
    Ok(pattern_for(pattern, num_vars)?.covered_minterms())
}

fn pattern_for(pattern: &str, num_vars: u32) -> Result<BitPattern, KmapError> {
    check_variable_count(num_vars)?;
    let parsed: BitPattern = pattern.parse()?;
    if parsed.num_vars() != num_vars {
        return Err(KmapError::InvalidBitPattern {
            pattern: pattern.to_string(),
            reason: format!("expected {} positions, found {}", num_vars, parsed.num_vars()),
        });
    }
    Ok(parsed)
}

/// Render a sum of products; an empty cover renders as `0`
pub fn render_expression(patterns: &[BitPattern]) -> String {
    if patterns.is_empty() {
        "0".to_string()
    } else {
        patterns.iter().map(render).join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_patterns(num_vars: u32) -> Vec<BitPattern> {
        (0..num_vars)
            .map(|_| ['0', '1', '-'])
            .multi_cartesian_product()
            .map(|chars| chars.into_iter().collect::<String>().parse().unwrap())
            .collect()
    }

    #[test]
    fn test_parse_mixed_terms() {
        assert_eq!(parse("A'BC + AB'", 3).unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn test_parse_negation_markers() {
        for expr in ["A'B", "A!B", "A\u{2019}B", "A\u{0305}B", "a'b"] {
            assert_eq!(parse(expr, 2).unwrap(), vec![1], "expression {}", expr);
        }
        // Double negation cancels out
        assert_eq!(parse("A''B", 2).unwrap(), vec![3]);
    }

    #[test]
    fn test_parse_operators_and_whitespace() {
        assert_eq!(parse(" A * B' + A.B ", 2).unwrap(), vec![2, 3]);
        assert_eq!(parse("A + + B", 2).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_constants_and_contradictions() {
        assert_eq!(parse("1", 2).unwrap(), vec![0, 1, 2, 3]);
        assert!(parse("0", 3).unwrap().is_empty());
        assert!(parse("AA'", 2).unwrap().is_empty());
        assert_eq!(parse("AA' + B", 2).unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_parse_free_variables_vary() {
        // D is free in a four variable map
        assert_eq!(parse("ABC", 4).unwrap(), vec![14, 15]);
        assert_eq!(parse("E'F", 6).unwrap().len(), 16);
    }

    #[test]
    fn test_malformed_expressions() {
        for expr in ["", "   ", "+", " + + "] {
            assert!(matches!(
                parse(expr, 3),
                Err(KmapError::MalformedExpression { .. })
            ));
        }
        // A term with nothing usable in it still fails
        assert!(matches!(parse("XYZ", 3), Err(KmapError::MalformedExpression { .. })));
        assert!(matches!(parse("A + D", 3), Err(KmapError::MalformedExpression { .. })));
    }

    #[test]
    fn test_parse_skips_unknown_characters() {
        assert_eq!(parse("ABX", 3).unwrap(), vec![6, 7]);
        // D is not a variable of a three variable map
        assert_eq!(parse("ABD", 3).unwrap(), vec![6, 7]);
        // A marker with no variable before it is ignored
        assert_eq!(parse("'A", 2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_parse_marker_after_whitespace() {
        assert_eq!(parse("A 'B", 2).unwrap(), vec![1]);
        assert_eq!(parse("A B '", 2).unwrap(), vec![2]);
    }

    #[test]
    fn test_parse_rejects_bad_variable_count() {
        assert!(matches!(
            parse("A", 7),
            Err(KmapError::UnsupportedVariableCount { found: 7, .. })
        ));
    }

    #[test]
    fn test_render_terms() {
        assert_eq!(render_term("0--", 3).unwrap(), "A'");
        assert_eq!(render_term("1-01", 4).unwrap(), "AC'D");
        assert_eq!(render_term("----", 4).unwrap(), "1");
        assert!(render_term("01", 3).is_err());
    }

    #[test]
    fn test_render_expression() {
        let patterns: Vec<BitPattern> = vec!["-0-0".parse().unwrap(), "11--".parse().unwrap()];
        assert_eq!(render_expression(&patterns), "B'D' + AB");
        assert_eq!(render_expression(&[]), "0");
    }

    #[test]
    fn test_round_trip_every_pattern() {
        for num_vars in 2..=6 {
            for pattern in all_patterns(num_vars) {
                let text = render(&pattern);
                assert_eq!(
                    parse(&text, num_vars).unwrap(),
                    pattern.covered_minterms(),
                    "pattern {} rendered as {}",
                    pattern,
                    text
                );
            }
        }
    }

    #[test]
    fn test_expression_round_trip() {
        let expr = "AB'C + A'D + BCD'";
        let patterns = parse_patterns(expr, 4).unwrap();
        assert_eq!(render_expression(&patterns), expr);
        assert_eq!(parse(&render_expression(&patterns), 4).unwrap(), parse(expr, 4).unwrap());
    }

    #[test]
    fn test_covered_minterms_helper() {
        assert_eq!(covered_minterms("-1", 2).unwrap(), vec![1, 3]);
    }
}
