//! Syntactic SMILES validation.
//!
//! This is a grammar check only: it catches the truncated or malformed strings a
//! sequence model emits (unbalanced branches, dangling ring closures, stray
//! characters) but performs no valence or aromaticity perception.

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SmilesError {
    #[error("SMILES string is empty")]
    Empty,
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("Bond at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },
    #[error("Unbalanced branch at position {pos}")]
    UnbalancedBranch { pos: usize },
    #[error("Bracket atom opened at position {pos} is not closed")]
    UnclosedBracket { pos: usize },
    #[error("Bracket atom at position {pos} has no element symbol")]
    EmptyBracket { pos: usize },
    #[error("Ring closure {0} is never closed")]
    UnclosedRing(u32),
    #[error("SMILES string ends without an atom")]
    UnexpectedEnd,
}

/// Returns `true` when `smiles` passes [`validate`].
pub fn is_valid(smiles: &str) -> bool {
    validate(smiles).is_ok()
}

/// Checks the SMILES grammar of `smiles`.
pub fn validate(smiles: &str) -> Result<(), SmilesError> {
    if smiles.is_empty() {
        return Err(SmilesError::Empty);
    }

    let chars: Vec<char> = smiles.chars().collect();
    let mut branches: Vec<usize> = Vec::new();
    let mut open_rings: BTreeSet<u32> = BTreeSet::new();
    let mut has_anchor = false; // an atom is available to bond to
    let mut pending_bond: Option<usize> = None;
    let mut branch_just_opened = false;

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' | 'b' | 'c' | 'n' | 'o' | 'p' | 's'
            | '*' => {
                if (ch == 'B' && chars.get(i + 1) == Some(&'r'))
                    || (ch == 'C' && chars.get(i + 1) == Some(&'l'))
                {
                    i += 1;
                }
                has_anchor = true;
                pending_bond = None;
                branch_just_opened = false;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|offset| i + offset)
                    .ok_or(SmilesError::UnclosedBracket { pos: i })?;
                let content = &chars[i + 1..close];
                if !content.iter().any(|c| c.is_ascii_alphabetic() || *c == '*') {
                    return Err(SmilesError::EmptyBracket { pos: i });
                }
                if content.iter().any(|c| *c == '[') {
                    return Err(SmilesError::UnexpectedChar { pos: i + 1, ch: '[' });
                }
                i = close;
                has_anchor = true;
                pending_bond = None;
                branch_just_opened = false;
            }
            '-' | '=' | '#' | '$' | ':' | '/' | '\\' => {
                if !has_anchor || pending_bond.is_some() {
                    return Err(SmilesError::UnexpectedChar { pos: i, ch });
                }
                pending_bond = Some(i);
                branch_just_opened = false;
            }
            '(' => {
                if !has_anchor || pending_bond.is_some() || branch_just_opened {
                    return Err(SmilesError::UnbalancedBranch { pos: i });
                }
                branches.push(i);
                branch_just_opened = true;
            }
            ')' => {
                if let Some(pos) = pending_bond {
                    return Err(SmilesError::DanglingBond { pos });
                }
                if branch_just_opened || branches.pop().is_none() {
                    return Err(SmilesError::UnbalancedBranch { pos: i });
                }
                has_anchor = true;
            }
            '0'..='9' | '%' => {
                if !has_anchor || branch_just_opened {
                    return Err(SmilesError::UnexpectedChar { pos: i, ch });
                }
                let label = if ch == '%' {
                    let digits: String = chars.iter().skip(i + 1).take(2).collect();
                    if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
                        return Err(SmilesError::UnexpectedChar { pos: i, ch });
                    }
                    i += 2;
                    digits.parse::<u32>().unwrap_or_default()
                } else {
                    ch.to_digit(10).unwrap_or_default()
                };
                if !open_rings.remove(&label) {
                    open_rings.insert(label);
                }
                pending_bond = None;
            }
            '.' => {
                if !has_anchor || pending_bond.is_some() || branch_just_opened {
                    return Err(SmilesError::UnexpectedChar { pos: i, ch });
                }
                has_anchor = false;
            }
            _ => return Err(SmilesError::UnexpectedChar { pos: i, ch }),
        }
        i += 1;
    }

    if let Some(pos) = pending_bond {
        return Err(SmilesError::DanglingBond { pos });
    }
    if let Some(&pos) = branches.last() {
        return Err(SmilesError::UnbalancedBranch { pos });
    }
    if let Some(&label) = open_rings.iter().next() {
        return Err(SmilesError::UnclosedRing(label));
    }
    if !has_anchor {
        return Err(SmilesError::UnexpectedEnd);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_drug_like_smiles() {
        for smiles in [
            "C",
            "CCO",
            "c1ccccc1",
            "CC(=O)Oc1ccccc1C(=O)O",
            "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",
            "[NH4+].[Cl-]",
            "C%10CCCCC%10",
            "F/C=C/F",
            "O=C(O)C[Se]C",
            "BrCCCl",
        ] {
            assert!(is_valid(smiles), "{smiles} should be valid");
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(validate(""), Err(SmilesError::Empty));
    }

    #[test]
    fn rejects_unbalanced_branches() {
        assert_eq!(
            validate("CC(C"),
            Err(SmilesError::UnbalancedBranch { pos: 2 })
        );
        assert_eq!(
            validate("CC)C"),
            Err(SmilesError::UnbalancedBranch { pos: 2 })
        );
        assert_eq!(
            validate("C()C"),
            Err(SmilesError::UnbalancedBranch { pos: 2 })
        );
        assert_eq!(
            validate("(C)C"),
            Err(SmilesError::UnbalancedBranch { pos: 0 })
        );
    }

    #[test]
    fn rejects_unclosed_rings() {
        assert_eq!(validate("c1cccc"), Err(SmilesError::UnclosedRing(1)));
        assert_eq!(validate("C%12CC"), Err(SmilesError::UnclosedRing(12)));
    }

    #[test]
    fn rejects_dangling_bonds_and_stray_characters() {
        assert_eq!(validate("CC="), Err(SmilesError::DanglingBond { pos: 2 }));
        assert_eq!(validate("C(=)C"), Err(SmilesError::DanglingBond { pos: 2 }));
        assert_eq!(
            validate("CC==C"),
            Err(SmilesError::UnexpectedChar { pos: 3, ch: '=' })
        );
        assert_eq!(
            validate("CXC"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: 'X' })
        );
        assert_eq!(validate("CC."), Err(SmilesError::UnexpectedEnd));
    }

    #[test]
    fn rejects_broken_bracket_atoms() {
        assert_eq!(validate("C[NH4"), Err(SmilesError::UnclosedBracket { pos: 1 }));
        assert_eq!(validate("C[]C"), Err(SmilesError::EmptyBracket { pos: 1 }));
    }
}
