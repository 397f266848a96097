use crate::core::io::traits::MolecularFile;
use crate::core::models::conformer::Conformer;
use crate::core::models::molecule::{Atom, BondOrder, Molecule};
use nalgebra::Point3;
use std::io::{self, BufRead, Lines, Write};
use thiserror::Error;
use tracing::warn;

const RECORD_DELIMITER: &str = "$$$$";
const PROGRAM_LINE: &str = "  molpipe          3D";

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {details}")]
    Parse { line: usize, details: String },
}

impl SdfError {
    fn parse(line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            line,
            details: details.into(),
        }
    }
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

/// Maps the molfile atom-block charge code to a formal charge.
fn charge_from_code(code: u8) -> i8 {
    match code {
        1 => 3,
        2 => 2,
        3 => 1,
        5 => -1,
        6 => -2,
        7 => -3,
        _ => 0,
    }
}

/// Parses a fixed-width count field pair, falling back to whitespace splitting
/// for files that do not respect the column layout.
fn parse_index_pair(line: &str, line_no: usize, what: &str) -> Result<(usize, usize), SdfError> {
    let fixed = (
        slice_and_trim(line, 0, 3).parse::<usize>(),
        slice_and_trim(line, 3, 6).parse::<usize>(),
    );
    if let (Ok(first), Ok(second)) = fixed {
        return Ok((first, second));
    }
    let tokens: Vec<_> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [first, second, ..] => {
            let first = first
                .parse()
                .map_err(|_| SdfError::parse(line_no, format!("invalid {what}")))?;
            let second = second
                .parse()
                .map_err(|_| SdfError::parse(line_no, format!("invalid {what}")))?;
            Ok((first, second))
        }
        _ => Err(SdfError::parse(line_no, format!("missing {what}"))),
    }
}

fn parse_coordinate(line: &str, line_no: usize, start: usize, axis: char) -> Result<f64, SdfError> {
    slice_and_trim(line, start, start + 10)
        .parse::<f64>()
        .map_err(|_| SdfError::parse(line_no, format!("invalid {axis} coordinate in atom line")))
}

/// Parses one molfile block (without its `$$$$` terminator).
fn parse_record(lines: &[(usize, String)]) -> Result<Molecule, SdfError> {
    if lines.len() < 4 {
        let line = lines.last().map(|(ln, _)| *ln).unwrap_or(0);
        return Err(SdfError::parse(
            line,
            "record must contain a three-line header and a counts line",
        ));
    }

    let (counts_no, counts_line) = (&lines[3].0, &lines[3].1);
    if counts_line.contains("V3000") {
        return Err(SdfError::parse(*counts_no, "V3000 records are not supported"));
    }
    let (atom_count, bond_count) = parse_index_pair(counts_line, *counts_no, "counts line")?;

    let atom_start: usize = 4;
    let bounds = atom_start
        .checked_add(atom_count)
        .and_then(|bond_start| Some((bond_start, bond_start.checked_add(bond_count)?)))
        .filter(|&(_, bond_end)| bond_end <= lines.len());
    let Some((bond_start, bond_end)) = bounds else {
        return Err(SdfError::parse(
            lines.last().map(|(ln, _)| *ln).unwrap_or(*counts_no),
            "record ended before atoms and bonds were fully specified",
        ));
    };

    let mut molecule = Molecule::new(lines[0].1.trim());
    let mut positions = Vec::with_capacity(atom_count);

    for (ln, raw) in &lines[atom_start..bond_start] {
        let x = parse_coordinate(raw, *ln, 0, 'x')?;
        let y = parse_coordinate(raw, *ln, 10, 'y')?;
        let z = parse_coordinate(raw, *ln, 20, 'z')?;
        let symbol = slice_and_trim(raw, 31, 34);
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '*') {
            return Err(SdfError::parse(*ln, "invalid element symbol in atom line"));
        }
        let charge_code = slice_and_trim(raw, 36, 39).parse::<u8>().unwrap_or(0);
        molecule.add_atom(Atom::new(symbol).with_charge(charge_from_code(charge_code)));
        positions.push(Point3::new(x, y, z));
    }

    for (ln, raw) in &lines[bond_start..bond_end] {
        let (a1, a2) = parse_index_pair(raw, *ln, "bond atom indices")?;
        let order_code = slice_and_trim(raw, 6, 9)
            .parse::<u8>()
            .ok()
            .or_else(|| raw.split_whitespace().nth(2).and_then(|t| t.parse().ok()))
            .ok_or_else(|| SdfError::parse(*ln, "invalid bond order value"))?;
        let order = BondOrder::from_ctfile(order_code)
            .ok_or_else(|| SdfError::parse(*ln, "unsupported bond order in bond line"))?;
        if a1 == 0 || a2 == 0 {
            return Err(SdfError::parse(*ln, "bond references atom 0"));
        }
        molecule
            .add_bond(a1 - 1, a2 - 1, order)
            .map_err(|e| SdfError::parse(*ln, e.to_string()))?;
    }

    let mut charge_block_seen = false;
    for (ln, raw) in &lines[bond_end..] {
        if raw.starts_with("M  END") {
            break;
        }
        if raw.starts_with("M  CHG") {
            if !charge_block_seen {
                // Any CHG property supersedes all atom-block charges.
                molecule
                    .atoms_mut()
                    .iter_mut()
                    .for_each(|atom| atom.formal_charge = 0);
                charge_block_seen = true;
            }
            apply_charge_property(&mut molecule, raw, *ln)?;
        }
    }

    molecule.add_conformer(Conformer::new(positions));
    Ok(molecule)
}

fn apply_charge_property(molecule: &mut Molecule, raw: &str, ln: usize) -> Result<(), SdfError> {
    let tokens: Vec<_> = raw.split_whitespace().skip(2).collect();
    let (count, pairs) = tokens
        .split_first()
        .ok_or_else(|| SdfError::parse(ln, "empty charge property"))?;
    let count: usize = count
        .parse()
        .map_err(|_| SdfError::parse(ln, "invalid charge property count"))?;
    if pairs.len() / 2 < count {
        return Err(SdfError::parse(ln, "charge property has too few entries"));
    }
    let num_atoms = molecule.num_atoms();
    for pair in pairs.chunks(2).take(count) {
        let index: usize = pair[0]
            .parse()
            .map_err(|_| SdfError::parse(ln, "invalid atom index in charge property"))?;
        let charge: i8 = pair[1]
            .parse()
            .map_err(|_| SdfError::parse(ln, "invalid charge value in charge property"))?;
        if index == 0 || index > num_atoms {
            return Err(SdfError::parse(ln, "charge property references unknown atom"));
        }
        molecule.atoms_mut()[index - 1].formal_charge = charge;
    }
    Ok(())
}

/// Streams the records of an SDF file.
pub struct SdfRecords<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> SdfRecords<R> {
    fn finish_block(block: &[(usize, String)]) -> Option<Molecule> {
        match parse_record(block) {
            Ok(molecule) => Some(molecule),
            Err(e) => {
                warn!("Skipping unparseable SDF record: {}", e);
                None
            }
        }
    }
}

impl<R: BufRead> Iterator for SdfRecords<R> {
    type Item = Result<Option<Molecule>, SdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut block = Vec::new();
        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if line.trim_end() == RECORD_DELIMITER {
                return Some(Ok(Self::finish_block(&block)));
            }
            block.push((self.line_no, line));
        }

        if block.iter().all(|(_, line)| line.trim().is_empty()) {
            return None;
        }
        Some(Ok(Self::finish_block(&block)))
    }
}

/// MDL structure-data file in the V2000 layout.
pub struct SdfFile;

impl SdfFile {
    fn write_record(
        molecule: &Molecule,
        positions: &[Point3<f64>],
        writer: &mut impl Write,
    ) -> Result<(), SdfError> {
        writeln!(writer, "{}", molecule.name)?;
        writeln!(writer, "{PROGRAM_LINE}")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
            molecule.num_atoms(),
            molecule.bonds().len()
        )?;

        for (i, atom) in molecule.atoms().iter().enumerate() {
            let p = positions.get(i).copied().unwrap_or_else(Point3::origin);
            writeln!(
                writer,
                "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
                p.x, p.y, p.z, atom.symbol
            )?;
        }
        for bond in molecule.bonds() {
            writeln!(
                writer,
                "{:>3}{:>3}{:>3}  0",
                bond.atom1 + 1,
                bond.atom2 + 1,
                bond.order.ctfile_code()
            )?;
        }

        let charged: Vec<(usize, i8)> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.formal_charge != 0)
            .map(|(i, a)| (i + 1, a.formal_charge))
            .collect();
        for chunk in charged.chunks(8) {
            write!(writer, "M  CHG{:>3}", chunk.len())?;
            for (index, charge) in chunk {
                write!(writer, " {index:>3} {charge:>3}")?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "M  END")?;
        writeln!(writer, "{RECORD_DELIMITER}")?;
        Ok(())
    }
}

impl MolecularFile for SdfFile {
    type Error = SdfError;
    type Records<R: BufRead> = SdfRecords<R>;

    fn records<R: BufRead>(reader: R) -> Self::Records<R> {
        SdfRecords {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        if molecule.conformers().is_empty() {
            return Self::write_record(molecule, &[], writer);
        }
        for conformer in molecule.conformers() {
            Self::write_record(molecule, &conformer.positions, writer)?;
        }
        Ok(())
    }
}
