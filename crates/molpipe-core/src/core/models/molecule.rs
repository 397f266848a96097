use super::conformer::Conformer;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bond multiplicity as encoded in connection tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Maps a molfile bond-type code (1-4) to a bond order.
    pub fn from_ctfile(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            4 => Some(Self::Aromatic),
            _ => None,
        }
    }

    /// Returns the molfile bond-type code for this order.
    pub fn ctfile_code(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Aromatic => 4,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "4" | "ar" | "aromatic" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

/// An atom of a small molecule.
///
/// Only the element symbol and formal charge are tracked; positions live on the
/// molecule's conformers so that a single atom list can be shared by many
/// geometries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// The element symbol exactly as read from the structure file (e.g. "C", "Se").
    pub symbol: String,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
}

impl Atom {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            formal_charge: 0,
        }
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    /// Returns `true` for hydrogen and its isotopes.
    pub fn is_hydrogen(&self) -> bool {
        matches!(self.symbol.as_str(), "H" | "D" | "T")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize, // 0-based index of the first atom
    pub atom2: usize, // 0-based index of the second atom
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Bond references atom {index}, but the molecule only has {num_atoms} atoms")]
    AtomOutOfRange { index: usize, num_atoms: usize },
    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),
}

/// A single molecule record: atoms, bonds, and any number of 3-D conformers.
///
/// Conformer lengths are not checked when conformers are added; the mismatch
/// is caught when the conformers are read back as [`ConformerRecord`](super::conformer::ConformerRecord)s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    /// The record name (first header line of a molfile).
    pub name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    conformers: Vec<Conformer>,
}

impl Molecule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn add_bond(
        &mut self,
        atom1: usize,
        atom2: usize,
        order: BondOrder,
    ) -> Result<(), MoleculeError> {
        let num_atoms = self.atoms.len();
        for index in [atom1, atom2] {
            if index >= num_atoms {
                return Err(MoleculeError::AtomOutOfRange { index, num_atoms });
            }
        }
        if atom1 == atom2 {
            return Err(MoleculeError::SelfBond(atom1));
        }
        self.bonds.push(Bond::new(atom1, atom2, order));
        Ok(())
    }

    /// Appends a conformer and returns its index.
    pub fn add_conformer(&mut self, conformer: Conformer) -> usize {
        self.conformers.push(conformer);
        self.conformers.len() - 1
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    pub fn conformers_mut(&mut self) -> &mut [Conformer] {
        &mut self.conformers
    }

    /// Consumes the molecule, returning its element symbols and conformers.
    pub fn into_symbols_and_conformers(self) -> (Vec<String>, Vec<Conformer>) {
        let symbols = self.atoms.into_iter().map(|a| a.symbol).collect();
        (symbols, self.conformers)
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Element symbols in atom order.
    pub fn element_symbols(&self) -> Vec<String> {
        self.atoms.iter().map(|a| a.symbol.clone()).collect()
    }

    /// Builds the adjacency list of the bond graph, indexed by atom.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.atoms.len()];
        for bond in &self.bonds {
            adjacency[bond.atom1].push(bond.atom2);
            adjacency[bond.atom2].push(bond.atom1);
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn ethanol() -> Molecule {
        let mut mol = Molecule::new("ethanol");
        let c1 = mol.add_atom(Atom::new("C"));
        let c2 = mol.add_atom(Atom::new("C"));
        let o = mol.add_atom(Atom::new("O"));
        mol.add_bond(c1, c2, BondOrder::Single).unwrap();
        mol.add_bond(c2, o, BondOrder::Single).unwrap();
        mol
    }

    #[test]
    fn bond_order_round_trips_through_ctfile_codes() {
        for order in [
            BondOrder::Single,
            BondOrder::Double,
            BondOrder::Triple,
            BondOrder::Aromatic,
        ] {
            assert_eq!(BondOrder::from_ctfile(order.ctfile_code()), Some(order));
        }
        assert_eq!(BondOrder::from_ctfile(8), None);
    }

    #[test]
    fn bond_order_parses_from_strings() {
        assert_eq!("double".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("AR".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
        assert!("quadruple".parse::<BondOrder>().is_err());
    }

    #[test]
    fn add_bond_rejects_out_of_range_and_self_bonds() {
        let mut mol = ethanol();
        assert_eq!(
            mol.add_bond(0, 7, BondOrder::Single),
            Err(MoleculeError::AtomOutOfRange {
                index: 7,
                num_atoms: 3
            })
        );
        assert_eq!(
            mol.add_bond(1, 1, BondOrder::Single),
            Err(MoleculeError::SelfBond(1))
        );
        assert_eq!(mol.bonds().len(), 2);
    }

    #[test]
    fn adjacency_lists_both_directions() {
        let mol = ethanol();
        let adjacency = mol.adjacency();
        assert_eq!(adjacency[0], vec![1]);
        assert_eq!(adjacency[1], vec![0, 2]);
        assert_eq!(adjacency[2], vec![1]);
    }

    #[test]
    fn symbols_and_conformers_keep_storage_order() {
        let mut mol = ethanol();
        for offset in [0.0, 10.0] {
            mol.add_conformer(Conformer::new(vec![
                Point3::new(offset, 0.0, 0.0),
                Point3::new(offset + 1.5, 0.0, 0.0),
                Point3::new(offset + 2.0, 1.2, 0.0),
            ]));
        }

        let (symbols, conformers) = mol.into_symbols_and_conformers();
        assert_eq!(symbols, vec!["C", "C", "O"]);
        assert_eq!(conformers.len(), 2);
        assert_eq!(conformers[1].positions[0], Point3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn hydrogen_isotopes_are_hydrogens() {
        assert!(Atom::new("H").is_hydrogen());
        assert!(Atom::new("D").is_hydrogen());
        assert!(!Atom::new("Hg").is_hydrogen());
    }
}
