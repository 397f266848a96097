use crate::core::models::molecule::{BondOrder, Molecule};
use crate::core::utils::geometry::rotate_about_axis;
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// A bond whose torsion can be rotated without breaking a ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatableBond {
    pub atom1: usize,
    pub atom2: usize,
    /// Atoms rotated when the torsion changes: the smaller side of the bond.
    pub moving: Vec<usize>,
}

/// Collects atoms reachable from `start` without crossing the bond `start`-`blocked`.
fn side_of_bond(adjacency: &[Vec<usize>], start: usize, blocked: usize) -> Vec<usize> {
    let mut visited = vec![false; adjacency.len()];
    let mut queue = VecDeque::from([start]);
    let mut side = Vec::new();
    visited[start] = true;

    while let Some(atom) = queue.pop_front() {
        side.push(atom);
        for &next in &adjacency[atom] {
            if atom == start && next == blocked {
                continue;
            }
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }
    side
}

/// Finds single, acyclic bonds between two heavy atoms that both carry another
/// heavy neighbour. Terminal groups (methyls, hydroxyls) are not rotatable.
pub fn find_rotatable_bonds(molecule: &Molecule) -> Vec<RotatableBond> {
    let atoms = molecule.atoms();
    let adjacency = molecule.adjacency();
    let heavy_degree = |atom: usize| {
        adjacency[atom]
            .iter()
            .filter(|&&n| !atoms[n].is_hydrogen())
            .count()
    };

    let mut rotatable = Vec::new();
    for bond in molecule.bonds() {
        let (a, b) = (bond.atom1, bond.atom2);
        if bond.order != BondOrder::Single || atoms[a].is_hydrogen() || atoms[b].is_hydrogen() {
            continue;
        }
        if heavy_degree(a) < 2 || heavy_degree(b) < 2 {
            continue;
        }

        let side_b = side_of_bond(&adjacency, b, a);
        if side_b.contains(&a) {
            continue; // ring bond
        }
        let side_a = side_of_bond(&adjacency, a, b);

        let moving = if side_b.len() <= side_a.len() {
            side_b
        } else {
            side_a
        };
        rotatable.push(RotatableBond {
            atom1: a,
            atom2: b,
            moving,
        });
    }
    rotatable
}

/// Rotates every rotatable torsion of every conformer by an angle drawn
/// uniformly from `[-max_degrees, max_degrees]`.
///
/// Bond lengths and bond angles are preserved; only dihedrals change. Returns
/// the number of rotatable bonds that were perturbed per conformer. A
/// non-positive `max_degrees` leaves the molecule untouched.
pub fn add_noise_to_torsion_angles<R: Rng + ?Sized>(
    molecule: &mut Molecule,
    max_degrees: f64,
    rng: &mut R,
) -> usize {
    if max_degrees <= 0.0 {
        return 0;
    }
    let bonds = find_rotatable_bonds(molecule);
    debug!(
        "Perturbing {} rotatable torsion(s) of '{}' by up to {} degrees.",
        bonds.len(),
        molecule.name,
        max_degrees
    );

    for conformer in molecule.conformers_mut() {
        for bond in &bonds {
            let pivot = conformer.positions[bond.atom2];
            let axis = pivot - conformer.positions[bond.atom1];
            let angle = rng.gen_range(-max_degrees..=max_degrees);
            trace!(
                "Rotating torsion {}-{} by {:.3} degrees.",
                bond.atom1, bond.atom2, angle
            );
            rotate_about_axis(
                &mut conformer.positions,
                &bond.moving,
                &pivot,
                &axis,
                angle,
            );
        }
    }
    bonds.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::conformer::Conformer;
    use crate::core::models::molecule::Atom;
    use crate::core::utils::geometry::calculate_dihedral;
    use nalgebra::Point3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TOLERANCE: f64 = 1e-9;

    /// Zig-zag butane heavy atoms plus one hydrogen on C0.
    fn butane() -> Molecule {
        let mut mol = Molecule::new("butane");
        for symbol in ["C", "C", "C", "C", "H"] {
            mol.add_atom(Atom::new(symbol));
        }
        for (a, b) in [(0, 1), (1, 2), (2, 3), (0, 4)] {
            mol.add_bond(a, b, BondOrder::Single).unwrap();
        }
        mol.add_conformer(Conformer::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.25, 0.85, 0.0),
            Point3::new(2.5, 0.0, 0.0),
            Point3::new(3.75, 0.85, 0.0),
            Point3::new(-0.9, 0.6, 0.0),
        ]));
        mol
    }

    fn cyclopropanol() -> Molecule {
        let mut mol = Molecule::new("cyclopropanol");
        for symbol in ["C", "C", "C", "O"] {
            mol.add_atom(Atom::new(symbol));
        }
        for (a, b) in [(0, 1), (1, 2), (2, 0), (0, 3)] {
            mol.add_bond(a, b, BondOrder::Single).unwrap();
        }
        mol
    }

    fn distance(mol: &Molecule, a: usize, b: usize) -> f64 {
        let p = &mol.conformers()[0].positions;
        (p[a] - p[b]).norm()
    }

    #[test]
    fn only_the_central_butane_bond_is_rotatable() {
        let bonds = find_rotatable_bonds(&butane());
        assert_eq!(bonds.len(), 1);
        assert_eq!((bonds[0].atom1, bonds[0].atom2), (1, 2));
        assert_eq!(bonds[0].moving, vec![2, 3]);
    }

    #[test]
    fn ring_bonds_and_terminal_groups_are_not_rotatable() {
        assert!(find_rotatable_bonds(&cyclopropanol()).is_empty());
    }

    #[test]
    fn noise_changes_dihedral_within_bounds_and_keeps_bond_lengths() {
        let mut mol = butane();
        let before: Vec<Point3<f64>> = mol.conformers()[0].positions.clone();
        let dihedral_before = calculate_dihedral(&before[0], &before[1], &before[2], &before[3]);
        let lengths_before: Vec<f64> = [(0, 1), (1, 2), (2, 3), (0, 4)]
            .iter()
            .map(|&(a, b)| distance(&mol, a, b))
            .collect();

        let mut rng = StdRng::seed_from_u64(7);
        let perturbed = add_noise_to_torsion_angles(&mut mol, 30.0, &mut rng);
        assert_eq!(perturbed, 1);

        let after = &mol.conformers()[0].positions;
        let dihedral_after = calculate_dihedral(&after[0], &after[1], &after[2], &after[3]);
        let mut delta = (dihedral_after - dihedral_before).abs();
        if delta > 180.0 {
            delta = 360.0 - delta;
        }
        assert!(delta <= 30.0 + TOLERANCE, "dihedral moved by {delta}");

        for (&(a, b), length) in [(0, 1), (1, 2), (2, 3), (0, 4)].iter().zip(lengths_before) {
            assert!((distance(&mol, a, b) - length).abs() < TOLERANCE);
        }
        assert_eq!(after[0], before[0]);
        assert_eq!(after[4], before[4]);
    }

    #[test]
    fn zero_noise_leaves_molecule_untouched() {
        let mut mol = butane();
        let original = mol.clone();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(add_noise_to_torsion_angles(&mut mol, 0.0, &mut rng), 0);
        assert_eq!(mol, original);
    }

    #[test]
    fn same_seed_gives_same_perturbation() {
        let mut first = butane();
        let mut second = butane();
        add_noise_to_torsion_angles(&mut first, 45.0, &mut StdRng::seed_from_u64(42));
        add_noise_to_torsion_angles(&mut second, 45.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
