use nalgebra::Point3;
use ndarray::Array2;

/// One 3-D geometry of a molecule, one position per atom in atom order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conformer {
    pub positions: Vec<Point3<f64>>,
}

impl Conformer {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Copies the positions into an `(n, 3)` array.
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.positions.len(), 3), |(i, j)| self.positions[i][j])
    }
}

/// Element symbols of a molecule paired with the coordinates of one conformer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformerRecord {
    pub symbols: Vec<String>,
    /// Shape `(symbols.len(), 3)`.
    pub coords: Array2<f64>,
}

impl ConformerRecord {
    /// # Panics
    ///
    /// Panics when the symbol count and coordinate row count differ. Such a record
    /// comes from a corrupt or mismatched input and cannot be encoded.
    pub fn new(symbols: Vec<String>, coords: Array2<f64>) -> Self {
        assert_eq!(
            symbols.len(),
            coords.nrows(),
            "conformer has {} element symbols but {} coordinate rows",
            symbols.len(),
            coords.nrows()
        );
        Self { symbols, coords }
    }

    pub fn num_atoms(&self) -> usize {
        self.symbols.len()
    }
}

/// Array encoding of a conformer as consumed by the shape-alignment model.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedConformer {
    /// Atom coordinates, shape `(n, 3)`, centered on request.
    pub xyz: Array2<f64>,
    /// One-hot element categories, shape `(n, NUM_CATEGORIES)`.
    pub types: Array2<f64>,
}
