use super::elements::{ElementCategory, NUM_CATEGORIES};
use crate::core::models::conformer::{ConformerRecord, EncodedConformer};
use ndarray::{Array2, ArrayView2, Axis};

/// Encodes element symbols and coordinates into model-ready arrays.
///
/// Each row of the type matrix is one-hot on the symbol's [`ElementCategory`]
/// (unknown symbols land in [`ElementCategory::Other`]). With `center` set the
/// per-axis mean is subtracted from every coordinate row so the centroid sits at
/// the origin; otherwise coordinates are copied unchanged.
///
/// # Panics
///
/// Panics if `symbols.len()` differs from the number of coordinate rows.
pub fn mol_to_np<S: AsRef<str>>(
    symbols: &[S],
    coords: ArrayView2<'_, f64>,
    center: bool,
) -> EncodedConformer {
    assert_eq!(
        symbols.len(),
        coords.nrows(),
        "cannot encode {} element symbols against {} coordinate rows",
        symbols.len(),
        coords.nrows()
    );

    let mut types = Array2::<f64>::zeros((symbols.len(), NUM_CATEGORIES));
    for (row, symbol) in symbols.iter().enumerate() {
        types[[row, ElementCategory::from_symbol(symbol.as_ref()).index()]] = 1.0;
    }

    let xyz = match coords.mean_axis(Axis(0)) {
        Some(centroid) if center => &coords - &centroid,
        _ => coords.to_owned(),
    };

    EncodedConformer { xyz, types }
}

/// Shorthand for [`mol_to_np`] over a parsed record.
pub fn encode_record(record: &ConformerRecord, center: bool) -> EncodedConformer {
    mol_to_np(&record.symbols, record.coords.view(), center)
}
