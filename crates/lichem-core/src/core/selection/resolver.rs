use super::atom_set::AtomSet;
use super::error::SelectionError;
use super::index::AtomIndex;
use super::query::{Selection, matches_pattern};
use crate::core::models::system::MolecularSystem;
use kiddo::{KdTree, SquaredEuclidean};
use std::cell::OnceCell;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Bucket size of `kiddo::KdTree`; a bucket cannot split once more items than this share
/// one coordinate value on an axis.
const KDTREE_BUCKET_SIZE: usize = 32;

/// Spatial index used for radius queries.
enum RadiusIndex {
    Tree(KdTree<f64, 3>),
    /// Layouts with too many atoms sharing a coordinate value (planar or tiled lattices) are
    /// searched linearly.
    Scan(Vec<[f64; 3]>),
}

impl RadiusIndex {
    fn build(positions: Vec<[f64; 3]>) -> Self {
        if fits_kdtree_buckets(&positions) {
            RadiusIndex::Tree((&positions).into())
        } else {
            debug!(
                "More than {} atoms share a coordinate value; using a linear radius search.",
                KDTREE_BUCKET_SIZE
            );
            RadiusIndex::Scan(positions)
        }
    }

    fn mark_within(&self, mask: &mut [bool], center: &[f64; 3], radius: f64) {
        let radius_sq = radius * radius;
        match self {
            RadiusIndex::Tree(tree) => {
                for hit in tree.within_unsorted::<SquaredEuclidean>(center, radius_sq) {
                    mask[hit.item as usize] = true;
                }
            }
            RadiusIndex::Scan(positions) => {
                for (m, p) in mask.iter_mut().zip(positions) {
                    let d_sq: f64 = p.iter().zip(center).map(|(a, b)| (a - b) * (a - b)).sum();
                    if d_sq <= radius_sq {
                        *m = true;
                    }
                }
            }
        }
    }
}

/// Whether no axis has more than [`KDTREE_BUCKET_SIZE`] positions with the same value.
fn fits_kdtree_buckets(positions: &[[f64; 3]]) -> bool {
    (0..3).all(|axis| {
        let mut counts: HashMap<u64, usize> = HashMap::new();
        positions.iter().all(|p| {
            // `+ 0.0` folds -0.0 onto 0.0 so both hash alike.
            let count = counts.entry((p[axis] + 0.0).to_bits()).or_insert(0);
            *count += 1;
            *count <= KDTREE_BUCKET_SIZE
        })
    })
}

/// Evaluates selections against a structure.
///
/// Every result is returned in ascending native order. The region partitioner depends only on
/// this trait, so any structure source able to answer attribute and radius queries can drive
/// it.
pub trait SelectionResolver {
    /// Number of atoms in the universe; valid native indices are `0..atom_count()`.
    fn atom_count(&self) -> usize;

    /// Resolves a selection to its matching atoms in ascending native order.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection references an atom index that does not exist under
    /// its convention, has an inverted range, or uses an invalid radius.
    fn resolve(&self, selection: &Selection) -> Result<AtomSet, SelectionError>;

    /// Atoms within `radius` Angstroms of the atom at native index `center`.
    fn within_radius(&self, center: usize, radius: f64) -> Result<AtomSet, SelectionError> {
        self.resolve(&Selection::Sphere {
            radius,
            center: AtomIndex::native(center),
        })
    }

    /// Every atom of the universe in native order.
    fn universe(&self) -> AtomSet {
        (0..self.atom_count()).collect()
    }
}

/// [`SelectionResolver`] over an in-memory [`MolecularSystem`].
///
/// Radius queries are answered from a spatial index over all atom positions, built on first use.
pub struct SystemResolver<'a> {
    system: &'a MolecularSystem,
    index: OnceCell<RadiusIndex>,
}

impl<'a> SystemResolver<'a> {
    pub fn new(system: &'a MolecularSystem) -> Self {
        Self {
            system,
            index: OnceCell::new(),
        }
    }

    pub fn system(&self) -> &'a MolecularSystem {
        self.system
    }

    fn index(&self) -> &RadiusIndex {
        self.index.get_or_init(|| {
            let positions: Vec<[f64; 3]> = self
                .system
                .atoms()
                .iter()
                .map(|atom| [atom.position.x, atom.position.y, atom.position.z])
                .collect();
            RadiusIndex::build(positions)
        })
    }

    fn mark_within(&self, mask: &mut [bool], center: &[f64; 3], radius: f64) {
        if self.system.atom_count() == 0 {
            return;
        }
        self.index().mark_within(mask, center, radius);
    }

    fn evaluate(&self, selection: &Selection) -> Result<Vec<bool>, SelectionError> {
        let atoms = self.system.atoms();
        let count = atoms.len();

        let mask = match selection {
            Selection::All => vec![true; count],
            Selection::None => vec![false; count],
            Selection::AtomNames { names } => atoms
                .iter()
                .map(|atom| names.iter().any(|p| matches_pattern(p, &atom.name)))
                .collect(),
            Selection::ResidueNames { names } => atoms
                .iter()
                .map(|atom| names.iter().any(|p| matches_pattern(p, &atom.res_name)))
                .collect(),
            Selection::Residues { numbers } => atoms
                .iter()
                .map(|atom| numbers.contains(&atom.res_id))
                .collect(),
            Selection::ResidueRange { start, end } => {
                if start > end {
                    return Err(SelectionError::InvalidRange {
                        start: *start as i64,
                        end: *end as i64,
                    });
                }
                atoms
                    .iter()
                    .map(|atom| (*start..=*end).contains(&atom.res_id))
                    .collect()
            }
            Selection::Atoms {
                start,
                end,
                convention,
            } => {
                let first = AtomIndex::new(*start, *convention).to_native(count)?;
                let last = AtomIndex::new(*end, *convention).to_native(count)?;
                if first > last {
                    return Err(SelectionError::InvalidRange {
                        start: *start as i64,
                        end: *end as i64,
                    });
                }
                (0..count).map(|i| (first..=last).contains(&i)).collect()
            }
            Selection::Chains { ids } => atoms
                .iter()
                .map(|atom| ids.contains(&atom.chain_id))
                .collect(),
            Selection::And { of } => {
                let mut mask = vec![true; count];
                for inner in of {
                    let inner_mask = self.evaluate(inner)?;
                    for (m, hit) in mask.iter_mut().zip(inner_mask) {
                        *m &= hit;
                    }
                }
                mask
            }
            Selection::Or { of } => {
                let mut mask = vec![false; count];
                for inner in of {
                    let inner_mask = self.evaluate(inner)?;
                    for (m, hit) in mask.iter_mut().zip(inner_mask) {
                        *m |= hit;
                    }
                }
                mask
            }
            Selection::Not { of } => self.evaluate(of)?.into_iter().map(|hit| !hit).collect(),
            Selection::ByResidue { of } => {
                let inner_mask = self.evaluate(of)?;
                let mut mask = vec![false; count];
                for residue in self.system.residues() {
                    if residue.atoms().iter().any(|&i| inner_mask[i]) {
                        for &i in residue.atoms() {
                            mask[i] = true;
                        }
                    }
                }
                mask
            }
            Selection::Around { radius, of } => {
                check_radius(*radius)?;
                let reference = self.evaluate(of)?;
                let mut mask = vec![false; count];
                for (atom, _) in atoms.iter().zip(&reference).filter(|(_, hit)| **hit) {
                    let center = [atom.position.x, atom.position.y, atom.position.z];
                    self.mark_within(&mut mask, &center, *radius);
                }
                for (m, was_reference) in mask.iter_mut().zip(reference) {
                    *m &= !was_reference;
                }
                mask
            }
            Selection::Sphere { radius, center } => {
                check_radius(*radius)?;
                let center_index = center.to_native(count)?;
                let position = &atoms[center_index].position;
                let mut mask = vec![false; count];
                self.mark_within(&mut mask, &[position.x, position.y, position.z], *radius);
                mask
            }
        };

        Ok(mask)
    }
}

impl SelectionResolver for SystemResolver<'_> {
    fn atom_count(&self) -> usize {
        self.system.atom_count()
    }

    fn resolve(&self, selection: &Selection) -> Result<AtomSet, SelectionError> {
        let mask = self.evaluate(selection)?;
        let result: AtomSet = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &hit)| hit.then_some(i))
            .collect();
        trace!(
            "Selection {:?} resolved to {} atom(s).",
            selection,
            result.len()
        );
        Ok(result)
    }
}

fn check_radius(radius: f64) -> Result<(), SelectionError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(SelectionError::InvalidRadius(radius))
    }
}
