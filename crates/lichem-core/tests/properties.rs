//! Invariants that must hold for any partition of a realistic system.

mod common;

use common::{pdb_text, read_pdb};
use lichemprep::core::models::basis::BasisTier;
use lichemprep::core::models::system::MolecularSystem;
use lichemprep::core::selection::index::AtomIndex;
use lichemprep::core::selection::query::Selection;
use lichemprep::core::selection::resolver::{SelectionResolver, SystemResolver};
use lichemprep::engine::basis::BasisMapper;
use lichemprep::engine::config::{PreparationConfig, PreparationConfigBuilder};
use lichemprep::engine::partition::RegionPartitioner;
use once_cell::sync::Lazy;

// A small enzyme-like layout: a 6-residue backbone, a Mg ion, a ligand, and a shell of waters.
static SYSTEM: Lazy<MolecularSystem> = Lazy::new(|| {
    let mut rows: Vec<(&str, &str, isize, [f64; 3])> = Vec::new();
    for res in 0..6 {
        let x = 3.8 * res as f64;
        rows.push(("N", "ALA", 85 + res, [x, 0.0, 0.2]));
        rows.push(("CA", "ALA", 85 + res, [x + 1.2, 0.9, 0.1]));
        rows.push(("C", "ALA", 85 + res, [x + 2.5, 0.3, -0.1]));
        rows.push(("O", "ALA", 85 + res, [x + 2.7, -0.9, -0.3]));
    }
    rows.push(("MG", "MG", 475, [9.0, 4.0, 1.0]));
    rows.push(("C1", "LIG", 500, [10.5, 5.5, 1.5]));
    rows.push(("O1", "LIG", 500, [11.2, 6.4, 2.4]));
    for w in 0..12 {
        let angle = w as f64 * 0.52;
        let r = 4.0 + (w % 3) as f64 * 3.0;
        let center = [9.0 + r * angle.cos(), 4.0 + r * angle.sin(), 1.0 + 0.4 * w as f64];
        rows.push(("O", "WAT", 1000 + w, center));
        rows.push(("H1", "WAT", 1000 + w, [center[0] + 0.9, center[1], center[2]]));
        rows.push(("H2", "WAT", 1000 + w, [center[0], center[1] + 0.9, center[2]]));
    }
    read_pdb(&pdb_text(&rows, Some([60.0, 60.0, 60.0])))
});

fn config() -> PreparationConfig {
    PreparationConfigBuilder::new()
        .qm_selection("metal", Selection::residue_names(["MG"]))
        .qm_selection("ligand", Selection::residue_names(["LIG"]))
        .qm_selection(
            "side chain",
            Selection::and([Selection::residue(88), Selection::atom_names(["CA", "C", "O"])]),
        )
        .qm_selection(
            "close waters",
            Selection::by_residue(Selection::and([
                Selection::around(4.5, Selection::residue(475)),
                Selection::residue_names(["WAT"]),
            ])),
        )
        .pseudobond_selection("cut", Selection::and([Selection::residue(88), Selection::atom_names(["N"])]))
        .boundary_selection("neighbours", Selection::residue(87))
        .higher_basis_selection("metal", Selection::residue_names(["MG"]))
        .higher_basis_selection("outside", Selection::residue(85))
        .sphere_center(AtomIndex::native(24))
        .sphere_radius(8.0)
        .build()
        .unwrap()
}

#[test]
fn every_atom_is_frozen_or_unfrozen_never_both() {
    let config = config();
    let resolver = SystemResolver::new(&SYSTEM);
    let (regions, summary) = RegionPartitioner::new(&resolver, &SYSTEM, &config.partition)
        .partition()
        .unwrap();

    let unfrozen = regions.unfrozen();
    for index in resolver.universe().iter() {
        assert!(
            regions.frozen.contains(index) ^ unfrozen.contains(index),
            "atom {index} must be in exactly one of frozen / unfrozen"
        );
    }
    assert_eq!(
        regions.frozen.len() + unfrozen.len(),
        SYSTEM.atom_count()
    );
    assert!(regions.qm.iter().all(|i| !regions.frozen.contains(i)));
    assert_eq!(summary.frozen, regions.frozen.len());

    let frozen = regions.frozen.as_slice();
    assert!(frozen.windows(2).all(|w| w[0] < w[1]), "frozen is in universe order");
}

#[test]
fn basis_ids_are_contiguous_and_tiers_follow_precedence() {
    let config = config();
    let resolver = SystemResolver::new(&SYSTEM);
    let (regions, _) = RegionPartitioner::new(&resolver, &SYSTEM, &config.partition)
        .partition()
        .unwrap();
    let (records, summary) = BasisMapper::new(&resolver, &config.basis)
        .map(&regions)
        .unwrap();

    let expected_len = regions.qm.union(&regions.pseudobond).len();
    assert_eq!(records.len(), expected_len);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.basis_id, i + 1);
    }

    let mut seen = std::collections::HashSet::new();
    assert!(records.iter().all(|r| seen.insert(r.region_id)));

    for record in &records {
        let expected = if regions.pseudobond.contains(record.region_id) {
            BasisTier::Pseudobond
        } else if SYSTEM.atom(record.region_id).unwrap().res_name == "MG" {
            BasisTier::Elevated
        } else {
            BasisTier::Standard
        };
        assert_eq!(record.tier, expected, "atom {}", record.region_id);
    }

    assert_eq!(summary.elevated, 1);
    assert_eq!(summary.pseudobond, 1);
    // Residue 85 is neither QM nor pseudobond.
    assert_eq!(summary.ignored_higher_basis, [0, 1, 2, 3]);
}

#[test]
fn close_waters_are_whole_residues() {
    let config = config();
    let resolver = SystemResolver::new(&SYSTEM);
    let (regions, _) = RegionPartitioner::new(&resolver, &SYSTEM, &config.partition)
        .partition()
        .unwrap();

    for index in regions.qm.iter() {
        let residue = SYSTEM.residue_of(index).unwrap();
        if residue.name == "WAT" {
            for &member in residue.atoms() {
                assert!(regions.qm.contains(member));
            }
        }
    }
}
