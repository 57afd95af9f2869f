use super::index::{AtomIndex, IndexConvention};
use serde::Deserialize;

/// A typed atom selection.
///
/// Property selectors match on atom attributes, combinators compose other selections, and
/// the spatial selectors (`Around`, `Sphere`) match on distance. In a run file a selection is a
/// table tagged by `type`, for example:
///
/// ```toml
/// select = { type = "and", of = [
///     { type = "residues", numbers = [88] },
///     { type = "atom-names", names = ["C", "O"] },
/// ] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", deny_unknown_fields)]
pub enum Selection {
    /// Every atom of the system.
    All,
    /// No atom.
    None,
    /// Atoms whose name matches any pattern (`*` at the end matches any suffix).
    AtomNames { names: Vec<String> },
    /// Atoms whose residue name matches any pattern.
    ResidueNames { names: Vec<String> },
    /// Atoms whose residue number is in the list.
    Residues { numbers: Vec<isize> },
    /// Atoms whose residue number lies in `start..=end`.
    ResidueRange { start: isize, end: isize },
    /// Atoms whose index lies in `start..=end`, both bounds written in `convention`.
    Atoms {
        start: usize,
        end: usize,
        convention: IndexConvention,
    },
    /// Atoms belonging to any of the listed chains.
    Chains { ids: Vec<char> },
    /// Atoms matched by every selection in the list.
    And { of: Vec<Selection> },
    /// Atoms matched by at least one selection in the list.
    Or { of: Vec<Selection> },
    /// Atoms not matched by the inner selection.
    Not { of: Box<Selection> },
    /// Whole residues containing at least one atom of the inner selection.
    ByResidue { of: Box<Selection> },
    /// Atoms within `radius` Angstroms of any atom of the inner selection, excluding the
    /// inner selection itself.
    Around { radius: f64, of: Box<Selection> },
    /// Atoms within `radius` Angstroms of the center atom, the center included.
    Sphere { radius: f64, center: AtomIndex },
}

impl Selection {
    pub fn atom_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Selection::AtomNames {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn residue_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Selection::ResidueNames {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn residue(number: isize) -> Self {
        Selection::Residues {
            numbers: vec![number],
        }
    }

    pub fn and(of: impl IntoIterator<Item = Selection>) -> Self {
        Selection::And {
            of: of.into_iter().collect(),
        }
    }

    pub fn or(of: impl IntoIterator<Item = Selection>) -> Self {
        Selection::Or {
            of: of.into_iter().collect(),
        }
    }

    pub fn by_residue(of: Selection) -> Self {
        Selection::ByResidue { of: Box::new(of) }
    }

    pub fn around(radius: f64, of: Selection) -> Self {
        Selection::Around {
            radius,
            of: Box::new(of),
        }
    }
}

/// Matches a name against a selection pattern.
///
/// Names are compared after trimming. A trailing `*` turns the pattern into a prefix match, so
/// `H*` matches every hydrogen named `H...`.
pub(crate) fn matches_pattern(pattern: &str, value: &str) -> bool {
    let pattern = pattern.trim();
    let value = value.trim();
    match pattern.strip_suffix('*') {
        Some(prefix) => value.starts_with(prefix),
        None => pattern == value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        select: Selection,
    }

    fn parse(toml_src: &str) -> Selection {
        toml::from_str::<Wrapper>(toml_src).unwrap().select
    }

    #[test]
    fn parses_nested_and_selection() {
        let selection = parse(
            r#"select = { type = "and", of = [
                { type = "residues", numbers = [88] },
                { type = "atom-names", names = ["C", "O"] },
            ] }"#,
        );
        assert_eq!(
            selection,
            Selection::and([Selection::residue(88), Selection::atom_names(["C", "O"])])
        );
    }

    #[test]
    fn parses_sphere_with_explicit_convention() {
        let selection = parse(
            r#"select = { type = "sphere", radius = 20.0, center = { index = 8107, convention = "one-based" } }"#,
        );
        assert_eq!(
            selection,
            Selection::Sphere {
                radius: 20.0,
                center: AtomIndex::one_based(8107),
            }
        );
    }

    #[test]
    fn parses_atom_range_and_by_residue_around() {
        let range = parse(
            r#"select = { type = "atoms", start = 2888, end = 2893, convention = "tinker" }"#,
        );
        assert_eq!(
            range,
            Selection::Atoms {
                start: 2888,
                end: 2893,
                convention: IndexConvention::OneBased,
            }
        );

        let waters = parse(
            r#"select = { type = "by-residue", of = { type = "and", of = [
                { type = "around", radius = 4.0, of = { type = "residues", numbers = [475] } },
                { type = "residue-names", names = ["WAT"] },
            ] } }"#,
        );
        assert_eq!(
            waters,
            Selection::by_residue(Selection::and([
                Selection::around(4.0, Selection::residue(475)),
                Selection::residue_names(["WAT"]),
            ]))
        );
    }

    #[test]
    fn rejects_missing_convention_on_atom_range() {
        let result =
            toml::from_str::<Wrapper>(r#"select = { type = "atoms", start = 1, end = 2 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn pattern_matching_supports_trailing_wildcard() {
        assert!(matches_pattern("CA", "CA"));
        assert!(matches_pattern("O3'", " O3' "));
        assert!(!matches_pattern("CA", "CB"));
        assert!(matches_pattern("H*", "HG21"));
        assert!(!matches_pattern("H*", "CA"));
        assert!(matches_pattern("*", "anything"));
    }
}
