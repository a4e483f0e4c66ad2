use crate::chemistry::ElementalComposition;

/// The mass definition of a single residue
#[derive(Clone, Debug, PartialEq)]
pub struct ResidueDefinition {
    /// The elemental composition, used to count atoms for isotopic modifications
    pub composition: ElementalComposition,
    /// The monoisotopic mass
    pub mass: f64,
}

impl ResidueDefinition {
    /// A residue with the mass derived from its composition
    pub fn from_composition(composition: ElementalComposition) -> Self {
        Self {
            mass: composition.monoisotopic_mass(),
            composition,
        }
    }

    /// A residue with only a mass, it does not contain any atoms
    pub fn from_mass(mass: f64) -> Self {
        Self {
            composition: ElementalComposition::default(),
            mass,
        }
    }
}

/// The residue compositions for the standard amino acid one letter codes
pub(crate) fn standard_residues() -> Vec<(char, ResidueDefinition)> {
    let asparagine = composition!(C 4 H 6 N 2 O 2);
    let aspartic_acid = composition!(C 4 H 5 N 1 O 3);
    let glutamine = composition!(C 5 H 8 N 2 O 2);
    let glutamic_acid = composition!(C 5 H 7 N 1 O 3);
    let leucine = composition!(C 6 H 11 N 1 O 1);

    // B and Z are ambiguous, their mass is the average of both options
    let b = ResidueDefinition {
        mass: f64::midpoint(
            asparagine.monoisotopic_mass(),
            aspartic_acid.monoisotopic_mass(),
        ),
        composition: asparagine.clone(),
    };
    let z = ResidueDefinition {
        mass: f64::midpoint(
            glutamine.monoisotopic_mass(),
            glutamic_acid.monoisotopic_mass(),
        ),
        composition: glutamine.clone(),
    };

    vec![
        ('A', ResidueDefinition::from_composition(composition!(C 3 H 5 N 1 O 1))),
        ('B', b),
        ('C', ResidueDefinition::from_composition(composition!(C 3 H 5 N 1 O 1 S 1))),
        ('D', ResidueDefinition::from_composition(aspartic_acid)),
        ('E', ResidueDefinition::from_composition(glutamic_acid)),
        ('F', ResidueDefinition::from_composition(composition!(C 9 H 9 N 1 O 1))),
        ('G', ResidueDefinition::from_composition(composition!(C 2 H 3 N 1 O 1))),
        ('H', ResidueDefinition::from_composition(composition!(C 6 H 7 N 3 O 1))),
        ('I', ResidueDefinition::from_composition(leucine.clone())),
        ('J', ResidueDefinition::from_composition(leucine.clone())),
        ('K', ResidueDefinition::from_composition(composition!(C 6 H 12 N 2 O 1))),
        ('L', ResidueDefinition::from_composition(leucine.clone())),
        ('M', ResidueDefinition::from_composition(composition!(C 5 H 9 N 1 O 1 S 1))),
        ('N', ResidueDefinition::from_composition(asparagine)),
        ('O', ResidueDefinition::from_composition(composition!(C 12 H 19 N 3 O 2))),
        ('P', ResidueDefinition::from_composition(composition!(C 5 H 7 N 1 O 1))),
        ('Q', ResidueDefinition::from_composition(glutamine)),
        ('R', ResidueDefinition::from_composition(composition!(C 6 H 12 N 4 O 1))),
        ('S', ResidueDefinition::from_composition(composition!(C 3 H 5 N 1 O 2))),
        ('T', ResidueDefinition::from_composition(composition!(C 4 H 7 N 1 O 2))),
        ('U', ResidueDefinition::from_composition(composition!(C 3 H 5 N 1 O 1 Se 1))),
        ('V', ResidueDefinition::from_composition(composition!(C 5 H 9 N 1 O 1))),
        ('W', ResidueDefinition::from_composition(composition!(C 11 H 10 N 2 O 1))),
        // X is treated as leucine/isoleucine
        ('X', ResidueDefinition::from_composition(leucine)),
        ('Y', ResidueDefinition::from_composition(composition!(C 9 H 9 N 1 O 2))),
        ('Z', z),
    ]
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn residue_masses() {
        let residues = standard_residues();
        assert_eq!(residues.len(), 26);
        let mass = |c: char| {
            residues
                .iter()
                .find(|(r, _)| *r == c)
                .map(|(_, d)| d.mass)
                .unwrap()
        };
        assert!((mass('G') - 57.021_464).abs() < 1e-5);
        assert!((mass('C') - 103.009_185).abs() < 1e-5);
        assert!((mass('W') - 186.079_313).abs() < 1e-5);
        assert!((mass('B') - 114.534_935).abs() < 1e-5);
        assert!((mass('Z') - 128.550_585).abs() < 1e-5);
        assert!((mass('X') - mass('L')).abs() < f64::EPSILON);
    }
}
