use serde::Serialize;

use crate::{
    chemistry::Element,
    modification::{ModificationDefinitionRef, ModificationType},
    sequence::{ModificationMass, ResidueTerminusState},
};

/// A modification placed on a specific residue of one peptide
#[derive(Clone, Debug, Serialize)]
pub struct AminoAcidModInfo {
    residue: Option<char>,
    residue_location: usize,
    terminus_state: ResidueTerminusState,
    #[serde(serialize_with = "serialize_definition_tag")]
    definition: ModificationDefinitionRef,
}

fn serialize_definition_tag<S: serde::Serializer>(
    definition: &ModificationDefinitionRef,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(definition.mass_correction_tag())
}

impl AminoAcidModInfo {
    /// Place a modification on the residue at the 1 based `residue_location`. Isotopic
    /// modifications apply to the whole peptide and are always placed at location 0 without residue.
    pub fn new(
        residue: Option<char>,
        residue_location: usize,
        terminus_state: ResidueTerminusState,
        definition: ModificationDefinitionRef,
    ) -> Self {
        if definition.modification_type() == ModificationType::IsotopicMod {
            Self {
                residue: None,
                residue_location: 0,
                terminus_state: ResidueTerminusState::None,
                definition,
            }
        } else {
            Self {
                residue: residue.map(|r| r.to_ascii_uppercase()),
                residue_location,
                terminus_state,
                definition,
            }
        }
    }

    /// The modified residue, `None` for isotopic modifications
    pub const fn residue(&self) -> Option<char> {
        self.residue
    }

    /// The 1 based location of the residue, 0 for isotopic modifications
    pub const fn residue_location(&self) -> usize {
        self.residue_location
    }

    /// The terminal context of the modified residue
    pub const fn terminus_state(&self) -> ResidueTerminusState {
        self.terminus_state
    }

    /// The definition of the modification
    pub const fn definition(&self) -> &ModificationDefinitionRef {
        &self.definition
    }
}

impl ModificationMass for AminoAcidModInfo {
    fn location(&self) -> usize {
        self.residue_location
    }

    fn mass(&self) -> f64 {
        self.definition.mass()
    }

    fn affected_atom(&self) -> Option<Element> {
        if self.definition.modification_type() == ModificationType::IsotopicMod {
            self.definition.affected_atom()
        } else {
            None
        }
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{modification::ModificationDefinition, sequence::PeptideMassCalculator};

    #[test]
    fn mass_with_applied_mods() {
        let calculator = PeptideMassCalculator::default();
        let oxidation = Arc::new(ModificationDefinition::new(
            '*',
            15.994_915,
            "M",
            ModificationType::DynamicMod,
            "Plus1Oxy",
        ));
        let n15 = Arc::new(
            ModificationDefinition::new('-', 0.997_035, "", ModificationType::IsotopicMod, "15N")
                .with_affected_atom(Element::N),
        );
        let plain = calculator.compute_sequence_mass("PEPMK").unwrap();
        let mods = vec![
            AminoAcidModInfo::new(Some('m'), 4, ResidueTerminusState::None, oxidation),
            AminoAcidModInfo::new(Some('K'), 5, ResidueTerminusState::PeptideCTerminus, n15),
        ];
        assert_eq!(mods[0].residue(), Some('M'));
        assert_eq!(mods[1].residue(), None);
        assert_eq!(mods[1].residue_location(), 0);
        // P E P M K has 1 + 1 + 1 + 1 + 2 nitrogen atoms
        let modified = calculator.compute_sequence_mass_with_mods("PEPMK", &mods).unwrap();
        assert!((modified - plain - 15.994_915 - 6.0 * 0.997_035).abs() < 1e-6);
    }
}
