use std::io::Write;

use psmcore::modification::ModificationSummary;

/// Write the modification summary table: one line per known modification with the number of
/// times it was applied.
/// # Errors
/// If the underlying writer errors.
pub fn write_mod_summary(
    mut writer: impl Write,
    modifications: &[ModificationSummary],
) -> Result<(), std::io::Error> {
    writeln!(
        writer,
        "Modification_Symbol\tModification_Mass\tTarget_Residues\tModification_Type\tMass_Correction_Tag\tOccurrence_Count"
    )?;
    for modification in modifications {
        writeln!(
            writer,
            "{}\t{:.6}\t{}\t{}\t{}\t{}",
            modification.symbol,
            modification.mass,
            modification.target_residues,
            modification.modification_type,
            modification.mass_correction_tag,
            modification.occurrence_count
        )?;
    }
    writer.flush()
}
