//! The built-in table of mass correction tags, the canonical short names of common modifications

use serde::{Deserialize, Serialize};

use crate::quantities::{masses_equal, round_to_digits};

/// A named modification mass
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MassCorrectionTag {
    /// The canonical short name (at most 8 characters)
    pub name: String,
    /// The monoisotopic mass
    pub mass: f64,
    /// Other names used by search engines (Unimod names and accessions)
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl MassCorrectionTag {
    /// Create a new tag
    pub fn new(name: impl Into<String>, mass: f64) -> Self {
        Self {
            name: name.into(),
            mass,
            aliases: Vec::new(),
        }
    }

    /// If this tag is known under the given name, case insensitive
    pub fn has_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// (tag, mass, aliases)
const BUILT_IN: &[(&str, f64, &[&str])] = &[
    ("Acetyl", 42.010_565, &["Acetylation", "ac", "UniMod:1"]),
    ("Amide", -0.984_016, &["Amidated", "UniMod:2"]),
    ("Biotinyl", 226.077_598, &["Biotin", "UniMod:3"]),
    ("IodoAcet", 57.021_464, &["Carbamidomethyl", "Carbamidomethylation", "UniMod:4"]),
    ("Carbamyl", 43.005_814, &["Carbamylation", "UniMod:5"]),
    ("Deamide", 0.984_016, &["Deamidated", "Deamidation", "de", "UniMod:7"]),
    ("Plus1Oxy", 15.994_915, &["Oxidation", "ox", "UniMod:35"]),
    ("Plus2Oxy", 31.989_829, &["Dioxidation", "UniMod:425"]),
    ("Plus3Oxy", 47.984_744, &["Trioxidation", "UniMod:345"]),
    ("Phosph", 79.966_331, &["Phospho", "Phosphorylation", "ph", "UniMod:21"]),
    ("Methyl", 14.015_65, &["Methylation", "UniMod:34"]),
    ("Dimethyl", 28.031_3, &["Dimethylation", "UniMod:36"]),
    ("Trimeth", 42.046_95, &["Trimethyl", "Trimethylation", "UniMod:37"]),
    ("Formyl", 27.994_915, &["Formylation", "UniMod:122"]),
    ("GlyGly", 114.042_927, &["GG", "UniMod:121"]),
    ("NH3_Loss", -17.026_549, &["Gln->pyro-Glu", "Ammonia-loss", "UniMod:28", "UniMod:385"]),
    ("H2O_Loss", -18.010_565, &["Glu->pyro-Glu", "Dehydrated", "UniMod:27", "UniMod:23"]),
    ("Pyro-cmC", 39.994_915, &["Pyro-carbamidomethyl", "UniMod:26"]),
    ("Nitro", 44.985_078, &["Nitration", "UniMod:354"]),
    ("Cysteinl", 119.004_099, &["Cysteinyl", "UniMod:312"]),
    ("NEM", 125.047_679, &["Nethylmaleimide", "UniMod:108"]),
    ("Guanid", 42.021_798, &["Guanidinyl", "UniMod:52"]),
    ("Hexose", 162.052_824, &["Hex", "UniMod:41"]),
    ("HexNAc", 203.079_373, &["UniMod:43"]),
    ("Sodium", 21.981_943, &["Cation:Na", "UniMod:30"]),
    ("Crotonyl", 68.026_215, &["UniMod:1363"]),
    ("Succinyl", 100.016_044, &["Succinylation", "UniMod:64"]),
    ("Malonyl", 86.000_394, &["UniMod:747"]),
    ("Propnyl", 56.026_215, &["Propionyl", "UniMod:58"]),
    ("Butyryl", 70.041_865, &["UniMod:1289"]),
    ("Palmitoy", 238.229_666, &["Palmitoyl", "UniMod:47"]),
    ("Myristoy", 210.198_366, &["Myristoyl", "UniMod:45"]),
    ("Farnesyl", 204.187_801, &["UniMod:44"]),
    ("iTRAQ", 144.102_063, &["iTRAQ4plex", "UniMod:214"]),
    ("itrac8", 304.205_36, &["iTRAQ8plex", "UniMod:730"]),
    ("TMT0Tag", 224.152_478, &["TMT", "UniMod:739"]),
    ("TMT6Tag", 229.162_932, &["TMT6plex", "TMT10plex", "TMT11plex", "UniMod:737"]),
    ("TMT16Tag", 304.207_146, &["TMTpro", "TMT16plex", "UniMod:2016"]),
    ("13C6", 6.020_129, &["Label:13C(6)", "UniMod:188"]),
    ("13C6N2", 8.014_199, &["Label:13C(6)15N(2)", "UniMod:259"]),
    ("13C6N4", 10.008_269, &["Label:13C(6)15N(4)", "UniMod:267"]),
    ("15N", 0.997_035, &["Label:15N(1)"]),
    ("Dimeth4", 32.056_407, &["Dimethyl:2H(4)", "UniMod:199"]),
    ("Dimeth6", 34.063_117, &["Dimethyl:2H(6)13C(2)", "UniMod:510"]),
    ("Sulfo", 79.956_815, &["Sulfation", "UniMod:40"]),
    ("Carboxy", 43.989_829, &["Carboxylation", "UniMod:299"]),
];

/// The built-in mass correction tags
pub fn default_mass_correction_tags() -> Vec<MassCorrectionTag> {
    BUILT_IN
        .iter()
        .map(|(name, mass, aliases)| MassCorrectionTag {
            name: (*name).to_string(),
            mass: *mass,
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
        })
        .collect()
}

/// Find the closest tag with a mass equal at the given precision, first trying `digits` then `loose_digits`
pub fn find_mass_correction_tag(
    tags: &[MassCorrectionTag],
    mass: f64,
    digits: u8,
    loose_digits: u8,
) -> Option<&MassCorrectionTag> {
    [digits, loose_digits].into_iter().find_map(|precision| {
        tags.iter()
            .filter(|tag| masses_equal(tag.mass, mass, precision))
            .min_by(|a, b| (a.mass - mass).abs().total_cmp(&(b.mass - mass).abs()))
    })
}

/// Find the tag with the given name or alias. Names with a trailing specificity as written by
/// MaxQuant (`Oxidation (M)`, `Acetyl (Protein N-term)`) are matched without that specificity.
pub fn find_mass_correction_tag_by_name<'a>(
    tags: &'a [MassCorrectionTag],
    name: &str,
) -> Option<&'a MassCorrectionTag> {
    let name = name.trim();
    tags.iter().find(|tag| tag.has_name(name)).or_else(|| {
        let stripped = strip_specificity(name)?;
        tags.iter().find(|tag| tag.has_name(stripped))
    })
}

/// Remove a trailing specificity in parentheses: `Oxidation (M)` becomes `Oxidation`
pub(crate) fn strip_specificity(name: &str) -> Option<&str> {
    let name = name.trim();
    name.rfind(" (")
        .filter(|_| name.ends_with(')'))
        .map(|index| name[..index].trim_end())
}

/// The tag used for a mass without a named tag: the signed mass, at most 8 characters
/// ```rust
/// use psmcore::modification::mass_tag_from_mass;
/// assert_eq!(mass_tag_from_mass(79.96633, 3), "+79.966");
/// assert_eq!(mass_tag_from_mass(-1234.5678, 3), "-1234.56");
/// ```
pub fn mass_tag_from_mass(mass: f64, digits: u8) -> String {
    let mut tag = format!(
        "{:+.*}",
        usize::from(digits),
        round_to_digits(mass, digits)
    );
    if tag.len() > 8 {
        tag.truncate(8);
    }
    if tag.ends_with('.') {
        tag.pop();
    }
    tag
}
