//! Elements and their monoisotopic masses

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The elements that can occur in chemical formulas of modifications and residues.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[expect(missing_docs)]
pub enum Element {
    H,
    He,
    Li,
    B,
    C,
    N,
    O,
    F,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    K,
    Ca,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    As,
    Se,
    Br,
    Mo,
    Ag,
    Cd,
    I,
    Pt,
    Au,
    Hg,
}

/// All elements in the order they should be tried while parsing, two letter symbols first
pub const ELEMENT_PARSE_LIST: &[(&str, Element)] = &[
    ("He", Element::He),
    ("Li", Element::Li),
    ("Na", Element::Na),
    ("Mg", Element::Mg),
    ("Al", Element::Al),
    ("Si", Element::Si),
    ("Cl", Element::Cl),
    ("Ca", Element::Ca),
    ("Mn", Element::Mn),
    ("Fe", Element::Fe),
    ("Co", Element::Co),
    ("Ni", Element::Ni),
    ("Cu", Element::Cu),
    ("Zn", Element::Zn),
    ("As", Element::As),
    ("Se", Element::Se),
    ("Br", Element::Br),
    ("Mo", Element::Mo),
    ("Ag", Element::Ag),
    ("Cd", Element::Cd),
    ("Pt", Element::Pt),
    ("Au", Element::Au),
    ("Hg", Element::Hg),
    ("H", Element::H),
    ("B", Element::B),
    ("C", Element::C),
    ("N", Element::N),
    ("O", Element::O),
    ("F", Element::F),
    ("P", Element::P),
    ("S", Element::S),
    ("K", Element::K),
    ("I", Element::I),
];

impl Element {
    /// The symbol of this element, as used in chemical formulas
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::H => "H",
            Self::He => "He",
            Self::Li => "Li",
            Self::B => "B",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::F => "F",
            Self::Na => "Na",
            Self::Mg => "Mg",
            Self::Al => "Al",
            Self::Si => "Si",
            Self::P => "P",
            Self::S => "S",
            Self::Cl => "Cl",
            Self::K => "K",
            Self::Ca => "Ca",
            Self::Mn => "Mn",
            Self::Fe => "Fe",
            Self::Co => "Co",
            Self::Ni => "Ni",
            Self::Cu => "Cu",
            Self::Zn => "Zn",
            Self::As => "As",
            Self::Se => "Se",
            Self::Br => "Br",
            Self::Mo => "Mo",
            Self::Ag => "Ag",
            Self::Cd => "Cd",
            Self::I => "I",
            Self::Pt => "Pt",
            Self::Au => "Au",
            Self::Hg => "Hg",
        }
    }

    /// Find the element with this exact (case sensitive) symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        ELEMENT_PARSE_LIST
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, e)| *e)
    }

    /// The monoisotopic mass of this element, the mass of its most abundant isotope
    pub const fn monoisotopic_mass(self) -> f64 {
        match self {
            Self::H => 1.007_825_032_07,
            Self::He => 4.002_603_25,
            Self::Li => 7.016_004,
            Self::B => 11.009_305_5,
            Self::C => 12.0,
            Self::N => 14.003_074_004_8,
            Self::O => 15.994_914_619_56,
            Self::F => 18.998_403_22,
            Self::Na => 22.989_769_280_9,
            Self::Mg => 23.985_041_7,
            Self::Al => 26.981_538_63,
            Self::Si => 27.976_926_532_5,
            Self::P => 30.973_761_63,
            Self::S => 31.972_071,
            Self::Cl => 34.968_852_68,
            Self::K => 38.963_706_68,
            Self::Ca => 39.962_590_98,
            Self::Mn => 54.938_045_1,
            Self::Fe => 55.934_937_5,
            Self::Co => 58.933_195,
            Self::Ni => 57.935_342_9,
            Self::Cu => 62.929_597_5,
            Self::Zn => 63.929_142_2,
            Self::As => 74.921_596_5,
            Self::Se => 79.916_521_3,
            Self::Br => 78.918_337_1,
            Self::Mo => 97.905_408_2,
            Self::Ag => 106.905_097,
            Self::Cd => 113.903_358_5,
            Self::I => 126.904_473,
            Self::Pt => 194.964_791_1,
            Self::Au => 196.966_568_7,
            Self::Hg => 201.970_643,
        }
    }

    /// The mass of a specific isotope of this element, given its nominal mass (the number of
    /// nucleons). Only the isotopes commonly used in labelling experiments are known.
    pub const fn isotope_mass(self, nominal: u16) -> Option<f64> {
        match (self, nominal) {
            (Self::H, 1) => Some(1.007_825_032_07),
            (Self::H, 2) => Some(DEUTERIUM_MASS),
            (Self::H, 3) => Some(3.016_049_277_7),
            (Self::C, 12) => Some(12.0),
            (Self::C, 13) => Some(13.003_354_837_8),
            (Self::C, 14) => Some(14.003_241_989),
            (Self::N, 14) => Some(14.003_074_004_8),
            (Self::N, 15) => Some(15.000_108_898_2),
            (Self::O, 16) => Some(15.994_914_619_56),
            (Self::O, 17) => Some(16.999_131_7),
            (Self::O, 18) => Some(17.999_161),
            (Self::S, 32) => Some(31.972_071),
            (Self::S, 33) => Some(32.971_458_76),
            (Self::S, 34) => Some(33.967_866_9),
            (Self::S, 36) => Some(35.967_080_76),
            (Self::Se, 80) => Some(79.916_521_3),
            _ => None,
        }
    }

    /// The heavy isotope used by the MaxQuant `x` shorthand (`Cx`, `Nx`, `Ox`, `Hx`)
    pub const fn heavy_shorthand_mass(self) -> Option<f64> {
        match self {
            Self::C => Some(13.003_355),
            Self::N => Some(15.000_109),
            Self::O => Some(17.999_161),
            Self::H => Some(DEUTERIUM_MASS),
            _ => None,
        }
    }
}

/// The mass of deuterium, `D` in chemical formulas
pub const DEUTERIUM_MASS: f64 = 2.014_101_777_8;

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
