//! Accept/reject gate separating analyte names from document noise.

/// Tokens that mark a candidate name as document metadata, lab branding,
/// specimen descriptions, or known false-positive fragments.
static NOISE_WORDS: &[&str] = &[
    "laboratorijska",
    "dijagnostika",
    "uzorkovanja",
    "vrijeme",
    "datum",
    "pacijent",
    "doktor",
    "dr",
    "serum",
    "plazma",
    "citrat",
    "punkt",
    "protokola",
    "br.",
    "aligrudić",
    "golubovci",
    "filip",
    "mara",
    "džomić",
    "qo",
    "med",
    "dijag",
    "normalan",
    "negativan",
    "pozitivan",
    "granulociti",
    "epitelne",
    "cel",
    "neskvamozne",
    "bubrežni",
    "epitel",
    "elije",
    "težina",
    "specifina",
];

/// Known analyte vocabulary, matched as substrings of the lowercased name
/// so compound labels like "Glukoza u urinu" are caught as well.
static KNOWN_TERMS: &[&str] = &[
    "hemoglobin",
    "hb",
    "eritrociti",
    "rbc",
    "leukociti",
    "wbc",
    "trombociti",
    "plt",
    "hematokrit",
    "hct",
    "glukoza",
    "glucose",
    "urea",
    "kreatinin",
    "creatinine",
    "alt",
    "gpt",
    "ast",
    "got",
    "ggt",
    "gamma gt",
    "holesterol",
    "cholesterol",
    "hdl",
    "ldl",
    "trigliceridi",
    "triglycerides",
    "natrijum",
    "na",
    "kalijum",
    "k",
    "kalcijum",
    "ca",
    "neutrofili",
    "neutrophils",
    "limfociti",
    "lymphocytes",
    "monociti",
    "monocytes",
    "eozinofili",
    "eosinophils",
    "bazofili",
    "basophils",
    "mcv",
    "mch",
    "mchc",
    "rdw",
    "pdw",
    "mpv",
    "pct",
    "p-lcr",
    "ig",
    "sedimentacija",
    "protrombinsko",
    "inr",
    "aptt",
    "fibrinogen",
    "bilirubin",
    "urobilinogen",
    "glukoza u urinu",
    "eritrociti u urinu",
    "proteini u urinu",
    "ketoni u urinu",
    "nitriti",
    "leukociti u urinu",
    "krv u urinu",
    "ph urina",
];

/// Decide whether a normalized name is a plausible analyte.
///
/// Three tiers: explicit noise rejection, known-term acceptance, and a
/// structural fallback (1-3 words, every word longer than one character,
/// not all words numeric or shorter than three characters) for analytes
/// outside the vocabulary.
pub fn is_valid_analyte(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.chars().count() < 2 {
        return false;
    }

    let lower = trimmed.to_lowercase();

    if NOISE_WORDS.iter().any(|w| lower.contains(w)) {
        return false;
    }

    if KNOWN_TERMS.iter().any(|t| lower.contains(t)) {
        return true;
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    words.len() <= 3
        && words.iter().all(|w| w.chars().count() > 1)
        && !words
            .iter()
            .all(|w| w.chars().all(|c| c.is_ascii_digit()) || w.chars().count() < 3)
}
