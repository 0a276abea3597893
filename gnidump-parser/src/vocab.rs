//! Word lists backing classification decisions.

/// Words marking a string as virus-like. Matched case-insensitively against
/// whole words.
pub(crate) const VIRUS_WORDS: &[&str] = &[
    "virus",
    "viruses",
    "viroid",
    "viroids",
    "virales",
    "viridae",
    "virinae",
    "phage",
    "phages",
    "satellite",
    "satellites",
    "prion",
    "prions",
    "ictv",
    "npv",
    "provirus",
    "retrovirus",
    "bacteriophage",
];

/// Genera attributed to the bacterial code.
pub(crate) const BACTERIAL_GENERA: &[&str] = &[
    "Acinetobacter",
    "Actinomyces",
    "Aeromonas",
    "Agrobacterium",
    "Azotobacter",
    "Bacteroides",
    "Bartonella",
    "Bifidobacterium",
    "Bordetella",
    "Borrelia",
    "Brucella",
    "Burkholderia",
    "Campylobacter",
    "Chlamydia",
    "Citrobacter",
    "Clostridium",
    "Corynebacterium",
    "Enterobacter",
    "Enterococcus",
    "Escherichia",
    "Francisella",
    "Haemophilus",
    "Helicobacter",
    "Klebsiella",
    "Lactobacillus",
    "Legionella",
    "Leptospira",
    "Listeria",
    "Micrococcus",
    "Moraxella",
    "Mycobacterium",
    "Mycoplasma",
    "Neisseria",
    "Nocardia",
    "Pasteurella",
    "Prevotella",
    "Pseudomonas",
    "Rhizobium",
    "Rhodococcus",
    "Rickettsia",
    "Salmonella",
    "Serratia",
    "Shigella",
    "Staphylococcus",
    "Streptococcus",
    "Treponema",
    "Vibrio",
    "Xanthomonas",
    "Yersinia",
];

/// Genera that are bacterial homonyms of names in other codes; attribution
/// is only ever "maybe".
pub(crate) const AMBIGUOUS_BACTERIAL_GENERA: &[&str] = &[
    "Bacillus",  // also a stick-insect genus
    "Proteus",   // also an amphibian genus
    "Spirillum", // historic homonyms
    "Gordonia",  // also a plant genus
    "Morganella",// also a fungal genus
    "Edwardsiella", // also a sea-anemone genus
];

/// Infraspecific rank markers, with and without the trailing period.
pub(crate) const RANK_MARKERS: &[&str] = &[
    "var.",
    "var",
    "subsp.",
    "subsp",
    "ssp.",
    "ssp",
    "f.",
    "fo.",
    "forma",
    "subvar.",
    "subvar",
    "subf.",
    "subfo.",
    "nothosubsp.",
    "nothovar.",
    "convar.",
    "cv.",
];

/// Lowercase particles that belong to authorship, not to epithets.
pub(crate) const AUTHOR_PARTICLES: &[&str] = &[
    "af", "bis", "da", "der", "des", "den", "della", "dela", "de", "di", "du", "la", "ter", "van",
    "von", "v.",
];

/// Annotation openers: everything from the first of these to the end of the
/// string is commentary, not name.
pub(crate) const ANNOTATION_MARKERS: &[&str] = &[
    "sensu",
    "s.l.",
    "s.str.",
    "s.lat.",
    "auct.",
    "auctt.",
    "non",
    "nec",
    "nom.",
    "nomen",
    "fide",
    "vide",
    "emend.",
];

pub(crate) fn is_rank_marker(word: &str) -> bool {
    RANK_MARKERS.contains(&word)
}

pub(crate) fn is_author_particle(word: &str) -> bool {
    AUTHOR_PARTICLES.contains(&word)
}

pub(crate) fn is_annotation_marker(word: &str) -> bool {
    let lower = word.to_lowercase();
    ANNOTATION_MARKERS.contains(&lower.as_str())
}

pub(crate) fn is_virus_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    VIRUS_WORDS.contains(&lower.as_str())
}

pub(crate) fn bacterial_genus(genus: &str) -> Option<crate::parsed::Tristate> {
    use crate::parsed::Tristate;
    if BACTERIAL_GENERA.contains(&genus) {
        Some(Tristate::Yes)
    } else if AMBIGUOUS_BACTERIAL_GENERA.contains(&genus) {
        Some(Tristate::Maybe)
    } else {
        None
    }
}
