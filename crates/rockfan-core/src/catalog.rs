//! Built-in band catalogue
//!
//! The bands offered during onboarding, sorted alphabetically once on first
//! access.

use once_cell::sync::Lazy;

const BANDS: &[&str] = &[
    "AC/DC", "Metallica", "Iron Maiden", "Nirvana",
    "Arde Bogotá", "Extremoduro", "Héroes del Silencio",
    "The Beatles", "Queen", "Foo Fighters", "Arctic Monkeys",
    "Viva Suecia", "Led Zeppelin", "Pink Floyd", "Rolling Stones",
    "Guns N' Roses", "Estopa", "Mago de Oz", "Muse", "Red Hot Chili Peppers",
    "Radiohead", "Megadeth", "Robe", "The Warning", "The Offspring",
    "Dio", "Black Sabbath", "Ozzy Osbourne", "Barón Rojo", "Angeles del Infierno",
    "Fito y Fitipaldis", "Marea", "Mötorhead", "Manowar", "Green Day",
    "Queens of the Stone Age", "Mötley Crüe", "Rammstein", "Måneskin",
    "Linkin Park", "System of a Down", "Limp Bizkit", "Avatar", "Greta Van Fleet",
    "Drowning Pool", "Barns Courtney", "Fleetwood Mac", "Scorpions", "Eric Clapton",
    "Van Halen", "El Canto del Loco", "Imagine Dragons", "Amyl and the Sniffers",
    "Volbeat", "Pantera", "Hombres G", "Five Finger Death Punch", "Judas Priest",
    "Anthrax", "Barricada", "Rage Against the Machine", "Slipknot", "Muro", "Electric Callboy",
    "Twisted Sister", "Alice Cooper", "Depeche Mode", "Avenged Sevenfold", "Blur",
    "REM", "My Chemical Romance", "ZZ Top", "The Cure", "Talco", "The Cranberries",
    "Dover", "Dorothy", "Sisters of Mercy", "Amaral", "Korn", "Aerosmith", "Bon Jovi",
    "Deep Purple", "The Who", "The Doors", "Creedence Clearwater Revival", "Jimi Hendrix",
    "The Police", "U2", "Ghost", "Bring Me The Horizon", "Disturbed", "Papa Roach", "Sabaton",
    "Gojira", "Pearl Jam", "Alice in Chains", "Gorillaz", "Platero y Tú", "Ska-P", "La Raíz",
    "La M.O.D.A",
];

static SORTED: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut bands = BANDS.to_vec();
    bands.sort_unstable();
    bands.dedup();
    bands
});

/// All catalogue bands in alphabetical order
#[must_use]
pub fn all_bands() -> &'static [&'static str] {
    &SORTED
}

/// Whether `name` is a catalogue band (exact match)
#[must_use]
pub fn contains(name: &str) -> bool {
    SORTED.binary_search_by(|band| (*band).cmp(name)).is_ok()
}

/// Catalogue spelling of `name`, matched case-insensitively
#[must_use]
pub fn find(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase();
    SORTED
        .iter()
        .copied()
        .find(|band| band.to_lowercase() == wanted)
}
