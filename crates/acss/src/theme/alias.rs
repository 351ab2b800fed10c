//! Short alias derivation for palette theme names.
//!
//! Every theme name gets a unique one- or two-character alias. `p`, `b` and
//! `w` are reserved for the scalar colors `primary`, `black` and `white`.
//!
//! For each remaining name, in order:
//!
//! 1. the first unused letter of the name itself (`red` -> `r`, `gray` -> `g`);
//! 2. the first letter followed by a later letter of the name (`gold` -> `go`);
//! 3. the next unused letter of the alphabet;
//! 4. the next unused pair of letters of the alphabet.
//!
//! A name left without an alias after all of that is skipped.

use phf::phf_map;
use std::collections::{BTreeMap, HashSet};

/// Aliases that are never handed out to palette themes.
pub static RESERVED_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "primary" => "p",
    "black" => "b",
    "white" => "w",
};

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Derives the alias table for a sequence of theme names.
///
/// The result always contains the reserved scalar aliases.
pub fn derive_aliases<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, String> {
    let mut aliases: BTreeMap<String, String> = RESERVED_ALIASES
        .entries()
        .map(|(name, alias)| (name.to_string(), alias.to_string()))
        .collect();
    let mut used: HashSet<String> = aliases.values().cloned().collect();

    for name in names {
        if aliases.contains_key(name) {
            continue;
        }
        match pick_alias(name, &used) {
            Some(alias) => {
                used.insert(alias.clone());
                aliases.insert(name.to_string(), alias);
            }
            None => log::debug!("no short alias left for theme {}", name),
        }
    }
    aliases
}

fn pick_alias(name: &str, used: &HashSet<String>) -> Option<String> {
    let letters: Vec<char> = name.chars().filter(|c| c.is_ascii_lowercase()).collect();
    let free = |candidate: &String| !used.contains(candidate);

    let own_letter = letters.iter().map(|c| c.to_string()).find(free);
    if own_letter.is_some() {
        return own_letter;
    }

    if let Some(first) = letters.first() {
        let own_pair = letters[1..]
            .iter()
            .map(|second| format!("{}{}", first, second))
            .find(free);
        if own_pair.is_some() {
            return own_pair;
        }
    }

    let next_letter = ALPHABET.chars().map(|c| c.to_string()).find(free);
    if next_letter.is_some() {
        return next_letter;
    }

    ALPHABET
        .chars()
        .flat_map(|first| ALPHABET.chars().map(move |second| format!("{}{}", first, second)))
        .find(free)
}
