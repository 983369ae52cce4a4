//! Deterministic cross-bookmaker match identifier.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Separator that cannot appear inside a normalized team name (normalization
/// strips everything but lowercase letters, digits and single spaces).
const TEAM_SEPARATOR: &str = "|";

/// Prefix length of the hex digest returned by `canonical_match_id`.
const ID_PREFIX_LEN: usize = 20;

/// Team names normalized identically by two bookmakers must compare equal
/// here, which is what makes `canonical_match_id` agree cross-bookmaker.
pub fn normalize_team_name(name: &str) -> String {
    let folded: String = name.chars().map(fold_diacritic).collect();
    let lowered = folded.to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold common Latin-1/Latin Extended-A diacritics to their plain ASCII base
/// letter. Bookmaker feeds are mostly Cyrillic-adjacent Latin transliterations
/// of Western team names, so a small table covers the cases that matter for
/// cross-feed agreement without pulling in a full Unicode-decomposition pass.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' => 'A',
        'è' | 'é' | 'ê' | 'ë' | 'ē' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' => 'E',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' => 'I',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ō' => 'O',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ß' => 's',
        other => other,
    }
}

/// `canonicalMatchID(home, away, startTime)`.
///
/// Order-independent for the same fixture: symmetric and deterministic so
/// the same fixture hashes identically regardless of which bookmaker
/// reported it first or which side it lists as home.
pub fn canonical_match_id(home: &str, away: &str, start_time: DateTime<Utc>) -> String {
    let norm_home = normalize_team_name(home);
    let norm_away = normalize_team_name(away);

    let mut pair = [norm_home, norm_away];
    pair.sort();
    let [a, b] = pair;

    let minute_truncated = start_time.format("%Y-%m-%dT%H:%M").to_string();

    let payload = format!("{a}{TEAM_SEPARATOR}{b}{TEAM_SEPARATOR}{minute_truncated}");

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    let digest = hasher.finalize();
    let hex = hex_encode(&digest);
    hex[..ID_PREFIX_LEN].to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// `match.name = homeTeam + " vs " + awayTeam"`.
pub fn match_display_name(home: &str, away: &str) -> String {
    format!("{home} vs {away}")
}
