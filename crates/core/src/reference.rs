use crate::SearchError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surah {
    pub number: u16,
    pub name: &'static str,
    pub verses: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerseRef {
    pub surah: u16,
    pub verse: u16,
}

impl VerseRef {
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.verse)
    }
}

pub fn surah(number: u16) -> Option<&'static Surah> {
    SURAHS.get(usize::from(number).checked_sub(1)?)
}

/// Parses `input` as a verse reference.
///
/// Input that does not look like `digits:digits` is `Ok(None)` so callers can
/// fall back to text search. A well-formed reference outside the surah table
/// is an error.
pub fn parse_verse_reference(input: &str) -> Result<Option<VerseRef>, SearchError> {
    let Some((surah_part, verse_part)) = input.trim().split_once(':') else {
        return Ok(None);
    };
    let is_number = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !is_number(surah_part) || !is_number(verse_part) {
        return Ok(None);
    }

    let found = surah_part
        .parse::<u16>()
        .ok()
        .and_then(surah)
        .ok_or_else(|| {
            SearchError::InvalidReference(
                "Invalid Surah number. Please enter a number between 1 and 114.".to_string(),
            )
        })?;

    let verse = verse_part
        .parse::<u16>()
        .ok()
        .filter(|verse| (1..=found.verses).contains(verse))
        .ok_or_else(|| {
            SearchError::InvalidReference(format!(
                "Invalid verse number. Surah {} has {} verses.",
                found.name, found.verses
            ))
        })?;

    Ok(Some(VerseRef {
        surah: found.number,
        verse,
    }))
}

pub const SURAHS: [Surah; 114] = [
    Surah { number: 1, name: "Al-Fatihah", verses: 7 },
    Surah { number: 2, name: "Al-Baqarah", verses: 286 },
    Surah { number: 3, name: "Aali Imran", verses: 200 },
    Surah { number: 4, name: "An-Nisa", verses: 176 },
    Surah { number: 5, name: "Al-Ma'idah", verses: 120 },
    Surah { number: 6, name: "Al-An'am", verses: 165 },
    Surah { number: 7, name: "Al-A'raf", verses: 206 },
    Surah { number: 8, name: "Al-Anfal", verses: 75 },
    Surah { number: 9, name: "At-Tawbah", verses: 129 },
    Surah { number: 10, name: "Yunus", verses: 109 },
    Surah { number: 11, name: "Hud", verses: 123 },
    Surah { number: 12, name: "Yusuf", verses: 111 },
    Surah { number: 13, name: "Ar-Ra'd", verses: 43 },
    Surah { number: 14, name: "Ibrahim", verses: 52 },
    Surah { number: 15, name: "Al-Hijr", verses: 99 },
    Surah { number: 16, name: "An-Nahl", verses: 128 },
    Surah { number: 17, name: "Al-Isra", verses: 111 },
    Surah { number: 18, name: "Al-Kahf", verses: 110 },
    Surah { number: 19, name: "Maryam", verses: 98 },
    Surah { number: 20, name: "Taha", verses: 135 },
    Surah { number: 21, name: "Al-Anbiya", verses: 112 },
    Surah { number: 22, name: "Al-Hajj", verses: 78 },
    Surah { number: 23, name: "Al-Mu'minun", verses: 118 },
    Surah { number: 24, name: "An-Nur", verses: 64 },
    Surah { number: 25, name: "Al-Furqan", verses: 77 },
    Surah { number: 26, name: "Ash-Shu'ara", verses: 227 },
    Surah { number: 27, name: "An-Naml", verses: 93 },
    Surah { number: 28, name: "Al-Qasas", verses: 88 },
    Surah { number: 29, name: "Al-Ankabut", verses: 69 },
    Surah { number: 30, name: "Ar-Rum", verses: 60 },
    Surah { number: 31, name: "Luqman", verses: 34 },
    Surah { number: 32, name: "As-Sajda", verses: 30 },
    Surah { number: 33, name: "Al-Ahzab", verses: 73 },
    Surah { number: 34, name: "Saba", verses: 54 },
    Surah { number: 35, name: "Fatir", verses: 45 },
    Surah { number: 36, name: "Yaseen", verses: 83 },
    Surah { number: 37, name: "As-Saffat", verses: 182 },
    Surah { number: 38, name: "Sad", verses: 88 },
    Surah { number: 39, name: "Az-Zumar", verses: 75 },
    Surah { number: 40, name: "Ghafir", verses: 85 },
    Surah { number: 41, name: "Fussilat", verses: 54 },
    Surah { number: 42, name: "Ash-Shura", verses: 53 },
    Surah { number: 43, name: "Az-Zukhruf", verses: 89 },
    Surah { number: 44, name: "Ad-Dukhan", verses: 59 },
    Surah { number: 45, name: "Al-Jathiyah", verses: 37 },
    Surah { number: 46, name: "Al-Ahqaf", verses: 35 },
    Surah { number: 47, name: "Muhammad", verses: 38 },
    Surah { number: 48, name: "Al-Fath", verses: 29 },
    Surah { number: 49, name: "Al-Hujurat", verses: 18 },
    Surah { number: 50, name: "Qaf", verses: 45 },
    Surah { number: 51, name: "Adh-Dhariyat", verses: 60 },
    Surah { number: 52, name: "At-Tur", verses: 49 },
    Surah { number: 53, name: "An-Najm", verses: 62 },
    Surah { number: 54, name: "Al-Qamar", verses: 55 },
    Surah { number: 55, name: "Ar-Rahman", verses: 78 },
    Surah { number: 56, name: "Al-Waqia", verses: 96 },
    Surah { number: 57, name: "Al-Hadid", verses: 29 },
    Surah { number: 58, name: "Al-Mujadila", verses: 22 },
    Surah { number: 59, name: "Al-Hashr", verses: 24 },
    Surah { number: 60, name: "Al-Mumtahina", verses: 13 },
    Surah { number: 61, name: "As-Saff", verses: 14 },
    Surah { number: 62, name: "Al-Jumuah", verses: 11 },
    Surah { number: 63, name: "Al-Munafiqun", verses: 11 },
    Surah { number: 64, name: "At-Taghabun", verses: 18 },
    Surah { number: 65, name: "At-Talaq", verses: 12 },
    Surah { number: 66, name: "At-Tahrim", verses: 12 },
    Surah { number: 67, name: "Al-Mulk", verses: 30 },
    Surah { number: 68, name: "Al-Qalam", verses: 52 },
    Surah { number: 69, name: "Al-Haqqah", verses: 52 },
    Surah { number: 70, name: "Al-Ma'arij", verses: 44 },
    Surah { number: 71, name: "Nuh", verses: 28 },
    Surah { number: 72, name: "Al-Jinn", verses: 28 },
    Surah { number: 73, name: "Al-Muzzammil", verses: 20 },
    Surah { number: 74, name: "Al-Muddathir", verses: 56 },
    Surah { number: 75, name: "Al-Qiyamah", verses: 40 },
    Surah { number: 76, name: "Al-Insan", verses: 31 },
    Surah { number: 77, name: "Al-Mursalat", verses: 50 },
    Surah { number: 78, name: "An-Naba", verses: 40 },
    Surah { number: 79, name: "An-Naziat", verses: 46 },
    Surah { number: 80, name: "Abasa", verses: 42 },
    Surah { number: 81, name: "At-Takwir", verses: 29 },
    Surah { number: 82, name: "Al-Infitar", verses: 19 },
    Surah { number: 83, name: "Al-Mutaffifin", verses: 36 },
    Surah { number: 84, name: "Al-Inshiqaq", verses: 25 },
    Surah { number: 85, name: "Al-Buruj", verses: 22 },
    Surah { number: 86, name: "At-Tariq", verses: 17 },
    Surah { number: 87, name: "Al-Ala", verses: 19 },
    Surah { number: 88, name: "Al-Ghashiyah", verses: 26 },
    Surah { number: 89, name: "Al-Fajr", verses: 30 },
    Surah { number: 90, name: "Al-Balad", verses: 20 },
    Surah { number: 91, name: "Ash-Shams", verses: 15 },
    Surah { number: 92, name: "Al-Layl", verses: 21 },
    Surah { number: 93, name: "Ad-Duha", verses: 11 },
    Surah { number: 94, name: "Ash-Sharh", verses: 8 },
    Surah { number: 95, name: "At-Tin", verses: 8 },
    Surah { number: 96, name: "Al-Alaq", verses: 19 },
    Surah { number: 97, name: "Al-Qadr", verses: 5 },
    Surah { number: 98, name: "Al-Bayyinah", verses: 8 },
    Surah { number: 99, name: "Az-Zalzalah", verses: 8 },
    Surah { number: 100, name: "Al-Adiyat", verses: 11 },
    Surah { number: 101, name: "Al-Qariah", verses: 11 },
    Surah { number: 102, name: "At-Takathur", verses: 8 },
    Surah { number: 103, name: "Al-Asr", verses: 3 },
    Surah { number: 104, name: "Al-Humazah", verses: 9 },
    Surah { number: 105, name: "Al-Fil", verses: 5 },
    Surah { number: 106, name: "Quraysh", verses: 4 },
    Surah { number: 107, name: "Al-Ma'un", verses: 7 },
    Surah { number: 108, name: "Al-Kawthar", verses: 3 },
    Surah { number: 109, name: "Al-Kafirun", verses: 6 },
    Surah { number: 110, name: "An-Nasr", verses: 3 },
    Surah { number: 111, name: "Al-Masad", verses: 5 },
    Surah { number: 112, name: "Al-Ikhlas", verses: 4 },
    Surah { number: 113, name: "Al-Falaq", verses: 5 },
    Surah { number: 114, name: "An-Nas", verses: 6 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_complete() {
        assert_eq!(SURAHS.len(), 114);
        let total: u32 = SURAHS.iter().map(|surah| u32::from(surah.verses)).sum();
        assert_eq!(total, 6236);
        assert!(SURAHS
            .iter()
            .enumerate()
            .all(|(index, surah)| usize::from(surah.number) == index + 1));
    }

    #[test]
    fn parses_valid_reference() {
        let parsed = parse_verse_reference(" 2:255 ").expect("valid reference");
        assert_eq!(parsed, Some(VerseRef { surah: 2, verse: 255 }));
        assert_eq!(parsed.map(|reference| reference.key()), Some("2:255".to_string()));
    }

    #[test]
    fn text_queries_are_not_references() {
        assert!(matches!(parse_verse_reference("mercy"), Ok(None)));
        assert!(matches!(parse_verse_reference("2:"), Ok(None)));
        assert!(matches!(parse_verse_reference("a:1"), Ok(None)));
    }

    #[test]
    fn out_of_range_references_are_rejected() {
        let error = parse_verse_reference("115:1").expect_err("no surah 115");
        assert!(error.to_string().contains("between 1 and 114"));

        let error = parse_verse_reference("1:8").expect_err("al-fatihah has 7 verses");
        assert_eq!(
            error.to_string(),
            "Invalid verse number. Surah Al-Fatihah has 7 verses."
        );

        assert!(parse_verse_reference("0:1").is_err());
        assert!(parse_verse_reference("99999:1").is_err());
    }
}
