use crate::lang::Language;

/// Model identifier reported for the transliteration path.
pub const SCHEME_NAME: &str = "transliteration(ITRANS)";

const VIRAMA: char = '\u{094d}';

/// Romanized Hindi/Marathi tokens that signal transliteration should apply
/// even when the caller did not request it.
const ROMANIZED_HINTS: &[&str] = &[
    "namaste",
    "namastey",
    "namaskar",
    "shukriya",
    "dhanyavad",
    "pranam",
    "kripya",
    "maaf",
    "sach",
    "dost",
    "pyaar",
    "pyar",
    "dil",
    "sab",
    "bhai",
    "behen",
    "pita",
    "maa",
    "matra",
    "aap",
    "hum",
];

/// True when any whitespace-delimited token, stripped of punctuation and
/// case-folded, is in the romanized hint vocabulary.
pub fn looks_romanized(text: &str) -> bool {
    text.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| ".,!?;:\"'()[]{}-".contains(c))
                .to_lowercase()
        })
        .any(|t| ROMANIZED_HINTS.contains(&t.as_str()))
}

/// Normalize romanized input before scheme conversion.
///
/// Lowercasing avoids capital letters being read as retroflex consonants;
/// "namastey" is a frequent variant fixed as a whole word.
fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    lowered
        .split_whitespace()
        .map(|w| if w == "namastey" { "namaste" } else { w })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Transliterate romanized input to the target language's script.
///
/// Hindi and Marathi both map to Devanagari; English input is returned
/// normalized but unconverted.
pub fn to_script(text: &str, target: Language) -> String {
    let norm = normalize(text);
    if target.uses_devanagari() {
        to_devanagari(&norm)
    } else {
        norm
    }
}

fn consonant(s: &str) -> Option<char> {
    match s {
        "k" => Some('क'),
        "kh" => Some('ख'),
        "g" => Some('ग'),
        "gh" => Some('घ'),
        "ch" => Some('च'),
        "chh" => Some('छ'),
        "j" => Some('ज'),
        "jh" => Some('झ'),
        "t" => Some('त'),
        "th" => Some('थ'),
        "d" => Some('द'),
        "dh" => Some('ध'),
        "n" => Some('न'),
        "p" => Some('प'),
        "ph" => Some('फ'),
        "b" => Some('ब'),
        "bh" => Some('भ'),
        "m" => Some('म'),
        "y" => Some('य'),
        "r" => Some('र'),
        "l" => Some('ल'),
        "v" | "w" => Some('व'),
        "sh" => Some('श'),
        "s" => Some('स'),
        "h" => Some('ह'),
        _ => None,
    }
}

/// (independent form, dependent matra); 'a' is the inherent vowel and has
/// no matra.
fn vowel(s: &str) -> Option<(char, Option<char>)> {
    match s {
        "a" => Some(('अ', None)),
        "aa" => Some(('आ', Some('ा'))),
        "i" => Some(('इ', Some('ि'))),
        "ii" => Some(('ई', Some('ी'))),
        "u" => Some(('उ', Some('ु'))),
        "uu" => Some(('ऊ', Some('ू'))),
        "e" => Some(('ए', Some('े'))),
        "ai" => Some(('ऐ', Some('ै'))),
        "o" => Some(('ओ', Some('ो'))),
        "au" => Some(('औ', Some('ौ'))),
        _ => None,
    }
}

/// Greedy longest-match ITRANS-subset conversion. Consonants carry a virama
/// until a vowel resolves them, so clusters come out conjunct.
fn to_devanagari(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut pending_consonant = false;
    let mut i = 0;

    while i < chars.len() {
        let mut matched = false;

        for len in (1..=3.min(chars.len() - i)).rev() {
            let seg: String = chars[i..i + len].iter().collect();

            if let Some(c) = consonant(&seg) {
                out.push(c);
                out.push(VIRAMA);
                pending_consonant = true;
                i += len;
                matched = true;
                break;
            }

            if let Some((independent, matra)) = vowel(&seg) {
                if pending_consonant {
                    out.pop();
                    if let Some(m) = matra {
                        out.push(m);
                    }
                } else {
                    out.push(independent);
                }
                pending_consonant = false;
                i += len;
                matched = true;
                break;
            }
        }

        if !matched {
            out.push(chars[i]);
            pending_consonant = false;
            i += 1;
        }
    }

    out
}
