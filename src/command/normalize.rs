//! Normalization helpers shared by the rule families
//!
//! Everything here is a pure function of its input: unit aliases, spelled
//! numbers, category and assembly keywords, and regex-based dimension
//! extraction.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Unit aliases, keyed by lowercase spelling with dots removed
const UNIT_ALIASES: &[(&str, &[&str])] = &[
    (
        "SF",
        &[
            "sf", "sq ft", "sqft", "sq feet", "sq foot", "square feet", "square foot", "ft2",
        ],
    ),
    (
        "LF",
        &[
            "lf", "lin ft", "linear feet", "linear foot", "linear ft", "ft", "feet", "foot",
        ],
    ),
    ("EA", &["ea", "each", "pc", "pcs", "piece", "pieces", "unit", "units"]),
    ("SHT", &["sht", "sh", "sheet", "sheets"]),
    ("BF", &["bf", "bd ft", "board feet", "board foot"]),
    ("CY", &["cy", "cu yd", "cubic yard", "cubic yards", "yd3"]),
    ("SY", &["sy", "sq yd", "square yard", "square yards", "yd2"]),
    ("SQ", &["sq", "square", "squares"]),
    ("GAL", &["gal", "gals", "gallon", "gallons"]),
    ("HR", &["hr", "hrs", "hour", "hours"]),
];

const ONES: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

/// Checked in order; the first keyword hit decides
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Drywall", &["drywall", "sheetrock", "gypsum", "joint compound", "mud", "tape"]),
    ("Framing", &["framing", "frame", "stud", "lumber", "2x4", "2x6", "joist", "header"]),
    ("Insulation", &["insulation", "insulate", "batt", "spray foam", "r-13", "r-19"]),
    ("Paint", &["paint", "primer", "stain"]),
    ("Electrical", &["electrical", "outlet", "switch", "wire", "wiring", "breaker", "receptacle", "light"]),
    ("Plumbing", &["plumbing", "pipe", "faucet", "toilet", "sink", "drain", "pex"]),
    ("HVAC", &["hvac", "ductwork", "furnace", "air handler", "register"]),
    ("Flooring", &["floor", "carpet", "tile", "lvp", "vinyl", "laminate", "hardwood"]),
    ("Doors", &["door"]),
    ("Windows", &["window"]),
    ("Trim", &["trim", "baseboard", "casing", "crown", "molding", "moulding"]),
];

pub const DEFAULT_CATEGORY: &str = "General";

/// Assembly vocabulary with the keywords that select each name
const ASSEMBLIES: &[(&str, &[&str])] = &[
    ("framing", &["framing", "frame", "stud"]),
    ("drywall", &["drywall", "sheetrock", "gypsum"]),
    ("electrical", &["electrical", "electric", "wiring"]),
    ("plumbing", &["plumbing"]),
    ("insulation", &["insulation", "insulate"]),
    ("paint", &["paint"]),
    ("trim", &["trim", "baseboard", "casing"]),
    ("flooring", &["flooring", "floor", "carpet", "lvp"]),
    ("hvac", &["hvac", "ductwork", "heating"]),
    ("doors", &["door"]),
    ("windows", &["window"]),
    ("deck", &["deck"]),
    ("roofing", &["roof", "shingle"]),
    ("siding", &["siding"]),
];

const PROJECT_TYPES: &[(&str, &str)] = &[
    ("basement", "basement_finish"),
    ("deck", "deck"),
    ("roof", "roofing"),
    ("siding", "siding"),
    ("kitchen", "kitchen_remodel"),
    ("bath", "bathroom_remodel"),
];

pub const DEFAULT_PROJECT_TYPE: &str = "basement_finish";

static ASSEMBLY_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:,|&|\+|\band\b|\bwith\b)\s*").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const NUM: &str = r"(\d[\d,]*(?:\.\d+)?)";
const LF: &str = r"(?:lf|lin\.?\s*ft|linear\s*(?:feet|foot|ft))";
const SF: &str = r"(?:sf|sq\.?\s*ft|sq\.?\s*feet|square\s*(?:feet|foot))";
const FT: &str = r"(?:ft|feet|foot|')";

/// Variable name, mirrored key, and the patterns tried in order
static VARIABLE_PATTERNS: LazyLock<Vec<(&'static str, Option<&'static str>, Vec<Regex>)>> =
    LazyLock::new(|| {
        let re = |src: String| Regex::new(&format!("(?i){}", src)).unwrap();
        vec![
            (
                "wall_lf",
                None,
                vec![
                    re(format!(r"{NUM}\s*{LF}\s*(?:of\s+)?(?:[a-z]+\s+)?walls?\b")),
                    re(format!(r"\bwalls?\s*(?:[:=]|of|at)?\s*{NUM}\s*{LF}")),
                ],
            ),
            (
                "wall_sf",
                None,
                vec![re(format!(r"{NUM}\s*{SF}\s*(?:of\s+)?(?:[a-z]+\s+)?walls?\b"))],
            ),
            (
                "ceiling_sf",
                None,
                vec![re(format!(r"{NUM}\s*{SF}\s*(?:of\s+)?ceilings?\b"))],
            ),
            (
                "ceiling_height",
                None,
                vec![
                    re(format!(r"{NUM}\s*{FT}\s*(?:high\s+|tall\s+)?ceilings?\b")),
                    re(format!(
                        r"\bceilings?\s*(?:height\s*)?(?:of|at|is|are|[:=])?\s*{NUM}\s*{FT}"
                    )),
                ],
            ),
            (
                "door_count",
                Some("doors"),
                vec![re(format!(
                    r"{NUM}\s*(?:interior\s+|exterior\s+|entry\s+)?doors?\b"
                ))],
            ),
            (
                "window_count",
                Some("windows"),
                vec![re(format!(r"{NUM}\s*(?:egress\s+)?windows?\b"))],
            ),
            (
                "soffit_lf",
                None,
                vec![re(format!(r"{NUM}\s*{LF}\s*(?:of\s+)?soffits?\b"))],
            ),
            (
                "floor_sf",
                None,
                vec![re(format!(r"{NUM}\s*{SF}\s*(?:of\s+)?(?:floor|flooring)\b"))],
            ),
            (
                "deck_sf",
                None,
                vec![re(format!(r"{NUM}\s*{SF}\s*(?:of\s+)?deck(?:ing)?\b"))],
            ),
        ]
    });

/// Map a unit spelling to its canonical code; unknown units are upper-cased
pub fn normalize_unit(unit: &str) -> String {
    let trimmed = unit.trim();
    let key = WHITESPACE_RE
        // Fold through upper case so the key matches what an unknown unit returns as
        .replace_all(&trimmed.to_uppercase().to_lowercase().replace('.', " "), " ")
        .trim()
        .to_string();

    UNIT_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&key.as_str()))
        .map(|(code, _)| code.to_string())
        .unwrap_or_else(|| trimmed.to_uppercase())
}

/// Regex alternation of every known unit spelling, longest first
pub fn unit_pattern() -> String {
    let mut spellings: Vec<&str> = UNIT_ALIASES
        .iter()
        .flat_map(|(_, aliases)| aliases.iter().copied())
        .collect();
    spellings.sort_by_key(|s| std::cmp::Reverse(s.len()));
    spellings
        .iter()
        .map(|s| regex::escape(s).replace(' ', r"\.?\s*"))
        .collect::<Vec<_>>()
        .join("|")
}

/// Parse digits or spelled-out numbers ("seven", "thirty five")
///
/// Returns `None` for anything unrecognized so callers can tell
/// "not provided" apart from an explicit zero.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.trim().to_lowercase();
    let numeric = cleaned
        .trim_start_matches('$')
        .trim_end_matches('%')
        .replace(',', "");
    if numeric.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-') {
        if let Ok(value) = numeric.parse::<f64>() {
            if value.is_finite() {
                return Some(value);
            }
        }
    }

    let words: Vec<&str> = cleaned
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
        .collect();

    match words.as_slice() {
        [word] => word_value(word),
        [tens, ones] => {
            let tens = TENS.iter().find(|(w, _)| w == tens)?.1;
            let ones = ONES.iter().position(|w| w == ones)?;
            if (1..10).contains(&ones) {
                Some((tens + ones as u32) as f64)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn word_value(word: &str) -> Option<f64> {
    if let Some(pos) = ONES.iter().position(|w| *w == word) {
        return Some(pos as f64);
    }
    if let Some((_, value)) = TENS.iter().find(|(w, _)| *w == word) {
        return Some(*value as f64);
    }
    (word == "hundred").then_some(100.0)
}

/// Every number word the parser understands, for building regex alternations
pub fn number_words() -> impl Iterator<Item = &'static str> {
    ONES.iter()
        .copied()
        .chain(TENS.iter().map(|(w, _)| *w))
        .chain(std::iter::once("hundred"))
}

/// "smithfield addition" -> "Smithfield Addition"
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pick a takeoff category from description keywords
pub fn infer_category(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Pull assembly names out of "framing, drywall and paint"
pub fn extract_assemblies(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for piece in ASSEMBLY_SPLIT_RE.split(text) {
        let piece = piece.trim().to_lowercase();
        if piece.is_empty() {
            continue;
        }

        let hit = ASSEMBLIES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| piece.contains(k)));

        if let Some((name, _)) = hit {
            if !found.iter().any(|f| f == name) {
                found.push(name.to_string());
            }
        }
    }

    found
}

/// Extract named quantities like `wall_lf` or `ceiling_height` from free text
pub fn extract_variables(text: &str) -> BTreeMap<String, f64> {
    let mut vars = BTreeMap::new();

    for (key, mirror, patterns) in VARIABLE_PATTERNS.iter() {
        let value = patterns
            .iter()
            .find_map(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_number(m.as_str()));

        if let Some(value) = value {
            vars.insert(key.to_string(), value);
            if let Some(mirror) = mirror {
                vars.insert(mirror.to_string(), value);
            }
        }
    }

    vars
}

/// Guess a project type from keywords, defaulting to a basement finish
pub fn infer_project_type(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    PROJECT_TYPES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, project_type)| *project_type)
        .unwrap_or(DEFAULT_PROJECT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_aliases() {
        assert_eq!(normalize_unit("Sq Ft"), "SF");
        assert_eq!(normalize_unit("SQFT"), "SF");
        assert_eq!(normalize_unit("square feet"), "SF");
        assert_eq!(normalize_unit(" sq. ft. "), "SF");
        assert_eq!(normalize_unit("linear feet"), "LF");
        assert_eq!(normalize_unit("ft"), "LF");
        assert_eq!(normalize_unit("pcs"), "EA");
        assert_eq!(normalize_unit("sheets"), "SHT");
        assert_eq!(normalize_unit("board feet"), "BF");
        assert_eq!(normalize_unit("ſq ft"), "SF");
        for input in ["ſq ft", "Widgets", "cu. yd", "ﬀ"] {
            let once = normalize_unit(input);
            assert_eq!(normalize_unit(&once), once, "input: {}", input);
        }
        assert_eq!(normalize_unit("cubic yards"), "CY");
        assert_eq!(normalize_unit("sq  yd"), "SY");
    }

    #[test]
    fn test_unknown_unit_uppercased() {
        assert_eq!(normalize_unit("bundle"), "BUNDLE");
        assert_eq!(normalize_unit(""), "");
    }

    #[test]
    fn test_unit_idempotent() {
        for input in ["sq ft", "Each", "bundle", "  lin ft ", "yd3", "rolls", "", "s.f."] {
            let once = normalize_unit(input);
            assert_eq!(normalize_unit(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_parse_number_digits() {
        assert_eq!(parse_number("7"), Some(7.0));
        assert_eq!(parse_number("12.99"), Some(12.99));
        assert_eq!(parse_number("$1,050"), Some(1050.0));
        assert_eq!(parse_number("20%"), Some(20.0));
    }

    #[test]
    fn test_parse_number_words() {
        assert_eq!(parse_number("seven"), Some(7.0));
        assert_eq!(parse_number("twenty"), Some(20.0));
        assert_eq!(parse_number("thirty five"), Some(35.0));
        assert_eq!(parse_number("forty-two"), Some(42.0));
        assert_eq!(parse_number("Hundred"), Some(100.0));
        assert_eq!(parse_number("zero"), Some(0.0));
    }

    #[test]
    fn test_parse_number_rejects() {
        assert_eq!(parse_number("banana"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("five twenty"), None);
        assert_eq!(parse_number("twenty ten"), None);
        assert_eq!(parse_number("thirty zero"), None);
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("smithfield  addition"), "Smithfield Addition");
        assert_eq!(capitalize_words("drywall"), "Drywall");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("Drywall"), "Drywall");
        assert_eq!(infer_category("2x4 studs"), "Framing");
        assert_eq!(infer_category("R-19 batts"), "Insulation");
        assert_eq!(infer_category("Interior paint"), "Paint");
        assert_eq!(infer_category("LVP plank"), "Flooring");
        assert_eq!(infer_category("Prehung door"), "Doors");
        assert_eq!(infer_category("Baseboard"), "Trim");
        assert_eq!(infer_category("dumpster"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_category_order_is_significant() {
        // "casing" is a trim keyword, but Doors is checked first
        assert_eq!(infer_category("door casing"), "Doors");
        // Drywall is checked before Paint
        assert_eq!(infer_category("drywall paint prep"), "Drywall");
    }

    #[test]
    fn test_extract_assemblies() {
        assert_eq!(extract_assemblies("framing + drywall"), vec!["framing", "drywall"]);
        assert_eq!(
            extract_assemblies("Framing, Electrical & Plumbing and paint"),
            vec!["framing", "electrical", "plumbing", "paint"]
        );
        assert_eq!(
            extract_assemblies("sheetrock with baseboard"),
            vec!["drywall", "trim"]
        );
    }

    #[test]
    fn test_extract_assemblies_dedupes() {
        assert_eq!(
            extract_assemblies("drywall, framing, sheetrock"),
            vec!["drywall", "framing"]
        );
        assert!(extract_assemblies("stuff and things").is_empty());
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("90 LF walls, 8 ft ceilings, 3 doors, 2 windows");
        assert_eq!(vars.get("wall_lf"), Some(&90.0));
        assert_eq!(vars.get("ceiling_height"), Some(&8.0));
        assert_eq!(vars.get("door_count"), Some(&3.0));
        assert_eq!(vars.get("doors"), Some(&3.0));
        assert_eq!(vars.get("window_count"), Some(&2.0));
        assert_eq!(vars.get("windows"), Some(&2.0));
        assert!(!vars.contains_key("floor_sf"));
    }

    #[test]
    fn test_extract_area_variables() {
        let vars = extract_variables(
            "1,200 sf of floor, 400 sq ft deck, 60 lf soffit, 850 sf ceiling, 320 sf walls",
        );
        assert_eq!(vars.get("floor_sf"), Some(&1200.0));
        assert_eq!(vars.get("deck_sf"), Some(&400.0));
        assert_eq!(vars.get("soffit_lf"), Some(&60.0));
        assert_eq!(vars.get("ceiling_sf"), Some(&850.0));
        assert_eq!(vars.get("wall_sf"), Some(&320.0));
        assert!(!vars.contains_key("ceiling_height"));
    }

    #[test]
    fn test_ceiling_height_alternate_order() {
        let vars = extract_variables("ceiling height of 9 ft, 140 linear feet of interior walls");
        assert_eq!(vars.get("ceiling_height"), Some(&9.0));
        assert_eq!(vars.get("wall_lf"), Some(&140.0));
    }

    #[test]
    fn test_infer_project_type() {
        assert_eq!(infer_project_type("Deck rebuild"), "deck");
        assert_eq!(infer_project_type("master bath"), "bathroom_remodel");
        assert_eq!(infer_project_type("something else"), DEFAULT_PROJECT_TYPE);
    }
}
