//! Identifier case conversion and English inflection.
//!
//! Every derived name in a configuration tree (JSON names, argument names,
//! private field names, route segments, event actions) goes through this
//! module, so templates see one consistent spelling per convention.

/// Token sequences the word splitter fragments but which must stay one word.
///
/// `ETag` splits as `E` + `Tag` under the acronym rule, `OData` as `O` + `Data`.
const WORD_EXCEPTIONS: &[(&[&str], &str)] = &[(&["E", "Tag"], "ETag"), (&["O", "Data"], "OData")];

/// Split an identifier into words, preserving the original casing.
///
/// ## Word Boundary Detection
///
/// 1. **Explicit separators:** `_`, `-`, whitespace → always split
/// 2. **Case transition (camelCase):** `aB` → split between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` → split between `P` and `R`
///    (detected by `Upper Upper Lower` pattern)
///
/// Known acronyms that rule 3 fragments (see [`WORD_EXCEPTIONS`]) are
/// reassembled afterwards.
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(c);

        if let Some(&next) = chars.peek() {
            // "myApp" → "my" + "App"
            if c.is_lowercase() && next.is_uppercase() {
                words.push(std::mem::take(&mut current));
                continue;
            }

            // "HTTPServer" → "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                words.push(std::mem::take(&mut current));
            }
        }
    }

    if !current.is_empty() {
        words.push(current);
    }

    reassemble_exceptions(words)
}

fn reassemble_exceptions(words: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(words.len());
    let mut i = 0;

    'outer: while i < words.len() {
        for (parts, joined) in WORD_EXCEPTIONS {
            let end = i + parts.len();
            if end <= words.len() && words[i..end].iter().zip(parts.iter()).all(|(w, p)| w == p) {
                out.push((*joined).to_string());
                i = end;
                continue 'outer;
            }
        }
        out.push(words[i].clone());
        i += 1;
    }

    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// `PersonId` → `personId`, `ETag` → `etag`, `HTTPServer` → `httpServer`.
pub fn to_camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut iter = words.iter();
    let mut out = match iter.next() {
        Some(first) => first.to_lowercase(),
        None => return String::new(),
    };
    for w in iter {
        out.push_str(&capitalize(w));
    }
    out
}

/// `personId` → `PersonId`, `person_name` → `PersonName`.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// `PersonId` → `person_id`.
pub fn to_snake_case(s: &str) -> String {
    join_lower(s, "_")
}

/// `PersonId` → `person-id`.
pub fn to_kebab_case(s: &str) -> String {
    join_lower(s, "-")
}

fn join_lower(s: &str, sep: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Human readable text: `PersonId` → `Person Identifier`.
pub fn to_sentence_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| if w == "Id" { "Identifier".to_string() } else { capitalize(w) })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Private field name: `PersonId` → `_personId`.
pub fn to_private_case(s: &str) -> String {
    format!("_{}", to_camel_case(s))
}

/// Argument name: `PersonId` → `personId`.
pub fn to_argument_case(s: &str) -> String {
    to_camel_case(s)
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Naive English plural: `Person` → `Persons`, `Category` → `Categories`,
/// `Address` → `Addresses`.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();

    match chars.as_slice() {
        [.., c, 'y'] if !is_vowel(*c) => format!("{}ies", &word[..word.len() - 1]),
        [.., 's'] | [.., 'x'] | [.., 'z'] => format!("{word}es"),
        [.., 'c', 'h'] | [.., 's', 'h'] => format!("{word}es"),
        _ => format!("{word}s"),
    }
}

/// English past tense of a verb.
///
/// | Rule                                        | Example              |
/// |---------------------------------------------|----------------------|
/// | trailing `e` → add `d`                      | `create` → `created` |
/// | consonant + `y` → `ied`                     | `try` → `tried`      |
/// | trailing `c` → add `ked`                    | `frolic` → `frolicked` |
/// | single vowel + consonant (not w/x/y) → double | `admit` → `admitted` |
/// | otherwise add `ed`                          | `publish` → `published` |
pub fn past_tense(verb: &str) -> String {
    let lower = verb.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();

    match chars.as_slice() {
        [] => String::new(),
        [.., 'e'] => format!("{verb}d"),
        [.., c, 'y'] if !is_vowel(*c) => format!("{}ied", &verb[..verb.len() - 1]),
        [.., 'c'] => format!("{verb}ked"),
        [.., a, v, c]
            if !is_vowel(*a) && is_vowel(*v) && !is_vowel(*c) && !matches!(*c, 'w' | 'x' | 'y') =>
        {
            let last = verb.chars().last().unwrap_or(*c);
            format!("{verb}{last}ed")
        }
        _ => format!("{verb}ed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_case_transitions() {
        assert_eq!(split_words("personId"), vec!["person", "Id"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("my-awesome_app now"), vec!["my", "awesome", "app", "now"]);
    }

    #[test]
    fn reassembles_known_acronyms() {
        assert_eq!(split_words("ETag"), vec!["ETag"]);
        assert_eq!(split_words("ODataFilter"), vec!["OData", "Filter"]);
        assert_eq!(split_words("CustomerETag"), vec!["Customer", "ETag"]);
    }

    #[test]
    fn case_conversions() {
        assert_eq!(to_camel_case("PersonId"), "personId");
        assert_eq!(to_camel_case("ETag"), "etag");
        assert_eq!(to_pascal_case("person_name"), "PersonName");
        assert_eq!(to_snake_case("PersonId"), "person_id");
        assert_eq!(to_kebab_case("SalesOrder"), "sales-order");
        assert_eq!(to_sentence_case("PersonId"), "Person Identifier");
        assert_eq!(to_private_case("FirstName"), "_firstName");
        assert_eq!(to_argument_case("Id"), "id");
    }

    #[test]
    fn plurals() {
        assert_eq!(pluralize("Person"), "Persons");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Day"), "Days");
    }

    #[test]
    fn past_tense_rules() {
        assert_eq!(past_tense("create"), "created");
        assert_eq!(past_tense("update"), "updated");
        assert_eq!(past_tense("delete"), "deleted");
        assert_eq!(past_tense("try"), "tried");
        assert_eq!(past_tense("admit"), "admitted");
        assert_eq!(past_tense("frolic"), "frolicked");
        assert_eq!(past_tense("publish"), "published");
        assert_eq!(past_tense("play"), "played");
        assert_eq!(past_tense("fix"), "fixed");
        assert_eq!(past_tense("Create"), "Created");
    }
}
