//! Token normalization shared by category matching and signal lookup.
//!
//! Generative output and form values arrive in mixed case, with or without
//! Portuguese diacritics, and with arbitrary separators ("InvertedTriangle",
//! "inverted_triangle", "Triângulo invertido"). Everything that compares
//! such tokens goes through [`normalize_token`].

/// Folds a token to a comparison key: lowercase ASCII letters and digits,
/// diacritics removed, separators and punctuation dropped.
pub fn normalize_token(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Folds a field name for lenient key lookup ("bodyShape" == "body_shape").
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_case_and_separators() {
        assert_eq!(normalize_token("Inverted Triangle"), "invertedtriangle");
        assert_eq!(normalize_token("inverted_triangle"), "invertedtriangle");
        assert_eq!(normalize_token("InvertedTriangle"), "invertedtriangle");
    }

    #[test]
    fn folds_portuguese_diacritics() {
        assert_eq!(normalize_token("Verão"), "verao");
        assert_eq!(normalize_token("Triângulo Invertido"), "trianguloinvertido");
        assert_eq!(normalize_token("Maçã"), "maca");
        assert_eq!(normalize_token("Média"), "media");
    }

    #[test]
    fn uppercase_accented_letters_fold_too() {
        assert_eq!(normalize_token("VERÃO"), "verao");
    }

    #[test]
    fn normalize_key_ignores_separators_only() {
        assert_eq!(normalize_key("bodyShape"), "bodyshape");
        assert_eq!(normalize_key("body_shape"), "bodyshape");
        assert_eq!(normalize_key("Body Shape"), "bodyshape");
    }
}
