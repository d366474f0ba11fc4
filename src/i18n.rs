use crate::model::Language;

/// English names of the federal states, keyed by their German name
const REGION_NAMES_EN: &[(&str, &str)] = &[
    ("Baden-Württemberg", "Baden-Württemberg"),
    ("Bayern", "Bavaria"),
    ("Berlin", "Berlin"),
    ("Brandenburg", "Brandenburg"),
    ("Bremen", "Bremen"),
    ("Hamburg", "Hamburg"),
    ("Hessen", "Hesse"),
    ("Mecklenburg-Vorpommern", "Mecklenburg-Western Pomerania"),
    ("Niedersachsen", "Lower Saxony"),
    ("Nordrhein-Westfalen", "North Rhine-Westphalia"),
    ("Rheinland-Pfalz", "Rhineland-Palatinate"),
    ("Saarland", "Saarland"),
    ("Sachsen", "Saxony"),
    ("Sachsen-Anhalt", "Saxony-Anhalt"),
    ("Schleswig-Holstein", "Schleswig-Holstein"),
    ("Thüringen", "Thuringia"),
];

/// Display name of a region. Untranslated names pass through unchanged.
pub fn region_name(name: &str, lang: Language) -> &str {
    match lang {
        Language::De => name,
        Language::En => REGION_NAMES_EN
            .iter()
            .find(|(de, _)| *de == name)
            .map_or(name, |(_, en)| en),
    }
}

/// Fallback label for missing observations
pub fn default_na_label(lang: Language) -> &'static str {
    match lang {
        Language::De => "keine Angabe",
        Language::En => "no data",
    }
}

/// Fallback label for the national total
pub fn default_total_label(lang: Language) -> &'static str {
    match lang {
        Language::De => "Deutschland",
        Language::En => "Germany",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bayern", Language::En, "Bavaria")]
    #[case("Thüringen", Language::En, "Thuringia")]
    #[case("Bayern", Language::De, "Bayern")]
    #[case("Atlantis", Language::En, "Atlantis")]
    fn test_region_name(#[case] name: &str, #[case] lang: Language, #[case] expected: &str) {
        assert_eq!(region_name(name, lang), expected);
    }

    #[test]
    fn test_default_labels() {
        assert_eq!(default_na_label(Language::De), "keine Angabe");
        assert_eq!(default_total_label(Language::En), "Germany");
    }
}
