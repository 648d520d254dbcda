//! French-locale synthetic values for receipts.

use fastrand::Rng;

const WORDS: &[&str] = &[
    "baguette", "croissant", "fromage", "jambon", "café", "thé", "chocolat", "pomme", "poire",
    "confiture", "beurre", "yaourt", "salade", "tomate", "olive", "miel", "farine", "sucre",
    "brioche", "quiche", "tarte", "madeleine", "limonade", "eau", "vin", "cidre", "savon",
    "bougie", "cahier", "stylo", "carnet", "parapluie", "écharpe", "bouquet", "sandwich",
];

const LAST_NAMES: &[&str] = &[
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
    "Moreau", "Simon", "Laurent", "Lefebvre", "Michel", "Garcia", "David", "Bertrand", "Roux",
    "Vincent", "Fournier", "Morel", "Girard", "André", "Mercier", "Dupont", "Lambert", "Bonnet",
    "Fontaine", "Rousseau", "Blanc", "Guerin", "Muller", "Henry", "Roussel", "Nicolas", "Perrin",
];

const FIRST_NAMES: &[&str] = &[
    "Camille", "Léa", "Manon", "Chloé", "Inès", "Sarah", "Julie", "Emma", "Louise", "Alice",
    "Lucas", "Hugo", "Louis", "Gabriel", "Arthur", "Jules", "Nathan", "Théo", "Paul", "Antoine",
    "Margaux", "Zoé", "Mathilde", "Élodie", "Maxime", "Julien", "Nicolas", "Thomas", "Pierre",
];

const COMPANY_SUFFIXES: &[&str] = &["SARL", "SA", "SAS", "S.A.R.L.", "et Fils", "& Cie"];

const STREET_KINDS: &[&str] = &[
    "rue", "avenue", "boulevard", "place", "chemin", "impasse", "allée", "quai",
];

const STREET_NAMES: &[&str] = &[
    "de la Paix", "Victor Hugo", "de la République", "Jean Jaurès", "Pasteur", "des Lilas",
    "du Moulin", "de l'Église", "Saint-Michel", "Gambetta", "de la Gare", "des Écoles",
    "Voltaire", "du Château", "Nationale", "des Fleurs",
];

const CITIES: &[&str] = &[
    "Paris", "Marseille", "Lyon", "Toulouse", "Nice", "Nantes", "Strasbourg", "Montpellier",
    "Bordeaux", "Lille", "Rennes", "Reims", "Toulon", "Grenoble", "Dijon", "Angers", "Nîmes",
    "Brest", "Limoges", "Tours", "Amiens", "Perpignan", "Metz", "Besançon", "Orléans", "Rouen",
];

const DEPARTMENTS: &[&str] = &[
    "Ain", "Aisne", "Allier", "Ardèche", "Aude", "Calvados", "Cantal", "Charente", "Corrèze",
    "Côte-d'Or", "Dordogne", "Doubs", "Drôme", "Finistère", "Gard", "Gironde", "Hérault",
    "Isère", "Jura", "Landes", "Loiret", "Lot", "Manche", "Marne", "Morbihan", "Nord", "Oise",
    "Orne", "Paris", "Rhône", "Sarthe", "Savoie", "Somme", "Tarn", "Var", "Vendée", "Vosges",
];

const URL_TLDS: &[&str] = &["fr", "com", "net", "org"];

fn pick<'a>(rng: &mut Rng, values: &[&'a str]) -> &'a str {
    values[rng.usize(..values.len())]
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn word(rng: &mut Rng) -> String {
    pick(rng, WORDS).to_string()
}

pub fn name(rng: &mut Rng) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

pub fn company(rng: &mut Rng) -> String {
    match rng.u8(0..3) {
        0 => format!("{} {}", pick(rng, LAST_NAMES), pick(rng, COMPANY_SUFFIXES)),
        1 => format!("{} et {}", pick(rng, LAST_NAMES), pick(rng, LAST_NAMES)),
        _ => format!(
            "{}, {} et {}",
            pick(rng, LAST_NAMES),
            pick(rng, LAST_NAMES),
            pick(rng, LAST_NAMES)
        ),
    }
}

pub fn street_address(rng: &mut Rng) -> String {
    format!(
        "{}, {} {}",
        rng.u16(1..=250),
        pick(rng, STREET_KINDS),
        pick(rng, STREET_NAMES)
    )
}

pub fn city(rng: &mut Rng) -> String {
    pick(rng, CITIES).to_string()
}

pub fn department(rng: &mut Rng) -> String {
    pick(rng, DEPARTMENTS).to_string()
}

pub fn postcode(rng: &mut Rng) -> String {
    format!("{:05}", rng.u32(1000..=95999))
}

pub fn phone_number(rng: &mut Rng) -> String {
    format!(
        "+33 (0){} {:02} {:02} {:02} {:02}",
        rng.u8(1..=9),
        rng.u8(0..100),
        rng.u8(0..100),
        rng.u8(0..100),
        rng.u8(0..100)
    )
}

pub fn url(rng: &mut Rng) -> String {
    let slug: String = pick(rng, LAST_NAMES)
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_lowercase();
    format!("https://www.{slug}.{}/", pick(rng, URL_TLDS))
}

/// A decimal string of exactly `len` digits with no leading zero.
pub fn digits(rng: &mut Rng, len: u32) -> String {
    let low = 10u64.pow(len - 1);
    let high = 10u64.pow(len) - 1;
    rng.u64(low..=high).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_length() {
        let mut rng = Rng::with_seed(7);
        for len in [6, 8, 9, 10] {
            let value = digits(&mut rng, len);
            assert_eq!(value.len(), len as usize);
            assert!(!value.starts_with('0'));
        }
    }

    #[test]
    fn test_capitalize_handles_accents() {
        assert_eq!(capitalize("écharpe"), "Écharpe");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_postcode_is_five_digits() {
        let mut rng = Rng::with_seed(3);
        for _ in 0..50 {
            let code = postcode(&mut rng);
            assert_eq!(code.len(), 5);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_url_shape() {
        let mut rng = Rng::with_seed(11);
        let value = url(&mut rng);
        assert!(value.starts_with("https://www."));
        assert!(value.ends_with('/'));
        assert!(value.is_ascii());
    }

    #[test]
    fn test_same_seed_same_values() {
        let mut a = Rng::with_seed(42);
        let mut b = Rng::with_seed(42);
        assert_eq!(company(&mut a), company(&mut b));
        assert_eq!(street_address(&mut a), street_address(&mut b));
    }
}
