//! Name generation utilities

use rand::Rng;

/// Generate a random (given, family) name pair
pub fn generate_name(rng: &mut impl Rng) -> (&'static str, &'static str) {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];
    (given, family)
}

// Sample name lists - would be loaded from data files in production
static GIVEN_NAMES: &[&str] = &[
    "Aldric", "Brenna", "Cedric", "Dagny", "Edwin", "Freya", "Garrick", "Hilde", "Ivo", "Jorunn",
    "Kael", "Liesel", "Magnus", "Nessa", "Osric", "Petra", "Quill", "Rowena", "Sigurd", "Tamsin",
    "Ulric", "Vesna", "Wulfric", "Yrsa", "Ansel", "Bryn", "Corin", "Dorota", "Eamon", "Fenna",
    "Gideon", "Halla", "Isolde", "Jarek", "Katla", "Leoric", "Mira", "Njal", "Odile", "Rurik",
];

static FAMILY_NAMES: &[&str] = &[
    "Ashford", "Blackwood", "Carrow", "Dunmore", "Eldridge", "Fairholt", "Greaves", "Hallowell",
    "Ironside", "Kettleby", "Longmire", "Marrow", "Northcott", "Oakheart", "Penhallow", "Quarry",
    "Ravensworth", "Stonebridge", "Thornfield", "Underhill", "Vance", "Whitlock", "Yarrow",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_names_come_from_the_tables() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let (given, family) = generate_name(&mut rng);
            assert!(GIVEN_NAMES.contains(&given));
            assert!(FAMILY_NAMES.contains(&family));
        }
    }

    #[test]
    fn test_seeded_colony_has_many_families() {
        let mut rng = StdRng::seed_from_u64(5);
        let families: HashSet<_> = (0..200).map(|_| generate_name(&mut rng).1).collect();
        // 200 draws over 23 surnames
        assert!(families.len() > 15);
    }
}
