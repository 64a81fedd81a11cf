//! Random citizen generation

use rand::Rng;

use super::character::{CharacterSheet, Devout, Hardy};
use super::names::generate_name;
use crate::config::SimulationConfig;

/// Chance a generated citizen is Hardy / Devout
const HARDY_CHANCE: f64 = 0.15;
const DEVOUT_CHANCE: f64 = 0.1;

/// Roll a citizen sheet: random name, adult age, configured needs and schedule.
pub fn random_citizen(config: &SimulationConfig, rng: &mut impl Rng) -> CharacterSheet {
    let (given, family) = generate_name(rng);
    let age = rng.gen_range(16..70);

    let spread = config.mood.belief_spread;
    let belief = if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    };

    let mut sheet = CharacterSheet::citizen(given, age, config)
        .in_family(family)
        .with_belief(belief);

    if rng.gen_bool(HARDY_CHANCE) {
        sheet = sheet.with_trait(&Hardy::default());
    }
    if rng.gen_bool(DEVOUT_CHANCE) {
        sheet = sheet.with_trait(&Devout::default());
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_citizen_is_adult_with_family() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let sheet = random_citizen(&config, &mut rng);
            assert!((16..70).contains(&sheet.age));
            assert!(sheet.family.is_some());
            assert_eq!(sheet.needs.len(), config.needs.defaults.len());
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let config = SimulationConfig::default();
        let a = random_citizen(&config, &mut StdRng::seed_from_u64(9));
        let b = random_citizen(&config, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.name, b.name);
        assert_eq!(a.age, b.age);
        assert_eq!(a.family, b.family);
    }
}
