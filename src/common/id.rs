//! GUIDs for package elements that need one (section ids).
use rand::{Rng, RngCore};
use std::fmt::Write;

/// An RFC 4122 version 4 GUID drawn from `rng`, formatted as
/// `{XXXXXXXX-XXXX-...}`.
pub fn guid_from_rng<R: RngCore>(rng: &mut R) -> String {
    let mut bytes: [u8; 16] = rng.random();
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;

    let mut guid = String::with_capacity(38);
    guid.push('{');
    for (i, byte) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            guid.push('-');
        }
        let _ = write!(guid, "{:02X}", byte);
    }
    guid.push('}');
    guid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_guid_shape() {
        let guid = guid_from_rng(&mut rand::rng());
        assert_eq!(guid.len(), 38);
        let groups: Vec<&str> = guid.trim_matches(|c| c == '{' || c == '}').split('-').collect();
        assert_eq!(groups.iter().map(|g| g.len()).collect::<Vec<_>>(), vec![8, 4, 4, 4, 12]);
        assert!(groups.iter().all(|g| g.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())));
        assert!(groups[2].starts_with('4'));
    }

    #[test]
    fn test_seeded_guids_repeat() {
        let a = guid_from_rng(&mut StdRng::seed_from_u64(3));
        let b = guid_from_rng(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
        assert_ne!(a, guid_from_rng(&mut StdRng::seed_from_u64(4)));
    }
}
