//! The static ringtone catalog.

/// A selectable alert sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ringtone {
    /// Stable identifier
    pub id: &'static str,
    /// Title shown in the picker and stored in preferences
    pub title: &'static str,
    /// System tone played when no bundled asset is available
    pub system_sound_id: u32,
    /// File name of the bundled asset, if this ringtone ships one
    pub asset: Option<&'static str>,
}

/// Identifier of the fallback entry.
pub const DEFAULT_RINGTONE_ID: &str = "default";

const CATALOG: &[Ringtone] = &[
    Ringtone {
        id: DEFAULT_RINGTONE_ID,
        title: "Default",
        system_sound_id: 1005,
        asset: None,
    },
    Ringtone {
        id: "radar",
        title: "Radar",
        system_sound_id: 1304,
        asset: Some("radar.wav"),
    },
    Ringtone {
        id: "chimes",
        title: "Chimes",
        system_sound_id: 1008,
        asset: Some("chimes.wav"),
    },
    Ringtone {
        id: "bell",
        title: "Bell",
        system_sound_id: 1013,
        asset: Some("bell.wav"),
    },
    Ringtone {
        id: "beacon",
        title: "Beacon",
        system_sound_id: 1022,
        asset: Some("beacon.wav"),
    },
    Ringtone {
        id: "pulse",
        title: "Pulse",
        system_sound_id: 1016,
        asset: None,
    },
];

/// All ringtones in display order.
#[must_use]
pub fn catalog() -> &'static [Ringtone] {
    CATALOG
}

/// The entry used when nothing else matches.
#[must_use]
pub fn default_ringtone() -> &'static Ringtone {
    &CATALOG[0]
}

/// Looks up a ringtone by its exact title.
#[must_use]
pub fn find_by_title(title: &str) -> Option<&'static Ringtone> {
    CATALOG.iter().find(|r| r.title == title)
}

/// Resolves a persisted title, falling back to the default ringtone.
#[must_use]
pub fn resolve(title: &str) -> &'static Ringtone {
    find_by_title(title).unwrap_or_else(default_ringtone)
}

/// Position of a ringtone in the catalog.
#[must_use]
pub fn index_of(ringtone: &Ringtone) -> usize {
    CATALOG
        .iter()
        .position(|r| r.id == ringtone.id)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_not_empty() {
        assert!(!catalog().is_empty());
    }

    #[test]
    fn test_default_ringtone_has_no_asset() {
        let ringtone = default_ringtone();
        assert_eq!(ringtone.id, DEFAULT_RINGTONE_ID);
        assert!(ringtone.asset.is_none());
    }

    #[test]
    fn test_ids_and_titles_unique() {
        let all = catalog();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.id, b.id);
                assert_ne!(a.title, b.title);
            }
        }
    }

    #[test]
    fn test_find_by_title() {
        assert_eq!(find_by_title("Bell").map(|r| r.id), Some("bell"));
        assert!(find_by_title("bell").is_none());
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        assert_eq!(resolve("No Such Tone").id, DEFAULT_RINGTONE_ID);
        assert_eq!(resolve("Chimes").id, "chimes");
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of(default_ringtone()), 0);
        let bell = find_by_title("Bell").unwrap();
        assert_eq!(catalog()[index_of(bell)].id, "bell");
    }
}
