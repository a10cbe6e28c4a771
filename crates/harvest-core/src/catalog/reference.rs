//! Parsing of catalog references given on the command line

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use super::EntityKind;

/// A user-supplied reference to a catalog entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRef {
    /// Entity kind when the reference was a URL or URI; `None` for a bare id
    pub kind: Option<EntityKind>,
    pub id: String,
}

static REF_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn ref_regex() -> Option<&'static Regex> {
    REF_RE
        .get_or_init(|| {
            // https://open.host/artist/ID?si=..., https://host/intl-de/album/ID, scheme:track:ID
            match Regex::new(r"(?:^|[/:])(artist|album|track)[/:]([^/:?#\s]+)(?:[?#/].*)?$") {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(error = %e, "Failed to compile catalog reference regex");
                    None
                }
            }
        })
        .as_ref()
}

/// Parse a bare id, catalog URL or URI into a [`CatalogRef`]
pub fn parse_catalog_ref(input: &str) -> Option<CatalogRef> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.contains('/') || input.contains(':') {
        let caps = ref_regex()?.captures(input)?;
        let kind = match &caps[1] {
            "artist" => EntityKind::Artist,
            "album" => EntityKind::Album,
            _ => EntityKind::Song,
        };
        return Some(CatalogRef {
            kind: Some(kind),
            id: caps[2].to_string(),
        });
    }

    // Ids are opaque; anything without a separator or whitespace is taken as-is
    if input.chars().any(char::is_whitespace) {
        return None;
    }
    Some(CatalogRef {
        kind: None,
        id: input.to_string(),
    })
}

/// Split a selection on `,` or `;`, dropping empty parts
pub fn split_refs(selection: &str) -> Vec<String> {
    selection
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id() {
        let r = parse_catalog_ref("3QJzdZJYIAcoET1GcfpNGi").unwrap();
        assert_eq!(r.kind, None);
        assert_eq!(r.id, "3QJzdZJYIAcoET1GcfpNGi");
    }

    #[test]
    fn test_bare_id_with_punctuation() {
        for id in ["artist-1", "a_1", "AL.2"] {
            let r = parse_catalog_ref(id).unwrap();
            assert_eq!(r.kind, None);
            assert_eq!(r.id, id);
        }
    }

    #[test]
    fn test_url_id_with_punctuation() {
        let r = parse_catalog_ref("https://open.example.com/album/first-album_2?si=x").unwrap();
        assert_eq!(r.kind, Some(EntityKind::Album));
        assert_eq!(r.id, "first-album_2");
    }

    #[test]
    fn test_artist_url_with_query() {
        let r = parse_catalog_ref("https://open.example.com/artist/7lZauDnRoAC3kmaYae2opv?si=abc")
            .unwrap();
        assert_eq!(r.kind, Some(EntityKind::Artist));
        assert_eq!(r.id, "7lZauDnRoAC3kmaYae2opv");
    }

    #[test]
    fn test_localized_album_url() {
        let r = parse_catalog_ref("https://open.example.com/intl-de/album/AL1").unwrap();
        assert_eq!(r.kind, Some(EntityKind::Album));
        assert_eq!(r.id, "AL1");
    }

    #[test]
    fn test_uri_form() {
        let r = parse_catalog_ref("catalog:track:S1").unwrap();
        assert_eq!(r.kind, Some(EntityKind::Song));
        assert_eq!(r.id, "S1");
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_catalog_ref("").is_none());
        assert!(parse_catalog_ref("not an id").is_none());
        assert!(parse_catalog_ref("https://example.com/playlist/P1").is_none());
    }

    #[test]
    fn test_split_refs() {
        assert_eq!(split_refs("A1, A2;A3"), vec!["A1", "A2", "A3"]);
        assert_eq!(split_refs("A1,,"), vec!["A1"]);
        assert!(split_refs(" ").is_empty());
    }
}
