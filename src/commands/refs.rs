//! Turning command line references into catalog ids

use harvest_core::catalog::{parse_catalog_ref, split_refs, EntityKind};
use harvest_core::error::Result;
use harvest_core::{bail_invalid, bail_usage};

fn expect_kind(input: &str, wanted: EntityKind) -> Result<String> {
    let Some(reference) = parse_catalog_ref(input) else {
        bail_invalid!(&format!("{} reference", wanted), input);
    };
    match reference.kind {
        None => Ok(reference.id),
        Some(kind) if kind == wanted => Ok(reference.id),
        Some(kind) => bail_usage!(format!(
            "expected {} reference, got a {} link: {}",
            wanted, kind, input
        )),
    }
}

pub fn artist_id(input: &str) -> Result<String> {
    expect_kind(input, EntityKind::Artist)
}

/// Artist ids from every argument, each possibly holding several references
pub fn artist_ids(inputs: &[String]) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for part in inputs.iter().flat_map(|input| split_refs(input)) {
        let id = artist_id(&part)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        bail_usage!("no artist given");
    }
    Ok(ids)
}

pub fn album_id(input: &str) -> Result<String> {
    expect_kind(input.trim(), EntityKind::Album)
}
